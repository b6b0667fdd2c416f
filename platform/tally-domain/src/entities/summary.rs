use crate::services::profit::{compute_profit, max_drawdown, ProfitRun};
use crate::value_objects::profit_mode::ProfitMode;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitSummary {
    pub profit_mode: String,
    pub round_trips: usize,
    pub winning_trips: usize,
    pub win_rate: f64,
    pub trading_days: usize,
    pub total_profit: f64,
    pub final_equity: f64,
    pub first_day: Option<NaiveDate>,
    pub last_day: Option<NaiveDate>,
    pub pairwise_drawdown_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairwise_drawdown_error: Option<String>,
    pub max_drawdown: f64,
    pub max_drawdown_pct: Option<f64>,
    pub total_return_pct: Option<f64>,
    pub annualized_return_pct: Option<f64>,
}

/// Builds the run summary. Capital-relative figures (returns, `max_drawdown_pct`) are only
/// produced in `Absolute` mode; percent-change profits are not money and are left unscaled.
pub fn summarize(run: &ProfitRun, initial_capital: Option<f64>) -> ProfitSummary {
    let initial_capital = initial_capital.filter(|_| run.mode == ProfitMode::Absolute);
    let round_trips = run.round_trips.len();
    let winning_trips = run
        .round_trips
        .iter()
        .filter(|trip| compute_profit(trip, run.mode) > 0.0)
        .count();
    let win_rate = if round_trips == 0 {
        0.0
    } else {
        winning_trips as f64 / round_trips as f64
    };

    let final_equity = run
        .equity
        .last()
        .map(|point| point.cumulative_profit)
        .unwrap_or(0.0);
    let first_day = run.equity.first().map(|point| point.date);
    let last_day = run.equity.last().map(|point| point.date);

    let (pairwise_drawdown_pct, pairwise_drawdown_error) = match &run.drawdown {
        Ok(pct) => (Some(*pct), None),
        Err(err) => (None, Some(err.to_string())),
    };

    let dd = max_drawdown(&run.equity, initial_capital);

    let total_return_pct = initial_capital
        .filter(|capital| *capital > 0.0)
        .map(|capital| final_equity / capital * 100.0);
    let annualized_return_pct = match (total_return_pct, first_day, last_day) {
        (Some(total), Some(first), Some(last)) => {
            let days = (last - first).num_days();
            if days > 0 {
                Some(total / (days as f64 / 365.0))
            } else {
                None
            }
        }
        _ => None,
    };

    ProfitSummary {
        profit_mode: run.mode.label().to_string(),
        round_trips,
        winning_trips,
        win_rate,
        trading_days: run.daily.len(),
        total_profit: run.daily.total(),
        final_equity,
        first_day,
        last_day,
        pairwise_drawdown_pct,
        pairwise_drawdown_error,
        max_drawdown: dd.absolute,
        max_drawdown_pct: dd.pct,
        total_return_pct,
        annualized_return_pct,
    }
}
