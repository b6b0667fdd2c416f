use crate::error::ProfitError;
use crate::value_objects::equity_point::EquityPoint;
use crate::value_objects::profit_mode::ProfitMode;
use crate::value_objects::side::Side;
use crate::value_objects::trade::{HasSymbol, RoundTrip, TradeBatch, TradeLeg};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Signed profit summed per closing day. Iteration is in ascending date order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyProfit {
    by_day: BTreeMap<NaiveDate, f64>,
}

impl DailyProfit {
    pub fn add(&mut self, day: NaiveDate, profit: f64) {
        *self.by_day.entry(day).or_insert(0.0) += profit;
    }

    pub fn get(&self, day: NaiveDate) -> Option<f64> {
        self.by_day.get(&day).copied()
    }

    pub fn len(&self) -> usize {
        self.by_day.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.by_day.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.by_day.iter().map(|(day, profit)| (*day, *profit))
    }
}

pub fn compute_profit(trip: &RoundTrip, mode: ProfitMode) -> f64 {
    match mode {
        ProfitMode::Absolute => trip.sell_price * trip.quantity - trip.buy_price * trip.quantity,
        ProfitMode::PercentChange => (trip.sell_price - trip.buy_price) / trip.buy_price * 100.0,
    }
}

/// Groups records by symbol. Groups appear in order of each symbol's first record and keep the
/// input's relative order inside a group.
pub fn group_by_symbol<T: HasSymbol + Clone>(trades: &[T]) -> Vec<(String, Vec<T>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();

    for trade in trades {
        let slot = *index.entry(trade.symbol()).or_insert_with(|| {
            groups.push((trade.symbol().to_string(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(trade.clone());
    }

    groups
}

/// Positional pairing: records 0&1, 2&3, ... form round trips and a trailing odd record is
/// dropped. Prices, quantities and sides are not reconciled.
pub fn pair_round_trips(symbol_trades: &[TradeLeg]) -> Vec<(TradeLeg, TradeLeg)> {
    symbol_trades
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}

/// Number of positional pairs whose legs are not a buy followed by a sell.
pub fn side_mismatches(pairs: &[(TradeLeg, TradeLeg)]) -> usize {
    pairs
        .iter()
        .filter(|(open, close)| open.side != Side::Buy || close.side != Side::Sell)
        .count()
}

pub fn aggregate_daily(trips: &[RoundTrip], mode: ProfitMode) -> DailyProfit {
    let mut daily = DailyProfit::default();
    for trip in trips {
        daily.add(trip.sell_date, compute_profit(trip, mode));
    }
    daily
}

pub fn to_sorted_series(daily: &DailyProfit) -> Vec<(NaiveDate, f64)> {
    daily.iter().collect()
}

pub fn to_cumulative(series: &[(NaiveDate, f64)]) -> Vec<EquityPoint> {
    let mut running = 0.0;
    series
        .iter()
        .map(|(date, profit)| {
            running += profit;
            EquityPoint {
                date: *date,
                daily_profit: *profit,
                cumulative_profit: running,
            }
        })
        .collect()
}

/// Sums the declines between index pairs (1,2), (3,4), ... of the curve and expresses them as a
/// percentage of the final cumulative value. Index 0 never takes part and declines that straddle
/// a pair boundary are not seen, so this is not a peak-to-trough drawdown.
pub fn compute_drawdown(curve: &[EquityPoint]) -> Result<f64, ProfitError> {
    let Some(last) = curve.last() else {
        return Err(ProfitError::EmptyInput);
    };
    let final_equity = last.cumulative_profit;

    let mut total_decline = 0.0;
    let mut idx = 1;
    while idx + 1 < curve.len() {
        let first = curve[idx].cumulative_profit;
        let second = curve[idx + 1].cumulative_profit;
        if second < first {
            total_decline += first - second;
        }
        idx += 2;
    }

    if final_equity == 0.0 {
        return Err(ProfitError::DivisionByZero);
    }
    if total_decline == 0.0 {
        // 0 / negative equity would be -0.0
        return Ok(0.0);
    }
    Ok(total_decline / final_equity * 100.0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MaxDrawdown {
    /// Largest fall of cumulative profit from a running peak, in profit units.
    pub absolute: f64,
    /// The same fall relative to the peak account value; only known with a starting capital.
    pub pct: Option<f64>,
}

/// Conventional peak-to-trough drawdown over the cumulative curve. The peak starts at zero
/// profit (or at `initial_capital` when given) before the first closing day.
pub fn max_drawdown(curve: &[EquityPoint], initial_capital: Option<f64>) -> MaxDrawdown {
    let base = initial_capital.unwrap_or(0.0);
    let mut peak = base;
    let mut result = MaxDrawdown::default();
    let mut max_pct: Option<f64> = initial_capital.map(|_| 0.0);

    for point in curve {
        let value = base + point.cumulative_profit;
        if value > peak {
            peak = value;
            continue;
        }
        let fall = peak - value;
        if fall > result.absolute {
            result.absolute = fall;
        }
        if let Some(current) = max_pct.as_mut() {
            if peak > 0.0 {
                let pct = fall / peak * 100.0;
                if pct > *current {
                    *current = pct;
                }
            }
        }
    }

    result.pct = max_pct;
    result
}

/// Output of one engine pass. Every field is derived from `round_trips`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitRun {
    pub mode: ProfitMode,
    pub round_trips: Vec<RoundTrip>,
    pub dropped_legs: usize,
    pub side_mismatches: usize,
    pub daily: DailyProfit,
    pub equity: Vec<EquityPoint>,
    pub drawdown: Result<f64, ProfitError>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfitEngine {
    mode: ProfitMode,
}

impl ProfitEngine {
    pub fn new(mode: ProfitMode) -> Self {
        Self { mode }
    }

    pub fn run(&self, batch: &TradeBatch) -> ProfitRun {
        let (round_trips, dropped_legs, mismatches) = match batch {
            TradeBatch::RoundTrips(trips) => (trips.clone(), 0, 0),
            TradeBatch::Legs(legs) => {
                let mut trips = Vec::with_capacity(legs.len() / 2);
                let mut dropped = 0usize;
                let mut mismatches = 0usize;
                for (_, symbol_legs) in group_by_symbol(legs) {
                    let pairs = pair_round_trips(&symbol_legs);
                    dropped += symbol_legs.len() - pairs.len() * 2;
                    mismatches += side_mismatches(&pairs);
                    trips.extend(
                        pairs
                            .iter()
                            .map(|(open, close)| RoundTrip::from_legs(open, close)),
                    );
                }
                (trips, dropped, mismatches)
            }
        };

        let daily = aggregate_daily(&round_trips, self.mode);
        let equity = to_cumulative(&to_sorted_series(&daily));
        let drawdown = compute_drawdown(&equity);

        ProfitRun {
            mode: self.mode,
            round_trips,
            dropped_legs,
            side_mismatches: mismatches,
            daily,
            equity,
            drawdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("date")
    }

    fn trip(symbol: &str, buy: f64, sell: f64, qty: f64, sell_date: &str) -> RoundTrip {
        RoundTrip {
            symbol: symbol.to_string(),
            buy_price: buy,
            sell_price: sell,
            quantity: qty,
            buy_date: day("2023-12-01"),
            sell_date: day(sell_date),
        }
    }

    fn leg(symbol: &str, price: f64, date: &str, side: Side) -> TradeLeg {
        TradeLeg {
            symbol: symbol.to_string(),
            price,
            quantity: 2.0,
            date: day(date),
            side,
        }
    }

    fn curve(values: &[f64]) -> Vec<EquityPoint> {
        let start = day("2024-01-01");
        values
            .iter()
            .enumerate()
            .map(|(idx, value)| EquityPoint {
                date: start + chrono::Duration::days(idx as i64),
                daily_profit: 0.0,
                cumulative_profit: *value,
            })
            .collect()
    }

    #[test]
    fn compute_profit_absolute_and_percent() {
        let t = trip("AIR", 10.0, 15.0, 2.0, "2024-01-01");
        assert_eq!(compute_profit(&t, ProfitMode::Absolute), 10.0);
        assert_eq!(compute_profit(&t, ProfitMode::PercentChange), 50.0);
    }

    #[test]
    fn same_day_trips_are_summed() {
        let trips = vec![
            trip("AIR", 10.0, 15.0, 2.0, "2024-01-01"),
            trip("FPH", 20.0, 18.0, 1.0, "2024-01-01"),
        ];
        let daily = aggregate_daily(&trips, ProfitMode::Absolute);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily.get(day("2024-01-01")), Some(8.0));

        let equity = to_cumulative(&to_sorted_series(&daily));
        assert_eq!(equity.len(), 1);
        assert_eq!(equity[0].cumulative_profit, 8.0);
        assert_eq!(compute_drawdown(&equity), Ok(0.0));
    }

    #[test]
    fn series_is_sorted_without_gap_fill() {
        let trips = vec![
            trip("AIR", 10.0, 11.0, 1.0, "2024-03-05"),
            trip("AIR", 10.0, 12.0, 1.0, "2024-01-02"),
            trip("AIR", 10.0, 9.0, 1.0, "2024-02-10"),
        ];
        let series = to_sorted_series(&aggregate_daily(&trips, ProfitMode::Absolute));
        let dates: Vec<NaiveDate> = series.iter().map(|(d, _)| *d).collect();
        assert_eq!(
            dates,
            vec![day("2024-01-02"), day("2024-02-10"), day("2024-03-05")]
        );

        let equity = to_cumulative(&series);
        let values: Vec<f64> = equity.iter().map(|p| p.cumulative_profit).collect();
        assert_eq!(values, vec![2.0, 1.0, 2.0]);
    }

    #[test]
    fn positional_pairing_drops_trailing_leg() {
        let legs = vec![
            leg("AIR", 1.0, "2024-01-01", Side::Buy),
            leg("AIR", 2.0, "2024-01-02", Side::Sell),
            leg("AIR", 3.0, "2024-01-03", Side::Buy),
            leg("AIR", 4.0, "2024-01-04", Side::Sell),
            leg("AIR", 5.0, "2024-01-05", Side::Buy),
        ];
        let pairs = pair_round_trips(&legs);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0.price, 1.0);
        assert_eq!(pairs[0].1.price, 2.0);
        assert_eq!(pairs[1].0.price, 3.0);
        assert_eq!(pairs[1].1.price, 4.0);
    }

    #[test]
    fn pairing_does_not_reconcile_sides() {
        let legs = vec![
            leg("AIR", 4.0, "2024-01-01", Side::Sell),
            leg("AIR", 3.0, "2024-01-02", Side::Sell),
        ];
        let pairs = pair_round_trips(&legs);
        assert_eq!(pairs.len(), 1);
        assert_eq!(side_mismatches(&pairs), 1);
    }

    #[test]
    fn group_by_symbol_keeps_relative_order() {
        let legs = vec![
            leg("AIR", 1.0, "2024-01-01", Side::Buy),
            leg("FPH", 7.0, "2024-01-01", Side::Buy),
            leg("AIR", 2.0, "2024-01-02", Side::Sell),
            leg("FPH", 8.0, "2024-01-03", Side::Sell),
        ];
        let groups = group_by_symbol(&legs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "AIR");
        assert_eq!(
            groups[0].1.iter().map(|l| l.price).collect::<Vec<_>>(),
            vec![1.0, 2.0]
        );
        assert_eq!(groups[1].0, "FPH");
        assert_eq!(
            groups[1].1.iter().map(|l| l.price).collect::<Vec<_>>(),
            vec![7.0, 8.0]
        );
    }

    #[test]
    fn drawdown_samples_odd_even_pairs_only() {
        // (80, 120) and (90, 150) never decline; the dip from 100 to 80 is invisible.
        assert_eq!(compute_drawdown(&curve(&[100.0, 80.0, 120.0, 90.0, 150.0])), Ok(0.0));
    }

    #[test]
    fn drawdown_accumulates_sampled_declines() {
        // pairs (1,2) = 120 -> 100 and (3,4) = 130 -> 100
        let result = compute_drawdown(&curve(&[50.0, 120.0, 100.0, 130.0, 100.0]));
        assert_eq!(result, Ok(50.0 / 100.0 * 100.0));
    }

    #[test]
    fn drawdown_skips_incomplete_trailing_pair() {
        // pair (1,2) = 10 -> 20; index 3 has no partner
        let result = compute_drawdown(&curve(&[5.0, 10.0, 20.0, 2.0]));
        assert_eq!(result, Ok(0.0));
    }

    #[test]
    fn drawdown_on_zero_final_equity_is_reported() {
        assert_eq!(
            compute_drawdown(&curve(&[10.0, 20.0, 0.0])),
            Err(ProfitError::DivisionByZero)
        );
    }

    #[test]
    fn drawdown_without_decline_on_negative_equity_is_positive_zero() {
        let pct = compute_drawdown(&curve(&[-5.0, -4.0, -3.0])).expect("defined");
        assert_eq!(pct, 0.0);
        assert!(pct.is_sign_positive());
    }

    #[test]
    fn drawdown_on_empty_curve_is_reported() {
        assert_eq!(compute_drawdown(&[]), Err(ProfitError::EmptyInput));
    }

    #[test]
    fn max_drawdown_tracks_running_peak() {
        let dd = max_drawdown(&curve(&[100.0, 80.0, 120.0, 90.0, 150.0]), None);
        assert_eq!(dd.absolute, 30.0);
        assert_eq!(dd.pct, None);

        let dd = max_drawdown(&curve(&[100.0, 80.0, 120.0, 90.0, 150.0]), Some(100.0));
        assert_eq!(dd.absolute, 30.0);
        let pct = dd.pct.expect("pct with capital");
        assert!((pct - 30.0 / 220.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn max_drawdown_counts_losses_from_zero() {
        let dd = max_drawdown(&curve(&[-5.0, -2.0]), None);
        assert_eq!(dd.absolute, 5.0);
    }

    #[test]
    fn engine_pairs_legs_per_symbol() {
        let legs = vec![
            leg("AIR", 10.0, "2024-01-01", Side::Buy),
            leg("FPH", 20.0, "2024-01-01", Side::Buy),
            leg("AIR", 15.0, "2024-01-02", Side::Sell),
            leg("FPH", 18.0, "2024-01-02", Side::Sell),
            leg("AIR", 30.0, "2024-01-03", Side::Buy),
        ];
        let run = ProfitEngine::new(ProfitMode::Absolute).run(&TradeBatch::Legs(legs));
        assert_eq!(run.round_trips.len(), 2);
        assert_eq!(run.dropped_legs, 1);
        assert_eq!(run.side_mismatches, 0);
        // (15-10)*2 + (18-20)*2
        assert_eq!(run.daily.get(day("2024-01-02")), Some(6.0));
        assert_eq!(run.equity.len(), 1);
        assert_eq!(run.drawdown, Ok(0.0));
    }

    #[test]
    fn engine_on_empty_batch_reports_empty_input() {
        let run = ProfitEngine::default().run(&TradeBatch::RoundTrips(Vec::new()));
        assert!(run.daily.is_empty());
        assert!(run.equity.is_empty());
        assert_eq!(run.drawdown, Err(ProfitError::EmptyInput));
    }
}
