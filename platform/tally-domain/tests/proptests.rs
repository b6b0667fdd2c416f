use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use tally_domain::services::profit::{
    aggregate_daily, compute_drawdown, compute_profit, pair_round_trips, to_cumulative,
    to_sorted_series,
};
use tally_domain::value_objects::equity_point::EquityPoint;
use tally_domain::value_objects::profit_mode::ProfitMode;
use tally_domain::value_objects::side::Side;
use tally_domain::value_objects::trade::{RoundTrip, TradeLeg};

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date")
}

fn trip_strategy() -> impl Strategy<Value = RoundTrip> {
    (0.01f64..1_000.0, 0.01f64..1_000.0, 0.01f64..100.0, 0i64..60).prop_map(
        |(buy, sell, qty, offset)| RoundTrip {
            symbol: "AIR".to_string(),
            buy_price: buy,
            sell_price: sell,
            quantity: qty,
            buy_date: epoch(),
            sell_date: epoch() + Duration::days(offset),
        },
    )
}

fn tolerance(values: &[f64]) -> f64 {
    1e-9 * values.iter().map(|v| v.abs()).sum::<f64>().max(1.0)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn aggregation_preserves_total(trips in prop::collection::vec(trip_strategy(), 0..80)) {
        let profits: Vec<f64> = trips
            .iter()
            .map(|trip| compute_profit(trip, ProfitMode::Absolute))
            .collect();
        let expected: f64 = profits.iter().sum();
        let daily = aggregate_daily(&trips, ProfitMode::Absolute);
        prop_assert!((daily.total() - expected).abs() <= tolerance(&profits));
    }

    #[test]
    fn cumulative_keeps_length_and_ends_at_total(
        trips in prop::collection::vec(trip_strategy(), 1..80)
    ) {
        let daily = aggregate_daily(&trips, ProfitMode::Absolute);
        let series = to_sorted_series(&daily);
        let curve = to_cumulative(&series);

        prop_assert_eq!(curve.len(), series.len());
        prop_assert!(curve.windows(2).all(|pair| pair[0].date < pair[1].date));
        let values: Vec<f64> = series.iter().map(|(_, p)| *p).collect();
        let last = curve.last().map(|p| p.cumulative_profit).unwrap_or(0.0);
        prop_assert!((last - daily.total()).abs() <= tolerance(&values));
    }

    #[test]
    fn non_decreasing_curve_has_zero_drawdown(
        increments in prop::collection::vec(0.0f64..500.0, 1..100),
        start in 0.01f64..100.0
    ) {
        let mut running = start;
        let curve: Vec<EquityPoint> = increments
            .iter()
            .enumerate()
            .map(|(idx, inc)| {
                if idx > 0 {
                    running += inc;
                }
                EquityPoint {
                    date: epoch() + Duration::days(idx as i64),
                    daily_profit: *inc,
                    cumulative_profit: running,
                }
            })
            .collect();
        prop_assert_eq!(compute_drawdown(&curve), Ok(0.0));
    }

    #[test]
    fn pairing_yields_half_the_legs(count in 0usize..40) {
        let legs: Vec<TradeLeg> = (0..count)
            .map(|idx| TradeLeg {
                symbol: "AIR".to_string(),
                price: 1.0 + idx as f64,
                quantity: 1.0,
                date: epoch() + Duration::days(idx as i64),
                side: if idx % 2 == 0 { Side::Buy } else { Side::Sell },
            })
            .collect();
        let pairs = pair_round_trips(&legs);
        prop_assert_eq!(pairs.len(), count / 2);
        prop_assert!(pairs
            .iter()
            .all(|(open, close)| open.side == Side::Buy && close.side == Side::Sell));
    }
}
