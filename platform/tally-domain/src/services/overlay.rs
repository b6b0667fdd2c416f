use crate::value_objects::price_point::PricePoint;
use crate::value_objects::trade::RoundTrip;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeMarker {
    pub date: NaiveDate,
    pub price: f64,
}

/// Close-price history of one symbol with its entries and exits laid over it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolOverlay {
    pub symbol: String,
    pub prices: Vec<PricePoint>,
    pub buys: Vec<TradeMarker>,
    pub sells: Vec<TradeMarker>,
}

pub fn trips_for_symbol<'a>(trips: &'a [RoundTrip], symbol: &str) -> Vec<&'a RoundTrip> {
    trips.iter().filter(|trip| trip.symbol == symbol).collect()
}

/// Chart file name for a symbol. Anything other than ASCII alphanumerics, `.`, `-` and `_`
/// becomes `_`, so the name can never leave the graphs directory.
pub fn overlay_file_name(symbol: &str) -> String {
    let stem: String = symbol
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.chars().all(|c| c == '.') {
        stem.replace('.', "_")
    } else {
        stem
    };
    format!("{stem}.html")
}

pub fn build_overlay(
    symbol: &str,
    prices: Vec<PricePoint>,
    trips: &[&RoundTrip],
) -> SymbolOverlay {
    let buys = trips
        .iter()
        .map(|trip| TradeMarker {
            date: trip.buy_date,
            price: trip.buy_price,
        })
        .collect();
    let sells = trips
        .iter()
        .map(|trip| TradeMarker {
            date: trip.sell_date,
            price: trip.sell_price,
        })
        .collect();

    SymbolOverlay {
        symbol: symbol.to_string(),
        prices,
        buys,
        sells,
    }
}

#[cfg(test)]
mod tests {
    use super::{build_overlay, overlay_file_name, trips_for_symbol};
    use crate::value_objects::price_point::PricePoint;
    use crate::value_objects::trade::RoundTrip;
    use chrono::NaiveDate;

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("date")
    }

    #[test]
    fn overlay_marks_entries_and_exits() {
        let trips = vec![
            RoundTrip {
                symbol: "AIR".to_string(),
                buy_price: 1.5,
                sell_price: 1.8,
                quantity: 10.0,
                buy_date: day("2020-02-03"),
                sell_date: day("2020-02-20"),
            },
            RoundTrip {
                symbol: "FPH".to_string(),
                buy_price: 30.0,
                sell_price: 29.0,
                quantity: 1.0,
                buy_date: day("2020-02-04"),
                sell_date: day("2020-02-05"),
            },
        ];
        let selected = trips_for_symbol(&trips, "AIR");
        assert_eq!(selected.len(), 1);

        let prices = vec![PricePoint {
            date: day("2020-02-03"),
            close: 1.5,
        }];
        let overlay = build_overlay("AIR", prices, &selected);
        assert_eq!(overlay.buys.len(), 1);
        assert_eq!(overlay.buys[0].date, day("2020-02-03"));
        assert_eq!(overlay.sells[0].price, 1.8);
        assert_eq!(overlay.prices.len(), 1);
    }

    #[test]
    fn overlay_file_name_stays_inside_graphs_dir() {
        assert_eq!(overlay_file_name("AIR.NZ"), "AIR.NZ.html");
        assert_eq!(overlay_file_name("BRK/B"), "BRK_B.html");
        assert_eq!(overlay_file_name("../x"), ".._x.html");
        assert_eq!(overlay_file_name(".."), "__.html");
        assert_eq!(overlay_file_name("a\\b c"), "a_b_c.html");
    }
}
