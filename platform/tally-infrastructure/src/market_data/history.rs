use crate::dates::parse_day;
use serde::Deserialize;
use tally_domain::repositories::price_history::{PriceHistoryQuery, PriceHistoryRepository};
use tally_domain::value_objects::price_point::PricePoint;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CandleRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Close")]
    close: String,
}

/// Reads `history/{SYMBOL}.csv` daily candles (Yahoo-style header). Rows whose close is blank
/// or `null` are skipped; an unparsable date is an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvPriceHistoryRepository;

impl CsvPriceHistoryRepository {
    pub fn new() -> Self {
        Self
    }
}

impl PriceHistoryRepository for CsvPriceHistoryRepository {
    fn load_history(&self, query: &PriceHistoryQuery) -> Result<Vec<PricePoint>, String> {
        let path = query
            .history_dir
            .join(format!("{}.csv", query.symbol.to_uppercase()));
        let mut rdr = csv::Reader::from_path(&path)
            .map_err(|err| format!("failed to open history csv {}: {}", path.display(), err))?;

        let mut points = Vec::new();
        let mut skipped = 0usize;
        for (row, result) in rdr.deserialize::<CandleRecord>().enumerate() {
            let record = result.map_err(|err| {
                format!("failed to parse history row {} in {}: {}", row, path.display(), err)
            })?;
            let date = parse_day(&record.date)
                .map_err(|err| format!("history row {} in {}: {}", row, path.display(), err))?;
            let close = record.close.trim();
            if close.is_empty() || close.eq_ignore_ascii_case("null") {
                skipped += 1;
                continue;
            }
            let close: f64 = close.parse().map_err(|_| {
                format!(
                    "invalid close '{}' at history row {} in {}",
                    close,
                    row,
                    path.display()
                )
            })?;
            points.push(PricePoint { date, close });
        }

        debug!(symbol = %query.symbol, points = points.len(), skipped, "price history loaded");
        Ok(points)
    }
}
