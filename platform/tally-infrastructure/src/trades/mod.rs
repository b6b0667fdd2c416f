use crate::dates::parse_optional_day;
use serde::Deserialize;
use std::fs;
use tally_domain::error::ProfitError;
use tally_domain::repositories::trades::{TradeQuery, TradeSource};
use tally_domain::value_objects::trade::{validate_records, RawTrade, TradeBatch};
use tracing::debug;

/// `trades.json` record. Both shapes share one struct; shape checks happen in the domain.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct TradeRecord {
    symbol: Option<String>,
    buy_price: Option<f64>,
    sell_price: Option<f64>,
    buy_date: Option<String>,
    sell_date: Option<String>,
    price: Option<f64>,
    date: Option<String>,
    was_buying: Option<bool>,
    quantity: Option<f64>,
}

impl TradeRecord {
    fn into_raw(self) -> Result<RawTrade, ProfitError> {
        Ok(RawTrade {
            symbol: self.symbol,
            buy_price: self.buy_price,
            sell_price: self.sell_price,
            buy_date: parse_optional_day(self.buy_date.as_deref())?,
            sell_date: parse_optional_day(self.sell_date.as_deref())?,
            price: self.price,
            date: parse_optional_day(self.date.as_deref())?,
            was_buying: self.was_buying,
            quantity: self.quantity,
        })
    }
}

pub fn parse_trades_json(raw: &str) -> Result<TradeBatch, String> {
    let records: Vec<TradeRecord> =
        serde_json::from_str(raw).map_err(|err| format!("failed to parse trades JSON: {err}"))?;
    let raw_trades = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            record
                .into_raw()
                .map_err(|err| format!("trade record {index}: {err}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    validate_records(&raw_trades).map_err(|err| err.to_string())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonTradeSource;

impl JsonTradeSource {
    pub fn new() -> Self {
        Self
    }
}

impl TradeSource for JsonTradeSource {
    fn load_trades(&self, query: &TradeQuery) -> Result<TradeBatch, String> {
        let contents = fs::read_to_string(&query.path)
            .map_err(|err| format!("failed to read trades {}: {}", query.path.display(), err))?;
        let batch = parse_trades_json(&contents)
            .map_err(|err| format!("invalid trades {}: {}", query.path.display(), err))?;
        debug!(
            path = %query.path.display(),
            records = batch.len(),
            shape = batch.shape(),
            "trades loaded"
        );
        Ok(batch)
    }
}
