use crate::value_objects::trade::TradeBatch;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct TradeQuery {
    pub path: PathBuf,
}

pub trait TradeSource {
    /// Loads and shape-validates every trade record. Implementations fail on the first bad
    /// record instead of returning a partial batch.
    fn load_trades(&self, query: &TradeQuery) -> Result<TradeBatch, String>;
}
