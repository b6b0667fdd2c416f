use crate::value_objects::price_point::PricePoint;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct PriceHistoryQuery {
    pub history_dir: PathBuf,
    pub symbol: String,
}

pub trait PriceHistoryRepository {
    fn load_history(&self, query: &PriceHistoryQuery) -> Result<Vec<PricePoint>, String>;
}
