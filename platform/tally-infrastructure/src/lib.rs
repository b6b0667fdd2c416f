pub mod artifacts;
pub mod dates;
pub mod market_data;
pub mod reporting;
pub mod symbols;
pub mod trades;
