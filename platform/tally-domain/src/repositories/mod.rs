pub mod artifacts;
pub mod price_history;
pub mod symbols;
pub mod trades;
