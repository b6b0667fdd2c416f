pub mod equity_point;
pub mod price_point;
pub mod profit_mode;
pub mod side;
pub mod trade;
