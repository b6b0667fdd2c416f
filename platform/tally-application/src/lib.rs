pub mod config;
pub mod meta;
pub mod overlays;
pub mod profit_report;
mod shared;
pub mod validation;
