pub mod batch;
pub mod overlay;
pub mod profit;
