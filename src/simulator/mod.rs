pub mod profitability;

pub use profitability::simulate;
