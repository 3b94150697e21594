pub mod curves;
pub mod distribution;
pub mod market_data;
