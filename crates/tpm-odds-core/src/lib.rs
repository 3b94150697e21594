pub mod curves;
pub mod error;
pub mod types;

#[cfg(feature = "distribution")]
pub mod distribution;

#[cfg(feature = "market_data")]
pub mod market_data;

pub use error::TpmOddsError;
pub use types::*;

/// Standard result type for all tpm-odds operations
pub type TpmOddsResult<T> = Result<T, TpmOddsError>;
