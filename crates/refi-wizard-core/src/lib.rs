pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "refinance")]
pub mod refinance;

pub use error::RefiError;
pub use types::*;

/// Standard result type for all refi-wizard operations
pub type RefiResult<T> = Result<T, RefiError>;
