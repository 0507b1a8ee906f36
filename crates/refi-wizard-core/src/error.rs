use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefiError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid input: {field} must be at least {minimum} (got {value})")]
    BelowMinimum {
        field: String,
        minimum: Decimal,
        value: Decimal,
    },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RefiError {
    fn from(e: serde_json::Error) -> Self {
        RefiError::SerializationError(e.to_string())
    }
}
