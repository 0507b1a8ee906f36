use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RefiError;
use crate::RefiResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Loan terms and elapsed time in whole years
pub type Years = u32;

/// Number of monthly periods in a year
pub const PERIODS_PER_YEAR: u32 = 12;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Convert an annual rate to the monthly periodic rate.
pub fn monthly_rate(annual_rate: Rate) -> Rate {
    annual_rate / Decimal::from(PERIODS_PER_YEAR)
}

/// Convert a term in years to monthly periods.
pub fn years_to_periods(years: Years) -> RefiResult<u32> {
    years
        .checked_mul(PERIODS_PER_YEAR)
        .ok_or_else(|| RefiError::InvalidInput {
            field: "term_years".into(),
            reason: format!("{years} years is too many monthly periods to count"),
        })
}
