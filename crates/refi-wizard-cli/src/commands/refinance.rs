use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use refi_wizard_core::refinance::{evaluate_form, InputLimits, RefinanceForm};

use crate::input;

/// Arguments for refinance analysis. Flag defaults are the form defaults.
#[derive(Args)]
pub struct RefinanceArgs {
    /// Path to a JSON/YAML form (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Initial loan amount ($)
    #[arg(long, default_value = "500000")]
    pub principal: Decimal,

    /// Initial interest rate (annual %, e.g. 5.5)
    #[arg(long, default_value = "5.5")]
    pub initial_rate: Decimal,

    /// Initial loan term (years)
    #[arg(long, default_value_t = 30)]
    pub initial_term: u32,

    /// Time before refinancing (years)
    #[arg(long, default_value_t = 10)]
    pub refinance_after: u32,

    /// New interest rate after refinancing (annual %)
    #[arg(long, default_value = "3.5")]
    pub new_rate: Decimal,

    /// New loan term after refinancing (years)
    #[arg(long, default_value_t = 30)]
    pub new_term: u32,

    /// Smallest accepted loan amount
    #[arg(long, default_value = "1000")]
    pub min_principal: Decimal,

    /// Smallest accepted interest rate (annual %)
    #[arg(long, default_value = "0.1")]
    pub min_rate: Decimal,

    /// Shortest accepted loan term, initial and new (years)
    #[arg(long, default_value_t = 1)]
    pub min_term: u32,

    /// Shortest accepted time before refinancing (years)
    #[arg(long, default_value_t = 1)]
    pub min_refinance_after: u32,
}

pub fn run_refinance(args: RefinanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let form: RefinanceForm = match input::load(args.input.as_deref())? {
        Some(form) => form,
        None => RefinanceForm {
            principal: args.principal,
            initial_rate_pct: args.initial_rate,
            initial_term_years: args.initial_term,
            refinance_after_years: args.refinance_after,
            new_rate_pct: args.new_rate,
            new_term_years: args.new_term,
        },
    };
    let limits = InputLimits {
        min_principal: args.min_principal,
        min_annual_rate_pct: args.min_rate,
        min_term_years: args.min_term,
        min_refinance_after_years: args.min_refinance_after,
    };

    let result = evaluate_form(&form, &limits)?;
    Ok(serde_json::to_value(result)?)
}
