use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use refi_wizard_core::amortization::loan::{self, LoanInput};
use refi_wizard_core::amortization::schedule;

use crate::input;

/// Loan terms shared by payment, balance and schedule
#[derive(Args)]
pub struct LoanArgs {
    /// Path to a JSON/YAML loan; unlike --rate, its annual_rate is a decimal
    /// (annual_rate 0.055, not 5.5)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 5.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub term_years: Option<u32>,
}

#[derive(Args)]
pub struct BalanceArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Monthly payments already made
    #[arg(long)]
    pub months_paid: Option<u32>,
}

fn loan_input(
    args: LoanArgs,
    months_paid: Option<u32>,
    require_months: bool,
) -> Result<LoanInput, Box<dyn std::error::Error>> {
    if let Some(mut loan) = input::load::<LoanInput>(args.input.as_deref())? {
        if let Some(months) = months_paid {
            loan.months_paid = months;
        }
        return Ok(loan);
    }

    let principal = args
        .principal
        .ok_or("--principal is required (or provide --input)")?;
    let rate_pct = args.rate.ok_or("--rate is required (or provide --input)")?;
    let term_years = args
        .term_years
        .ok_or("--term-years is required (or provide --input)")?;
    if require_months && months_paid.is_none() {
        return Err("--months-paid is required (or provide --input)".into());
    }

    Ok(LoanInput {
        principal,
        annual_rate: rate_pct / dec!(100),
        term_years,
        months_paid: months_paid.unwrap_or(0),
    })
}

pub fn run_payment(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = loan_input(args, None, false)?;
    let result = loan::analyze_loan(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_balance(args: BalanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = loan_input(args.loan, args.months_paid, true)?;
    let result = loan::analyze_loan(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = loan_input(args, None, false)?;
    let result = schedule::build_schedule(&terms)?;
    Ok(serde_json::to_value(result)?)
}
