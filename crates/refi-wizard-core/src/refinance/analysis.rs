//! Refinancing analysis: run the original loan up to the refinance point,
//! roll its balance into a new loan, and summarise interest on each side
//! together with a blended annual rate.
//!
//! The blended rate divides total interest by the principal times the sum of
//! the two *nominal* terms (`initial_term_years + new_term_years`), not by
//! the time actually elapsed (`refinance_after_years + new_term_years`). This
//! is a simple non-compounding approximation and is reported as a warning on
//! every result.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::display::RefinanceDisplay;
use crate::amortization::{periodic_payment, remaining_balance};
use crate::error::RefiError;
use crate::time_value::checked;
use crate::types::*;
use crate::RefiResult;

const EFFECTIVE_RATE_WARNING: &str = "Effective rate divides total interest by the sum of the \
     nominal loan terms, not by the time actually elapsed; treat it as an approximation";

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// Original loan, refinance point and new loan terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceInput {
    /// Original loan amount
    pub principal: Money,
    /// Original annual rate (e.g., 0.055 = 5.5%)
    pub initial_annual_rate: Rate,
    /// Original loan term in years
    pub initial_term_years: Years,
    /// Years of payments on the original loan before refinancing
    pub refinance_after_years: Years,
    /// New annual rate (e.g., 0.035 = 3.5%)
    pub new_annual_rate: Rate,
    /// New loan term in years
    pub new_term_years: Years,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceOutput {
    /// Payments made on the original loan before refinancing
    pub months_before_refinance: u32,
    /// Monthly payment on the original loan
    pub initial_payment: Money,
    /// Original loan balance carried into the new loan
    pub balance_at_refinance: Money,
    /// Monthly payment on the new loan
    pub new_payment: Money,
    pub interest_before_refinance: Money,
    pub interest_after_refinance: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    /// Blended simple annual rate in percent (1.69 = 1.69%)
    pub effective_annual_rate_pct: Decimal,
    /// Interest over the original loan's life had it never been refinanced
    pub baseline_total_interest: Money,
    /// Baseline interest minus total interest with refinancing
    pub interest_savings: Money,
    pub display: RefinanceDisplay,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyse a refinance of an amortizing loan.
pub fn analyze_refinance(
    input: &RefinanceInput,
) -> RefiResult<ComputationOutput<RefinanceOutput>> {
    let start = Instant::now();
    validate(input)?;

    let mut warnings: Vec<String> = Vec::new();

    let p = input.principal;
    let r1 = monthly_rate(input.initial_annual_rate);
    let n1 = years_to_periods(input.initial_term_years)?;
    let m = years_to_periods(input.refinance_after_years)?;
    let r2 = monthly_rate(input.new_annual_rate);
    let n2 = years_to_periods(input.new_term_years)?;

    // Original loan up to the refinance point
    let m1 = periodic_payment(p, r1, n1)?;
    let b1 = remaining_balance(p, r1, n1, m)?;
    let paid_before = checked(m1.checked_mul(Decimal::from(m)), "initial_payment")?;
    let interest_before = checked(paid_before.checked_sub(p - b1), "balance_at_refinance")?;
    debug!(%m1, %b1, %interest_before, months = m, "original loan at refinance point");

    // New loan on the carried balance
    let m2 = if b1.is_zero() {
        warnings.push(
            "Original loan is fully repaid at the refinance point; the new loan has no principal"
                .into(),
        );
        Decimal::ZERO
    } else {
        periodic_payment(b1, r2, n2)?
    };
    let paid_after = checked(m2.checked_mul(Decimal::from(n2)), "new_payment")?;
    let interest_after = paid_after - b1;
    debug!(%m2, %interest_after, "new loan");

    let total_paid = checked(paid_before.checked_add(paid_after), "total_paid")?;
    let total_interest = total_paid - p;
    let nominal_years =
        Decimal::from(u64::from(input.initial_term_years) + u64::from(input.new_term_years));
    let principal_years = checked(p.checked_mul(nominal_years), "principal")?;
    let effective_annual_rate_pct =
        checked(dec!(100).checked_mul(total_interest), "total_interest")? / principal_years;

    let lifetime_paid = checked(m1.checked_mul(Decimal::from(n1)), "initial_payment")?;
    let baseline_total_interest = lifetime_paid - p;
    let interest_savings =
        checked(baseline_total_interest.checked_sub(total_interest), "total_interest")?;
    debug!(%total_interest, %effective_annual_rate_pct, %interest_savings, "refinance totals");

    warnings.push(EFFECTIVE_RATE_WARNING.into());
    if input.new_annual_rate >= input.initial_annual_rate {
        warnings.push(format!(
            "New rate ({}) is not lower than the original rate ({})",
            input.new_annual_rate, input.initial_annual_rate
        ));
    }
    let horizon = u64::from(input.refinance_after_years) + u64::from(input.new_term_years);
    if horizon > u64::from(input.initial_term_years) {
        warnings.push(format!(
            "Refinancing extends repayment to {horizon} years from origination (original term {} years)",
            input.initial_term_years
        ));
    }
    if interest_savings < Decimal::ZERO {
        warnings.push("Refinancing costs more total interest than keeping the original loan".into());
    }

    let display = RefinanceDisplay::new(interest_before, interest_after, effective_annual_rate_pct);

    let output = RefinanceOutput {
        months_before_refinance: m,
        initial_payment: m1,
        balance_at_refinance: b1,
        new_payment: m2,
        interest_before_refinance: interest_before,
        interest_after_refinance: interest_after,
        total_paid,
        total_interest,
        effective_annual_rate_pct,
        baseline_total_interest,
        interest_savings,
        display,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Refinance analysis: level-payment amortization before and after refinancing, \
         simple blended annual rate over nominal terms",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate(input: &RefinanceInput) -> RefiResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(RefiError::InvalidInput {
            field: "principal".into(),
            reason: "Loan amount must be positive".into(),
        });
    }
    for (field, rate) in [
        ("initial_annual_rate", input.initial_annual_rate),
        ("new_annual_rate", input.new_annual_rate),
    ] {
        if rate < Decimal::ZERO {
            return Err(RefiError::InvalidInput {
                field: field.into(),
                reason: "Interest rate cannot be negative".into(),
            });
        }
    }
    for (field, years) in [
        ("initial_term_years", input.initial_term_years),
        ("refinance_after_years", input.refinance_after_years),
        ("new_term_years", input.new_term_years),
    ] {
        if years == 0 {
            return Err(RefiError::InvalidInput {
                field: field.into(),
                reason: "Must be at least one year".into(),
            });
        }
    }
    if input.refinance_after_years > input.initial_term_years {
        return Err(RefiError::InvalidInput {
            field: "refinance_after_years".into(),
            reason: format!(
                "Refinance point ({} years) is beyond the original term ({} years)",
                input.refinance_after_years, input.initial_term_years
            ),
        });
    }
    Ok(())
}
