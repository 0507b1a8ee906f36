//! Level-payment loan math: the fixed periodic payment and the outstanding
//! balance after a number of payments.
//!
//! Both are closed forms over the time-value primitives. A periodic rate of
//! exactly zero takes the linear branch (`P / n`, `P - M*m`) instead of the
//! annuity formula.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::RefiError;
use crate::time_value::{self, checked};
use crate::types::*;
use crate::RefiResult;

/// Balances closer to zero than this are rounding noise and reported as zero.
const BALANCE_EPSILON: Decimal = dec!(0.000000000001);

/// Fixed per-period payment that fully amortizes `principal` over
/// `total_periods` at `periodic_rate`.
///
/// `M = P*r / (1 - (1+r)^-n)` for `r > 0`, `M = P / n` for `r == 0`.
pub fn periodic_payment(principal: Money, periodic_rate: Rate, total_periods: u32) -> RefiResult<Money> {
    validate_loan_terms(principal, periodic_rate, total_periods)?;
    let payment = -time_value::pmt(periodic_rate, total_periods, principal, Decimal::ZERO)?;
    debug!(%principal, %periodic_rate, total_periods, %payment, "periodic payment");
    Ok(payment)
}

/// Outstanding principal after `periods_elapsed` of `total_periods` level
/// payments have been made.
///
/// `B = P*(1+r)^m - M*((1+r)^m - 1)/r` for `r > 0`, `B = P - M*m` for `r == 0`.
pub fn remaining_balance(
    principal: Money,
    periodic_rate: Rate,
    total_periods: u32,
    periods_elapsed: u32,
) -> RefiResult<Money> {
    if periods_elapsed > total_periods {
        return Err(RefiError::InvalidInput {
            field: "periods_elapsed".into(),
            reason: format!(
                "Periods elapsed ({periods_elapsed}) cannot exceed the loan term ({total_periods})"
            ),
        });
    }
    let payment = periodic_payment(principal, periodic_rate, total_periods)?;
    let balance = -time_value::fv(periodic_rate, periods_elapsed, -payment, principal)?;
    let balance = if balance.abs() < BALANCE_EPSILON {
        Decimal::ZERO
    } else {
        balance
    };
    debug!(periods_elapsed, %balance, "remaining balance");
    Ok(balance)
}

fn validate_loan_terms(principal: Money, periodic_rate: Rate, total_periods: u32) -> RefiResult<()> {
    if principal <= Decimal::ZERO {
        return Err(RefiError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if periodic_rate < Decimal::ZERO {
        return Err(RefiError::InvalidInput {
            field: "periodic_rate".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if total_periods == 0 {
        return Err(RefiError::InvalidInput {
            field: "total_periods".into(),
            reason: "Loan term must be at least one period".into(),
        });
    }
    Ok(())
}

/// A single loan described the way a borrower states it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    /// Amount borrowed
    pub principal: Money,
    /// Annual interest rate (e.g., 0.055 = 5.5%)
    pub annual_rate: Rate,
    /// Loan term in years
    pub term_years: Years,
    /// Monthly payments already made
    #[serde(default)]
    pub months_paid: u32,
}

/// Payment, balance and interest figures for a single loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOutput {
    pub periodic_rate: Rate,
    pub total_periods: u32,
    pub periodic_payment: Money,
    pub months_paid: u32,
    pub remaining_balance: Money,
    pub principal_repaid: Money,
    pub interest_paid: Money,
    pub total_paid_over_life: Money,
    pub total_interest_over_life: Money,
}

/// Analyse a level-payment loan: payment, balance after `months_paid` and
/// interest to date and over the full term.
pub fn analyze_loan(input: &LoanInput) -> RefiResult<ComputationOutput<LoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let periodic_rate = monthly_rate(input.annual_rate);
    let total_periods = years_to_periods(input.term_years)?;

    let payment = periodic_payment(input.principal, periodic_rate, total_periods)?;
    let balance = remaining_balance(input.principal, periodic_rate, total_periods, input.months_paid)?;

    if periodic_rate.is_zero() {
        warnings.push("Zero interest rate: payments are straight-line principal".into());
    }

    let paid = checked(
        payment.checked_mul(Decimal::from(input.months_paid)),
        "periodic_payment",
    )?;
    let principal_repaid = input.principal - balance;
    let total_paid_over_life =
        checked(payment.checked_mul(Decimal::from(total_periods)), "periodic_payment")?;

    let output = LoanOutput {
        periodic_rate,
        total_periods,
        periodic_payment: payment,
        months_paid: input.months_paid,
        remaining_balance: balance,
        principal_repaid,
        interest_paid: paid - principal_repaid,
        total_paid_over_life,
        total_interest_over_life: total_paid_over_life - input.principal,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment annuity amortization (monthly compounding)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
