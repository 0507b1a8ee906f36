use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::loan::{periodic_payment, LoanInput};
use crate::error::RefiError;
use crate::time_value::checked;
use crate::types::*;
use crate::RefiResult;

/// Longest table built row by row (100 years of monthly payments).
pub const MAX_SCHEDULE_PERIODS: u32 = 1200;

/// One period of an amortization table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    /// Balance after this period's payment
    pub balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub periodic_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub rows: Vec<ScheduleRow>,
}

/// Period-by-period amortization table for a level-payment loan.
///
/// The final row's principal absorbs accumulated rounding so the closing
/// balance is exactly zero.
pub fn amortization_schedule(
    principal: Money,
    periodic_rate: Rate,
    total_periods: u32,
) -> RefiResult<AmortizationSchedule> {
    if total_periods > MAX_SCHEDULE_PERIODS {
        return Err(RefiError::InvalidInput {
            field: "total_periods".into(),
            reason: format!(
                "Schedule is limited to {MAX_SCHEDULE_PERIODS} periods (got {total_periods})"
            ),
        });
    }
    let payment = periodic_payment(principal, periodic_rate, total_periods)?;

    let mut rows = Vec::with_capacity(total_periods as usize);
    let mut balance = principal;
    let mut total_paid = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;

    for period in 1..=total_periods {
        let interest = checked(balance.checked_mul(periodic_rate), "periodic_rate")?;
        let (principal_part, paid) = if period == total_periods {
            (balance, balance + interest)
        } else {
            (payment - interest, payment)
        };
        balance -= principal_part;
        total_paid = checked(total_paid.checked_add(paid), "periodic_payment")?;
        total_interest = checked(total_interest.checked_add(interest), "periodic_rate")?;

        rows.push(ScheduleRow {
            period,
            payment: paid,
            interest,
            principal: principal_part,
            balance,
        });
    }

    Ok(AmortizationSchedule {
        periodic_payment: payment,
        total_paid,
        total_interest,
        rows,
    })
}

/// Build the amortization table for a loan described in annual terms.
pub fn build_schedule(input: &LoanInput) -> RefiResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let schedule = amortization_schedule(
        input.principal,
        monthly_rate(input.annual_rate),
        years_to_periods(input.term_years)?,
    )?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Amortization schedule (level monthly payment)",
        input,
        Vec::new(),
        elapsed,
        schedule,
    ))
}
