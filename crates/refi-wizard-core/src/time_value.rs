use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::RefiError;
use crate::types::{Money, Rate};
use crate::RefiResult;

/// Lift a checked Decimal operation into a `RefiResult`.
///
/// `None` means the result left the Decimal range; `field` names the operand
/// that drove it there.
pub(crate) fn checked(value: Option<Decimal>, field: &str) -> RefiResult<Decimal> {
    value.ok_or_else(|| RefiError::InvalidInput {
        field: field.into(),
        reason: "Result exceeds the representable decimal range".into(),
    })
}

/// (1 + rate)^nper by iterative multiplication.
///
/// Integer periods keep the factor exact to Decimal precision, which
/// `powd` does not guarantee. Fails instead of panicking when the factor
/// leaves the Decimal range.
pub fn compound_factor(rate: Rate, nper: u32) -> RefiResult<Decimal> {
    let one_plus_r = Decimal::ONE + rate;
    let mut factor = Decimal::ONE;
    for period in 0..nper {
        factor = factor
            .checked_mul(one_plus_r)
            .ok_or_else(|| RefiError::InvalidInput {
                field: "nper".into(),
                reason: format!("Compound factor overflows at period {}", period + 1),
            })?;
    }
    Ok(factor)
}

/// Present Value
pub fn pv(rate: Rate, nper: u32, pmt: Money, fv: Money) -> RefiResult<Money> {
    if rate.is_zero() {
        let paid = checked(pmt.checked_mul(Decimal::from(nper)), "pmt")?;
        return Ok(-checked(paid.checked_add(fv), "fv")?);
    }

    let factor = compound_factor(rate, nper)?;

    if factor.is_zero() {
        return Err(RefiError::DivisionByZero {
            context: "PV factor".into(),
        });
    }

    let discount = checked(Decimal::ONE.checked_div(factor), "rate")?;
    let annuity_factor = checked((Decimal::ONE - discount).checked_div(rate), "rate")?;
    let payments = checked(pmt.checked_mul(annuity_factor), "pmt")?;
    let terminal = checked(fv.checked_div(factor), "fv")?;
    Ok(-checked(payments.checked_add(terminal), "fv")?)
}

/// Future Value
pub fn fv(rate: Rate, nper: u32, pmt: Money, present_value: Money) -> RefiResult<Money> {
    if rate.is_zero() {
        let paid = checked(pmt.checked_mul(Decimal::from(nper)), "pmt")?;
        return Ok(-checked(present_value.checked_add(paid), "present_value")?);
    }

    let factor = compound_factor(rate, nper)?;
    let annuity_factor = checked((factor - Decimal::ONE).checked_div(rate), "rate")?;

    let grown = checked(present_value.checked_mul(factor), "present_value")?;
    let payments = checked(pmt.checked_mul(annuity_factor), "pmt")?;
    Ok(-checked(grown.checked_add(payments), "present_value")?)
}

/// Payment (PMT)
pub fn pmt(rate: Rate, nper: u32, present_value: Money, future_value: Money) -> RefiResult<Money> {
    if nper == 0 {
        return Err(RefiError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        let total = checked(present_value.checked_add(future_value), "present_value")?;
        return Ok(-total / Decimal::from(nper));
    }

    if rate <= dec!(-1) {
        return Err(RefiError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be greater than -100%".into(),
        });
    }

    let factor = compound_factor(rate, nper)?;
    let annuity_factor = checked((factor - Decimal::ONE).checked_div(rate), "rate")?;

    if annuity_factor.is_zero() {
        return Err(RefiError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    let grown = checked(present_value.checked_mul(factor), "present_value")?;
    let target = checked(grown.checked_add(future_value), "present_value")?;
    Ok(-checked(target.checked_div(annuity_factor), "rate")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pv_basic() {
        let result = pv(dec!(0.08), 10, dec!(-100), dec!(0)).unwrap();
        // PV of annuity: 100 * (1 - 1/1.08^10) / 0.08 = ~671
        assert!((result - dec!(671)).abs() < dec!(2.0));
    }

    #[test]
    fn test_pmt_standard_mortgage() {
        // $100k over 30 years at 6% => ~$599.55/month
        let result = pmt(dec!(0.005), 360, dec!(100000), dec!(0)).unwrap();
        assert!((result + dec!(599.55)).abs() < dec!(0.01));
    }

    #[test]
    fn test_pmt_zero_rate_is_linear() {
        let result = pmt(dec!(0), 12, dec!(1200), dec!(0)).unwrap();
        assert_eq!(result, dec!(-100));
    }

    #[test]
    fn test_pmt_zero_periods_rejected() {
        assert!(pmt(dec!(0.01), 0, dec!(1000), dec!(0)).is_err());
    }

    #[test]
    fn test_fv_of_loan_after_full_term_is_zero() {
        let payment = pmt(dec!(0.005), 360, dec!(100000), dec!(0)).unwrap();
        let balance = fv(dec!(0.005), 360, payment, dec!(100000)).unwrap();
        assert!(balance.abs() < dec!(0.000001));
    }

    #[test]
    fn test_compound_factor_exact() {
        assert_eq!(compound_factor(dec!(0.1), 2).unwrap(), dec!(1.21));
        assert_eq!(compound_factor(dec!(0.05), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_compound_factor_overflow_is_error() {
        assert!(compound_factor(dec!(1), 200).is_err());
    }

    #[test]
    fn test_pmt_product_overflow_is_error() {
        // 1.05^1200 fits in a Decimal, 500k times it does not
        assert!(compound_factor(dec!(0.05), 1200).is_ok());
        match pmt(dec!(0.05), 1200, dec!(500000), dec!(0)).unwrap_err() {
            RefiError::InvalidInput { field, .. } => assert_eq!(field, "present_value"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fv_product_overflow_is_error() {
        assert!(fv(dec!(0.05), 1200, dec!(-1), dec!(500000)).is_err());
    }

    #[test]
    fn test_zero_rate_sum_overflow_is_error() {
        assert!(pmt(dec!(0), 12, Decimal::MAX, Decimal::MAX).is_err());
        assert!(fv(dec!(0), 12, Decimal::MAX, dec!(0)).is_err());
    }
}
