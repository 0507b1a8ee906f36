//! The input boundary of the calculator: values as a page or terminal
//! collects them (amounts, percent rates, whole years), their minimums, and
//! conversion into a [`RefinanceInput`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::analysis::{analyze_refinance, RefinanceInput, RefinanceOutput};
use crate::error::RefiError;
use crate::types::*;
use crate::RefiResult;

/// Minimum accepted value for each form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    pub min_principal: Money,
    /// Percent, e.g. 0.1 = 0.1%
    pub min_annual_rate_pct: Decimal,
    pub min_term_years: Years,
    pub min_refinance_after_years: Years,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            min_principal: dec!(1000),
            min_annual_rate_pct: dec!(0.1),
            min_term_years: 1,
            min_refinance_after_years: 1,
        }
    }
}

/// Refinance scenario as entered on the form. Rates are annual percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinanceForm {
    /// Initial loan amount ($)
    pub principal: Money,
    /// Initial interest rate (%)
    pub initial_rate_pct: Decimal,
    /// Initial loan term (years)
    pub initial_term_years: Years,
    /// Time before refinancing (years)
    pub refinance_after_years: Years,
    /// New interest rate after refinancing (%)
    pub new_rate_pct: Decimal,
    /// New loan term after refinancing (years)
    pub new_term_years: Years,
}

impl Default for RefinanceForm {
    fn default() -> Self {
        Self {
            principal: dec!(500000),
            initial_rate_pct: dec!(5.5),
            initial_term_years: 30,
            refinance_after_years: 10,
            new_rate_pct: dec!(3.5),
            new_term_years: 30,
        }
    }
}

impl RefinanceForm {
    /// Check every field against `limits` and convert to analysis input.
    /// The first violation is returned; nothing is computed on failure.
    pub fn validate(&self, limits: &InputLimits) -> RefiResult<RefinanceInput> {
        at_least("principal", self.principal, limits.min_principal)?;
        at_least("initial_rate_pct", self.initial_rate_pct, limits.min_annual_rate_pct)?;
        at_least(
            "initial_term_years",
            Decimal::from(self.initial_term_years),
            Decimal::from(limits.min_term_years),
        )?;
        at_least(
            "refinance_after_years",
            Decimal::from(self.refinance_after_years),
            Decimal::from(limits.min_refinance_after_years),
        )?;
        at_least("new_rate_pct", self.new_rate_pct, limits.min_annual_rate_pct)?;
        at_least(
            "new_term_years",
            Decimal::from(self.new_term_years),
            Decimal::from(limits.min_term_years),
        )?;

        if self.refinance_after_years > self.initial_term_years {
            return Err(RefiError::InvalidInput {
                field: "refinance_after_years".into(),
                reason: format!(
                    "Time before refinancing ({} years) exceeds the initial loan term ({} years)",
                    self.refinance_after_years, self.initial_term_years
                ),
            });
        }

        Ok(RefinanceInput {
            principal: self.principal,
            initial_annual_rate: self.initial_rate_pct / dec!(100),
            initial_term_years: self.initial_term_years,
            refinance_after_years: self.refinance_after_years,
            new_annual_rate: self.new_rate_pct / dec!(100),
            new_term_years: self.new_term_years,
        })
    }
}

fn at_least(field: &str, value: Decimal, minimum: Decimal) -> RefiResult<()> {
    if value < minimum {
        return Err(RefiError::BelowMinimum {
            field: field.into(),
            minimum,
            value,
        });
    }
    Ok(())
}

/// Validate a submitted form and run the refinance analysis on it.
pub fn evaluate_form(
    form: &RefinanceForm,
    limits: &InputLimits,
) -> RefiResult<ComputationOutput<RefinanceOutput>> {
    let input = form.validate(limits)?;
    debug!(?input, "form accepted");
    analyze_refinance(&input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn below_minimum_field(form: &RefinanceForm) -> String {
        match form.validate(&InputLimits::default()).unwrap_err() {
            RefiError::BelowMinimum { field, .. } => field,
            other => panic!("expected BelowMinimum, got {other}"),
        }
    }

    #[test]
    fn test_defaults_convert_to_decimal_rates() {
        let input = RefinanceForm::default()
            .validate(&InputLimits::default())
            .unwrap();
        assert_eq!(
            input,
            RefinanceInput {
                principal: dec!(500000),
                initial_annual_rate: dec!(0.055),
                initial_term_years: 30,
                refinance_after_years: 10,
                new_annual_rate: dec!(0.035),
                new_term_years: 30,
            }
        );
    }

    #[test]
    fn test_each_minimum_enforced() {
        let base = RefinanceForm::default();

        let f = RefinanceForm { principal: dec!(999.99), ..base.clone() };
        assert_eq!(below_minimum_field(&f), "principal");

        let f = RefinanceForm { initial_rate_pct: dec!(0.05), ..base.clone() };
        assert_eq!(below_minimum_field(&f), "initial_rate_pct");

        let f = RefinanceForm { initial_term_years: 0, ..base.clone() };
        assert_eq!(below_minimum_field(&f), "initial_term_years");

        let f = RefinanceForm { refinance_after_years: 0, ..base.clone() };
        assert_eq!(below_minimum_field(&f), "refinance_after_years");

        let f = RefinanceForm { new_rate_pct: dec!(0), ..base.clone() };
        assert_eq!(below_minimum_field(&f), "new_rate_pct");

        let f = RefinanceForm { new_term_years: 0, ..base };
        assert_eq!(below_minimum_field(&f), "new_term_years");
    }

    #[test]
    fn test_minimums_are_inclusive() {
        let form = RefinanceForm {
            principal: dec!(1000),
            initial_rate_pct: dec!(0.1),
            initial_term_years: 1,
            refinance_after_years: 1,
            new_rate_pct: dec!(0.1),
            new_term_years: 1,
        };
        assert!(form.validate(&InputLimits::default()).is_ok());
    }

    #[test]
    fn test_refinance_after_term_rejected() {
        let form = RefinanceForm {
            initial_term_years: 15,
            refinance_after_years: 16,
            ..RefinanceForm::default()
        };
        assert!(matches!(
            form.validate(&InputLimits::default()),
            Err(RefiError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_custom_limits() {
        let limits = InputLimits {
            min_principal: dec!(50000),
            ..InputLimits::default()
        };
        let form = RefinanceForm {
            principal: dec!(20000),
            ..RefinanceForm::default()
        };
        assert!(form.validate(&limits).is_err());
    }

    #[test]
    fn test_partial_json_form_takes_defaults() {
        let form: RefinanceForm = serde_json::from_str(r#"{"principal": "250000"}"#).unwrap();
        assert_eq!(form.principal, dec!(250000));
        assert_eq!(form.initial_rate_pct, dec!(5.5));
        assert_eq!(form.new_term_years, 30);
    }

    #[test]
    fn test_evaluate_form_renders_outputs() {
        let out = evaluate_form(&RefinanceForm::default(), &InputLimits::default()).unwrap();
        assert_eq!(
            out.result.display.interest_before,
            "Total interest paid before refinancing: $253,378.36"
        );
        assert_eq!(
            out.result.display.interest_after,
            "Total interest paid after refinancing: $254,457.73"
        );
        assert_eq!(
            out.result.display.effective_rate,
            "Effective interest rate over the entire period: 1.69%"
        );
    }
}
