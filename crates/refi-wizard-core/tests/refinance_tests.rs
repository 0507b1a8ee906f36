use pretty_assertions::assert_eq;
use proptest::prelude::*;
use refi_wizard_core::amortization::{periodic_payment, remaining_balance};
use refi_wizard_core::refinance::{
    analyze_refinance, evaluate_form, InputLimits, RefinanceForm, RefinanceInput,
};
use refi_wizard_core::RefiError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn scenario_a() -> RefinanceInput {
    RefinanceInput {
        principal: dec!(500000),
        initial_annual_rate: dec!(0.055),
        initial_term_years: 30,
        refinance_after_years: 10,
        new_annual_rate: dec!(0.035),
        new_term_years: 30,
    }
}

// ===========================================================================
// Worked scenarios
// ===========================================================================

#[test]
fn test_scenario_a_balance_matches_formula() {
    let out = analyze_refinance(&scenario_a()).unwrap().result;

    let r1 = dec!(0.055) / dec!(12);
    let expected_b1 = remaining_balance(dec!(500000), r1, 360, 120).unwrap();
    assert_eq!(out.balance_at_refinance, expected_b1);
    // 30-year $500k at 5.5% after 120 payments
    assert!(
        out.balance_at_refinance > dec!(412704) && out.balance_at_refinance < dec!(412706),
        "B1 = {}",
        out.balance_at_refinance
    );
}

#[test]
fn test_scenario_a_interest_after_recomputed() {
    let out = analyze_refinance(&scenario_a()).unwrap().result;
    let r2 = dec!(0.035) / dec!(12);
    let m2 = periodic_payment(out.balance_at_refinance, r2, 360).unwrap();
    assert_eq!(out.new_payment, m2);
    assert_eq!(
        out.interest_after_refinance,
        m2 * dec!(360) - out.balance_at_refinance
    );
}

#[test]
fn test_scenario_b_zero_initial_rate() {
    let input = RefinanceInput {
        initial_annual_rate: Decimal::ZERO,
        ..scenario_a()
    };
    let out = analyze_refinance(&input).unwrap().result;
    assert_eq!(out.initial_payment, dec!(500000) / dec!(360));
    assert!(out.interest_before_refinance.abs() < dec!(0.0000001));
}

#[test]
fn test_scenario_c_same_terms_continue_original_loan() {
    // Refinancing into the same rate for the remaining term changes nothing
    let input = RefinanceInput {
        new_annual_rate: dec!(0.055),
        new_term_years: 20,
        ..scenario_a()
    };
    let out = analyze_refinance(&input).unwrap().result;

    assert!((out.new_payment - out.initial_payment).abs() < dec!(0.000001));
    let continuing = out.initial_payment * dec!(240) - out.balance_at_refinance;
    assert!((out.interest_after_refinance - continuing).abs() < dec!(0.0001));
    assert!(out.interest_savings.abs() < dec!(0.0001));
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_aggregator_is_idempotent() {
    let first = analyze_refinance(&scenario_a()).unwrap();
    let second = analyze_refinance(&scenario_a()).unwrap();
    assert_eq!(first.result, second.result);
    assert_eq!(first.warnings, second.warnings);
}

/// Original term in years and a refinance point within it.
fn term_and_refinance_point() -> impl Strategy<Value = (u32, u32)> {
    (1u32..=40u32).prop_flat_map(|term| (Just(term), 1..=term))
}

proptest! {
    #[test]
    fn test_interest_before_increases_with_initial_rate(
        dollars in 1_000i64..=5_000_000i64,
        (initial_term, after) in term_and_refinance_point(),
        low_bps in 0u32..=2000u32,
        step_bps in 1u32..=500u32,
    ) {
        let base = RefinanceInput {
            principal: Decimal::from(dollars),
            initial_term_years: initial_term,
            refinance_after_years: after,
            ..scenario_a()
        };
        let at = |bps: u32| {
            let input = RefinanceInput {
                initial_annual_rate: Decimal::from(bps) / dec!(10000),
                ..base.clone()
            };
            analyze_refinance(&input).unwrap().result.interest_before_refinance
        };
        let lower = at(low_bps);
        let higher = at(low_bps + step_bps);
        prop_assert!(higher > lower, "{} not above {}", higher, lower);
    }

    #[test]
    fn test_validated_forms_never_panic(
        mantissa in 1u64..=u64::MAX,
        exponent in 0u32..=9u32,
        initial_rate_tenths in 1u32..=10_000u32,
        (initial_term, after) in term_and_refinance_point(),
        new_rate_tenths in 1u32..=10_000u32,
        new_term in 1u32..=150u32,
    ) {
        let form = RefinanceForm {
            principal: Decimal::from(mantissa) * Decimal::from(10u64.pow(exponent)),
            initial_rate_pct: Decimal::new(i64::from(initial_rate_tenths), 1),
            initial_term_years: initial_term,
            refinance_after_years: after,
            new_rate_pct: Decimal::new(i64::from(new_rate_tenths), 1),
            new_term_years: new_term,
        };
        if let Err(e) = evaluate_form(&form, &InputLimits::default()) {
            prop_assert!(
                matches!(e, RefiError::InvalidInput { .. } | RefiError::BelowMinimum { .. }),
                "{}",
                e
            );
        }
    }
}

#[test]
fn test_effective_rate_uses_nominal_terms() {
    let out = analyze_refinance(&scenario_a()).unwrap().result;
    let expected = dec!(100) * out.total_interest / (dec!(500000) * dec!(60));
    assert_eq!(out.effective_annual_rate_pct, expected);
}

#[test]
fn test_lower_rate_shorter_term_saves_interest() {
    let input = RefinanceInput {
        new_term_years: 15,
        ..scenario_a()
    };
    let out = analyze_refinance(&input).unwrap();
    assert!(out.result.interest_savings > Decimal::ZERO);
    assert!(!out.warnings.iter().any(|w| w.contains("costs more")));
}

#[test]
fn test_higher_new_rate_warns() {
    let input = RefinanceInput {
        new_annual_rate: dec!(0.07),
        ..scenario_a()
    };
    let out = analyze_refinance(&input).unwrap();
    assert!(out.warnings.iter().any(|w| w.contains("not lower")));
    assert!(out.warnings.iter().any(|w| w.contains("costs more")));
}

// ===========================================================================
// Form boundary
// ===========================================================================

#[test]
fn test_form_defaults_end_to_end() {
    let out = evaluate_form(&RefinanceForm::default(), &InputLimits::default()).unwrap();
    assert_eq!(
        out.result.display.lines(),
        [
            "Total interest paid before refinancing: $253,378.36",
            "Total interest paid after refinancing: $254,457.73",
            "Effective interest rate over the entire period: 1.69%",
        ]
    );
}

#[test]
fn test_form_with_unrepresentable_payment_is_error() {
    // 60% a year over 100 years passes the form limits, but 500k times
    // 1.05^1200 is beyond the Decimal range
    let form = RefinanceForm {
        initial_rate_pct: dec!(60),
        initial_term_years: 100,
        ..RefinanceForm::default()
    };
    assert!(form.validate(&InputLimits::default()).is_ok());
    let err = evaluate_form(&form, &InputLimits::default()).unwrap_err();
    assert!(matches!(err, RefiError::InvalidInput { .. }), "{err}");
}

#[test]
fn test_huge_principal_is_error() {
    let form = RefinanceForm {
        principal: Decimal::MAX,
        ..RefinanceForm::default()
    };
    assert!(evaluate_form(&form, &InputLimits::default()).is_err());
}

#[test]
fn test_invalid_form_produces_no_output() {
    let form = RefinanceForm {
        initial_rate_pct: dec!(0.05),
        ..RefinanceForm::default()
    };
    let err = evaluate_form(&form, &InputLimits::default()).unwrap_err();
    assert!(matches!(err, RefiError::BelowMinimum { .. }));
    assert!(err.to_string().contains("initial_rate_pct"));
}

#[test]
fn test_envelope_records_assumptions() {
    let out = analyze_refinance(&scenario_a()).unwrap();
    assert_eq!(out.assumptions["initial_term_years"], 30);
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
}
