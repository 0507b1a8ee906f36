//! Node bindings for the refinance calculator. Every function takes and
//! returns JSON strings so a page can pass form values straight through.

use napi::Result as NapiResult;
use napi_derive::napi;

use refi_wizard_core::amortization::{loan, schedule};
use refi_wizard_core::refinance::{self, InputLimits, RefinanceForm};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Refinance
// ---------------------------------------------------------------------------

/// Validate a submitted form against the default limits and analyse it.
/// Fields missing from `form_json` take their form defaults.
#[napi]
pub fn refinance_analysis(form_json: String) -> NapiResult<String> {
    let form: RefinanceForm = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let output =
        refinance::evaluate_form(&form, &InputLimits::default()).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// As `refinance_analysis`, with caller-supplied minimums.
#[napi]
pub fn refinance_analysis_with_limits(form_json: String, limits_json: String) -> NapiResult<String> {
    let form: RefinanceForm = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let limits: InputLimits = serde_json::from_str(&limits_json).map_err(to_napi_error)?;
    let output = refinance::evaluate_form(&form, &limits).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Default form values and minimums, for initialising input widgets.
#[napi]
pub fn form_defaults() -> NapiResult<String> {
    let defaults = serde_json::json!({
        "form": RefinanceForm::default(),
        "limits": InputLimits::default(),
    });
    serde_json::to_string(&defaults).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_analysis(input_json: String) -> NapiResult<String> {
    let input: loan::LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan::analyze_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: loan::LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
