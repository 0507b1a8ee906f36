pub mod analysis;
pub mod display;
pub mod form;

pub use analysis::{analyze_refinance, RefinanceInput, RefinanceOutput};
pub use display::RefinanceDisplay;
pub use form::{evaluate_form, InputLimits, RefinanceForm};
