pub mod loan;
pub mod schedule;

pub use loan::{periodic_payment, remaining_balance};
