use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// The three human-readable lines a refinance evaluation renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinanceDisplay {
    pub interest_before: String,
    pub interest_after: String,
    pub effective_rate: String,
}

impl RefinanceDisplay {
    pub fn new(interest_before: Money, interest_after: Money, effective_rate_pct: Decimal) -> Self {
        Self {
            interest_before: format!(
                "Total interest paid before refinancing: {}",
                format_currency(interest_before)
            ),
            interest_after: format!(
                "Total interest paid after refinancing: {}",
                format_currency(interest_after)
            ),
            effective_rate: format!(
                "Effective interest rate over the entire period: {}",
                format_percent(effective_rate_pct)
            ),
        }
    }

    /// Lines in display order.
    pub fn lines(&self) -> [&str; 3] {
        [&self.interest_before, &self.interest_after, &self.effective_rate]
    }

    pub fn render(&self) -> String {
        self.lines().join("\n")
    }
}

/// `$1,234,567.89`; negatives as `-$12.00`.
pub fn format_currency(amount: Money) -> String {
    let rounded = round2(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{frac}", group_thousands(whole))
}

/// `1.69%`
pub fn format_percent(pct: Decimal) -> String {
    format!("{:.2}%", round2(pct))
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
