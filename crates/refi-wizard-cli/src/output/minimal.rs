use serde_json::Value;

use super::scalar_text;

/// Print just the key answer from the output.
///
/// Refinance: the effective annual rate. Loan: the remaining balance when
/// payments have been made, otherwise the monthly payment.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result else {
        println!("{}", scalar_text(result));
        return;
    };

    let months_paid = map.get("months_paid").and_then(Value::as_u64).unwrap_or(0);
    let mut keys = vec!["effective_annual_rate_pct"];
    if months_paid > 0 {
        keys.push("remaining_balance");
    }
    keys.push("periodic_payment");

    for key in keys {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            println!("{}", scalar_text(val));
            return;
        }
    }

    if let Some((key, val)) = map.iter().next() {
        println!("{}: {}", key, scalar_text(val));
    }
}
