use serde_json::Value;

use super::{display_scalar, result_of};

/// Headline fields, in priority order, for results that are not comparisons.
const PRIORITY_KEYS: [&str; 4] = [
    "monthly_installment",
    "residual_value",
    "net_cost_per_month",
    "tax_rate",
];

/// Print just the key answer from the output.
///
/// A comparison prints the cheapest channel and its net monthly cost.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = result_of(value);

    let Value::Object(map) = result else {
        return display_scalar(result);
    };

    if let Some(Value::String(cheapest)) = map.get("cheapest") {
        let monthly = map
            .get(cheapest.as_str())
            .and_then(|c| c.get("net_cost_per_month"))
            .map(display_scalar)
            .unwrap_or_default();
        return format!("{cheapest}: {monthly}/month");
    }

    for key in PRIORITY_KEYS {
        if let Some(val) = map.get(key) {
            if !val.is_null() {
                return display_scalar(val);
            }
        }
    }

    // Fall back to first field
    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, display_scalar(val)),
        None => String::new(),
    }
}
