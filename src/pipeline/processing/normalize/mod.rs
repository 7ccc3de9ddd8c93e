//! Field cleaning for the raw scalar values found in source records.
//!
//! Every function here is total: malformed input falls back to a typed
//! default (0.0, 0, "Misc") or, for identifiers, to `None` so callers can
//! tell an unparseable id apart from a literal zero.

pub mod dates;

use serde_json::Value;

use crate::constants::{self, MISC_CATEGORY};
use crate::domain::CategoryValue;

pub use dates::parse_date;

/// Clean a unit price. Currency symbols and surrounding whitespace are
/// stripped from text values before parsing.
pub fn clean_price(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => clean_price_text(s),
        _ => 0.0,
    }
}

pub fn clean_price_text(text: &str) -> f64 {
    text.replace('$', "").trim().parse::<f64>().unwrap_or(0.0)
}

/// Clean an item quantity, falling back to 0
pub fn clean_quantity(value: &Value) -> i64 {
    clean_integer(value).unwrap_or(0)
}

/// Clean an identifier. `None` marks a value that could not be parsed.
pub fn clean_id(value: &Value) -> Option<i64> {
    clean_integer(value)
}

fn clean_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate_float)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn truncate_float(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

/// Map a raw category onto the fixed vocabulary
pub fn normalize_category(value: &CategoryValue) -> &'static str {
    match value {
        CategoryValue::Coded(code) => constants::category_label(*code).unwrap_or(MISC_CATEGORY),
        CategoryValue::Labeled(label) => {
            let wanted = label.trim().to_lowercase();
            constants::CATEGORY_MAP
                .iter()
                .map(|(_, canonical)| *canonical)
                .find(|canonical| canonical.to_lowercase() == wanted)
                .unwrap_or(MISC_CATEGORY)
        }
        CategoryValue::Other => MISC_CATEGORY,
    }
}

/// Trim a free-text field. Absent or non-text values become `None`.
pub fn clean_text(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.trim().to_string())
}

/// Resolve an order's total value. Missing, empty, zero or non-numeric
/// totals resolve to 0.0.
pub fn resolve_order_total(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_price() {
        assert_eq!(clean_price(&json!("$12.50 ")), 12.5);
        assert_eq!(clean_price(&json!("  $ 3")), 3.0);
        assert_eq!(clean_price(&json!("7.25$")), 7.25);
        assert_eq!(clean_price(&json!(19.99)), 19.99);
        assert_eq!(clean_price(&json!(4)), 4.0);
        assert_eq!(clean_price(&json!("abc")), 0.0);
        assert_eq!(clean_price(&json!("")), 0.0);
        assert_eq!(clean_price(&Value::Null), 0.0);
        assert_eq!(clean_price(&json!(true)), 0.0);
        assert_eq!(clean_price(&json!(["1"])), 0.0);
    }

    #[test]
    fn test_clean_quantity() {
        assert_eq!(clean_quantity(&json!("7")), 7);
        assert_eq!(clean_quantity(&json!(" 3 ")), 3);
        assert_eq!(clean_quantity(&json!(2)), 2);
        assert_eq!(clean_quantity(&json!(2.9)), 2);
        assert_eq!(clean_quantity(&json!("-4")), -4);
        assert_eq!(clean_quantity(&json!("x")), 0);
        assert_eq!(clean_quantity(&json!("2.5")), 0);
        assert_eq!(clean_quantity(&Value::Null), 0);
    }

    #[test]
    fn test_clean_id() {
        assert_eq!(clean_id(&json!("42")), Some(42));
        assert_eq!(clean_id(&json!(42)), Some(42));
        assert_eq!(clean_id(&json!("0")), Some(0));
        assert_eq!(clean_id(&json!("abc")), None);
        assert_eq!(clean_id(&json!("")), None);
        assert_eq!(clean_id(&Value::Null), None);
        assert_eq!(clean_id(&json!({"id": 1})), None);
        assert_eq!(clean_id(&json!(1e30)), None);
    }

    #[test]
    fn test_normalize_category_codes() {
        assert_eq!(normalize_category(&CategoryValue::Coded(1)), "Electronics");
        assert_eq!(normalize_category(&CategoryValue::Coded(2)), "Apparel");
        assert_eq!(normalize_category(&CategoryValue::Coded(4)), "Home Goods");
        assert_eq!(normalize_category(&CategoryValue::Coded(99)), "Misc");
        assert_eq!(normalize_category(&CategoryValue::Coded(0)), "Misc");
    }

    #[test]
    fn test_normalize_category_labels() {
        assert_eq!(normalize_category(&CategoryValue::Labeled("books".into())), "Books");
        assert_eq!(normalize_category(&CategoryValue::Labeled("  HOME goods ".into())), "Home Goods");
        assert_eq!(normalize_category(&CategoryValue::Labeled("Toys".into())), "Misc");
        assert_eq!(normalize_category(&CategoryValue::Labeled("".into())), "Misc");
    }

    #[test]
    fn test_normalize_category_from_json() {
        assert_eq!(normalize_category(&CategoryValue::from(&json!(2))), "Apparel");
        assert_eq!(normalize_category(&CategoryValue::from(&json!("books"))), "Books");
        assert_eq!(normalize_category(&CategoryValue::from(&json!(99))), "Misc");
        assert_eq!(normalize_category(&CategoryValue::from(&Value::Null)), "Misc");
        assert_eq!(normalize_category(&CategoryValue::Other), "Misc");
    }

    #[test]
    fn test_bool_category_uses_integer_model() {
        // Same integer model as clean_id: true is 1, false is 0
        assert_eq!(clean_id(&json!(true)), Some(1));
        assert_eq!(normalize_category(&CategoryValue::from(&json!(true))), "Electronics");
        assert_eq!(normalize_category(&CategoryValue::from(&json!(false))), "Misc");
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text(&json!("  Widget ")), Some("Widget".to_string()));
        assert_eq!(clean_text(&Value::Null), None);
        assert_eq!(clean_text(&json!(12)), None);
    }

    #[test]
    fn test_resolve_order_total() {
        assert_eq!(resolve_order_total(&json!(150.0)), 150.0);
        assert_eq!(resolve_order_total(&json!(-20)), -20.0);
        assert_eq!(resolve_order_total(&json!("75.5")), 75.5);
        assert_eq!(resolve_order_total(&json!("")), 0.0);
        assert_eq!(resolve_order_total(&json!("n/a")), 0.0);
        assert_eq!(resolve_order_total(&Value::Null), 0.0);
    }
}
