//! Value representation shared by samplers and records.
//!
//! Values are plain `serde_json` trees. The `preserve_order` feature is
//! enabled for this crate so objects keep their insertion order, which is
//! what makes a fixed seed reproduce byte-identical output.

use std::cmp::Ordering;

/// A sampled value: null, bool, number, string, array or object.
pub type Value = serde_json::Value;

/// One output record (an insertion-ordered object).
pub type Record = serde_json::Map<String, Value>;

/// Compare two values for constraint purposes.
///
/// Numbers compare numerically and strings lexically. Any other pairing
/// (including mixed kinds) is not comparable and yields `None`.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return Some(x.cmp(&y));
            }
            x.as_f64()?.partial_cmp(&y.as_f64()?)
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Key used to look up a value in a string-keyed table.
///
/// Strings are used as-is; every other value uses its compact JSON text,
/// so `1` and `"1"` select the same entry.
pub fn value_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compare_integers() {
        assert_eq!(compare_values(&json!(3), &json!(5)), Some(Ordering::Less));
        assert_eq!(compare_values(&json!(5), &json!(5)), Some(Ordering::Equal));
    }

    #[test]
    fn test_compare_mixed_numbers() {
        assert_eq!(
            compare_values(&json!(3), &json!(2.5)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn test_compare_strings() {
        assert_eq!(
            compare_values(&json!("2020-01-01"), &json!("2021-01-01")),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_incomparable_kinds() {
        assert_eq!(compare_values(&json!("a"), &json!(1)), None);
        assert_eq!(compare_values(&json!([1]), &json!([1])), None);
        assert_eq!(compare_values(&Value::Null, &Value::Null), None);
    }

    #[test]
    fn test_value_key() {
        assert_eq!(value_key(&json!("1")), "1");
        assert_eq!(value_key(&json!(1)), "1");
        assert_eq!(value_key(&json!(true)), "true");
    }

    #[test]
    fn test_objects_keep_insertion_order() {
        let mut record = Record::new();
        record.insert("zeta".to_string(), json!(1));
        record.insert("alpha".to_string(), json!(2));
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
