//! Defaulting accessors for untrusted JSON
//!
//! The model is free to return any shape it likes. These helpers are the
//! only place that decides how a field of the wrong shape is treated: they
//! never fail and hand back the caller's default instead.

use serde_json::Value;

/// Read a string field, or `default` if absent or not a string
pub fn safe_string(value: &Value, key: &str, default: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

/// Read an integer field, or `default` if absent, not a number, fractional,
/// or outside the `i64` range
pub fn safe_int(value: &Value, key: &str, default: i64) -> i64 {
    let Some(Value::Number(number)) = value.get(key) else {
        return default;
    };

    if let Some(n) = number.as_i64() {
        return n;
    }
    if number.is_u64() {
        // Only reached when the value exceeds i64::MAX
        return default;
    }

    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            f as i64
        }
        _ => default,
    }
}

/// Read a boolean field, or `default` if absent or not a boolean
pub fn safe_bool(value: &Value, key: &str, default: bool) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_safe_string() {
        let value = json!({"name": "Rusty Blade", "damage": 12, "nothing": null});

        assert_eq!(safe_string(&value, "name", "x"), "Rusty Blade");
        assert_eq!(safe_string(&value, "damage", "x"), "x");
        assert_eq!(safe_string(&value, "nothing", "x"), "x");
        assert_eq!(safe_string(&value, "missing", ""), "");
    }

    #[test]
    fn test_safe_int() {
        let value = json!({
            "damage": 12,
            "negative": -4,
            "whole_float": 7.0,
            "fraction": 7.5,
            "text": "12",
            "huge": 18446744073709551615u64,
            "flag": true
        });

        assert_eq!(safe_int(&value, "damage", 0), 12);
        assert_eq!(safe_int(&value, "negative", 0), -4);
        assert_eq!(safe_int(&value, "whole_float", 0), 7);
        assert_eq!(safe_int(&value, "fraction", 3), 3);
        assert_eq!(safe_int(&value, "text", 3), 3);
        assert_eq!(safe_int(&value, "huge", 3), 3);
        assert_eq!(safe_int(&value, "flag", 3), 3);
        assert_eq!(safe_int(&value, "missing", 3), 3);
    }

    #[test]
    fn test_safe_int_rejects_out_of_range_floats() {
        let value = json!({"big": 1e30, "small": -1e30});

        assert_eq!(safe_int(&value, "big", 1), 1);
        assert_eq!(safe_int(&value, "small", 1), 1);
    }

    #[test]
    fn test_safe_bool() {
        let value = json!({"two_handed": true, "text": "true", "zero": 0});

        assert!(safe_bool(&value, "two_handed", false));
        assert!(!safe_bool(&value, "text", false));
        assert!(safe_bool(&value, "zero", true));
        assert!(safe_bool(&value, "missing", true));
    }

    #[test]
    fn test_non_object_inputs_return_defaults() {
        for value in [json!(null), json!([1, 2, 3]), json!("text"), json!(42)] {
            assert_eq!(safe_string(&value, "id", "d"), "d");
            assert_eq!(safe_int(&value, "id", 9), 9);
            assert!(safe_bool(&value, "id", true));
        }
    }
}
