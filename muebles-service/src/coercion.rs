//! Loose numeric coercion of request values
//!
//! Clients send prices as JSON numbers, JSON strings, or urlencoded form text,
//! and codes arrive as raw path segments. These helpers convert any of them to
//! an `f64` using the permissive rules web clients expect: surrounding
//! whitespace is ignored, an empty string is zero, `true`/`false` are one and
//! zero, and anything that is not a number becomes `NaN`.

use serde_json::Value;

/// Convert a JSON value to a number, `NaN` when it has no numeric reading
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_number(s),
        // arrays stringify by joining their elements
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [Value::Bool(_)] => f64::NAN,
            [single] if !single.is_object() => to_number(single),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

/// Parse numeric text, `NaN` when it is not a complete numeric literal
pub fn parse_number(text: &str) -> f64 {
    let s = text.trim();
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }

    // f64::from_str also accepts "inf"/"nan"; only plain decimal literals count
    let is_decimal = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !is_decimal || !s.chars().any(|c| c.is_ascii_digit()) {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Whether a value counts as "provided" (empty strings, zero, `NaN`, `false`
/// and `null` do not)
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coerce a path segment to a resource code.
///
/// Returns `None` for anything that is not a finite integer; such a code can
/// never match a stored resource.
pub fn to_code(segment: &str) -> Option<i64> {
    let n = parse_number(segment);
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Some(n as i64)
    } else {
        None
    }
}

/// Largest integer every JSON consumer can represent exactly
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_number_decimal_forms() {
        assert_eq!(parse_number("150"), 150.0);
        assert_eq!(parse_number("  12.5 "), 12.5);
        assert_eq!(parse_number("-5"), -5.0);
        assert_eq!(parse_number("1e3"), 1000.0);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("   "), 0.0);
    }

    #[test]
    fn test_parse_number_prefixed_forms() {
        assert_eq!(parse_number("0x10"), 16.0);
        assert_eq!(parse_number("0b101"), 5.0);
        assert_eq!(parse_number("0o17"), 15.0);
        assert!(parse_number("0xZZ").is_nan());
    }

    #[test]
    fn test_parse_number_rejects_words() {
        assert!(parse_number("abc").is_nan());
        assert!(parse_number("12abc").is_nan());
        assert!(parse_number("inf").is_nan());
        assert!(parse_number("NaN").is_nan());
        assert!(parse_number("-").is_nan());
        assert!(parse_number("1.2.3").is_nan());
        assert_eq!(parse_number("Infinity"), f64::INFINITY);
    }

    #[test]
    fn test_to_number_json_values() {
        assert_eq!(to_number(&json!(42)), 42.0);
        assert_eq!(to_number(&json!("42")), 42.0);
        assert_eq!(to_number(&json!(true)), 1.0);
        assert_eq!(to_number(&json!(false)), 0.0);
        assert_eq!(to_number(&json!(null)), 0.0);
        assert_eq!(to_number(&json!([])), 0.0);
        assert_eq!(to_number(&json!(["7"])), 7.0);
        assert!(to_number(&json!([1, 2])).is_nan());
        assert!(to_number(&json!({"a": 1})).is_nan());
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!("Mesa")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!(-5)));
        assert!(is_truthy(&json!([])));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
    }

    #[test]
    fn test_to_code() {
        assert_eq!(to_code("7"), Some(7));
        assert_eq!(to_code("7.0"), Some(7));
        assert_eq!(to_code("0x0A"), Some(10));
        assert_eq!(to_code("7.5"), None);
        assert_eq!(to_code("mesa"), None);
        assert_eq!(to_code("Infinity"), None);
    }
}
