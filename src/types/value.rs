//! Coercion and comparison rules for JSON values.
//!
//! `actual` is the value resolved from the context (`None` when the path does
//! not resolve); `expected` is the literal from the condition definition.

use serde_json::Value;

use super::expr::CompareOp;

/// Apply `op` to a resolved field value and a condition literal.
#[must_use]
pub fn compare(actual: Option<&Value>, op: CompareOp, expected: &Value) -> bool {
    match op {
        CompareOp::Eq => loose_eq(actual, expected),
        CompareOp::Neq => !loose_eq(actual, expected),
        CompareOp::Gt => compare_numbers(actual, expected, |a, b| a > b),
        CompareOp::Gte => compare_numbers(actual, expected, |a, b| a >= b),
        CompareOp::Lt => compare_numbers(actual, expected, |a, b| a < b),
        CompareOp::Lte => compare_numbers(actual, expected, |a, b| a <= b),
        CompareOp::Contains => contains(actual, expected).unwrap_or(false),
        // Only the array and string branches are inverted; anything else is
        // trivially "not contained".
        CompareOp::NotContains => !matches!(contains(actual, expected), Some(true)),
        CompareOp::StartsWith => compare_strings(actual, expected, |a, b| a.starts_with(b)),
        CompareOp::EndsWith => compare_strings(actual, expected, |a, b| a.ends_with(b)),
    }
}

/// Loose equality.
///
/// - a missing value equals only `null`, and `null` equals only `null`
/// - strings and booleans of the same kind compare by value
/// - arrays and objects compare structurally, and never equal a primitive
/// - any other mix of numbers, strings and booleans compares numerically
#[must_use]
pub fn loose_eq(actual: Option<&Value>, expected: &Value) -> bool {
    let Some(actual) = actual else {
        return expected.is_null();
    };
    match (actual, expected) {
        (Value::Null, other) | (other, Value::Null) => other.is_null(),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => {
            json_eq(actual, expected)
        }
        _ => match (to_number(Some(actual)), to_number(Some(expected))) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

/// Structural equality with numbers compared by numeric value, so `1` and
/// `1.0` are equal.
#[must_use]
pub fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || x.as_f64() == y.as_f64(),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| json_eq(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, l)| y.get(key).is_some_and(|r| json_eq(l, r)))
        }
        _ => a == b,
    }
}

/// Numeric coercion. `None` means "not a number".
///
/// `null` is 0, booleans are 0/1, strings are trimmed and parsed (empty is 0),
/// arrays, objects and missing values are never numeric.
#[must_use]
pub fn to_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_number(s)?,
        Value::Array(_) | Value::Object(_) => return None,
    };
    (!n.is_nan()).then_some(n)
}

#[allow(clippy::cast_precision_loss)]
fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.starts_with('+') {
            return None;
        }
        return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
    }

    // `f64::from_str` also accepts "inf" and "nan"; those are not numbers here.
    let literal = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !literal {
        return None;
    }
    s.parse::<f64>().ok()
}

fn compare_numbers<F>(actual: Option<&Value>, expected: &Value, cmp: F) -> bool
where
    F: Fn(f64, f64) -> bool,
{
    match (to_number(actual), to_number(Some(expected))) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

/// `Some(found)` when `actual` is an array or both sides are strings,
/// `None` when containment is not defined for the pair.
fn contains(actual: Option<&Value>, expected: &Value) -> Option<bool> {
    match (actual?, expected) {
        (Value::Array(items), _) => Some(items.iter().any(|item| json_eq(item, expected))),
        (Value::String(haystack), Value::String(needle)) => {
            Some(haystack.to_lowercase().contains(&needle.to_lowercase()))
        }
        _ => None,
    }
}

fn compare_strings<F>(actual: Option<&Value>, expected: &Value, cmp: F) -> bool
where
    F: Fn(&str, &str) -> bool,
{
    match (actual, expected) {
        (Some(Value::String(a)), Value::String(b)) => cmp(&a.to_lowercase(), &b.to_lowercase()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(actual: Value, op: CompareOp, expected: Value) -> bool {
        compare(Some(&actual), op, &expected)
    }

    #[test]
    fn loose_eq_same_kind() {
        assert!(loose_eq(Some(&json!("y")), &json!("y")));
        assert!(!loose_eq(Some(&json!("y")), &json!("Y")));
        assert!(loose_eq(Some(&json!(10)), &json!(10.0)));
        assert!(loose_eq(Some(&json!(true)), &json!(true)));
        assert!(!loose_eq(Some(&json!(true)), &json!(false)));
    }

    #[test]
    fn loose_eq_cross_type() {
        assert!(loose_eq(Some(&json!("10")), &json!(10)));
        assert!(loose_eq(Some(&json!(10)), &json!(" 10 ")));
        assert!(loose_eq(Some(&json!(true)), &json!(1)));
        assert!(loose_eq(Some(&json!("1")), &json!(true)));
        assert!(loose_eq(Some(&json!(false)), &json!("")));
        assert!(!loose_eq(Some(&json!("abc")), &json!(0)));
        assert!(!loose_eq(Some(&json!("true")), &json!(true)));
    }

    #[test]
    fn loose_eq_null_and_missing() {
        assert!(loose_eq(None, &json!(null)));
        assert!(loose_eq(Some(&json!(null)), &json!(null)));
        assert!(!loose_eq(None, &json!("test")));
        assert!(!loose_eq(Some(&json!(null)), &json!(0)));
        assert!(!loose_eq(Some(&json!(0)), &json!(null)));
        assert!(!loose_eq(Some(&json!(null)), &json!("")));
    }

    #[test]
    fn loose_eq_structural() {
        assert!(loose_eq(Some(&json!([1, "a"])), &json!([1.0, "a"])));
        assert!(loose_eq(Some(&json!({"a": {"b": 1}})), &json!({"a": {"b": 1}})));
        assert!(!loose_eq(Some(&json!([1])), &json!(1)));
        assert!(!loose_eq(Some(&json!({})), &json!("[object Object]")));
    }

    #[test]
    fn to_number_rules() {
        assert_eq!(to_number(None), None);
        assert_eq!(to_number(Some(&json!(null))), Some(0.0));
        assert_eq!(to_number(Some(&json!(true))), Some(1.0));
        assert_eq!(to_number(Some(&json!(false))), Some(0.0));
        assert_eq!(to_number(Some(&json!(2.5))), Some(2.5));
        assert_eq!(to_number(Some(&json!(" 42 "))), Some(42.0));
        assert_eq!(to_number(Some(&json!(""))), Some(0.0));
        assert_eq!(to_number(Some(&json!("1e3"))), Some(1000.0));
        assert_eq!(to_number(Some(&json!("0x1F"))), Some(31.0));
        assert_eq!(to_number(Some(&json!("0b101"))), Some(5.0));
        assert_eq!(to_number(Some(&json!("-Infinity"))), Some(f64::NEG_INFINITY));
        assert_eq!(to_number(Some(&json!("inf"))), None);
        assert_eq!(to_number(Some(&json!("NaN"))), None);
        assert_eq!(to_number(Some(&json!("12px"))), None);
        assert_eq!(to_number(Some(&json!([1]))), None);
        assert_eq!(to_number(Some(&json!({}))), None);
    }

    #[test]
    fn ordering_coerces_numbers() {
        assert!(check(json!(10), CompareOp::Gt, json!(5)));
        assert!(check(json!("10"), CompareOp::Gte, json!(10)));
        assert!(check(json!(10), CompareOp::Lt, json!("20")));
        assert!(check(json!(10), CompareOp::Lte, json!(10)));
        assert!(!check(json!(10), CompareOp::Lt, json!(10)));
    }

    #[test]
    fn ordering_non_numeric_is_false() {
        for op in [CompareOp::Gt, CompareOp::Gte, CompareOp::Lt, CompareOp::Lte] {
            assert!(!check(json!("abc"), op, json!(1)), "{op}");
            assert!(!check(json!(1), op, json!("abc")), "{op}");
            assert!(!compare(None, op, &json!(0)), "{op}");
            assert!(!check(json!([1]), op, json!(1)), "{op}");
        }
    }

    #[test]
    fn contains_array_uses_element_equality() {
        let labels = json!(["bug", "p1", 3]);
        assert!(check(labels.clone(), CompareOp::Contains, json!("bug")));
        assert!(!check(labels.clone(), CompareOp::Contains, json!("BUG")));
        assert!(check(labels.clone(), CompareOp::Contains, json!(3.0)));
        assert!(!check(labels.clone(), CompareOp::NotContains, json!("p1")));
        assert!(check(labels, CompareOp::NotContains, json!("beta")));
        assert!(check(
            json!([{"name": "x"}]),
            CompareOp::Contains,
            json!({"name": "x"})
        ));
    }

    #[test]
    fn contains_string_is_case_insensitive() {
        assert!(check(json!("Feature/New"), CompareOp::Contains, json!("feature")));
        assert!(check(json!("main"), CompareOp::NotContains, json!("feature")));
        assert!(!check(json!("Feature/New"), CompareOp::NotContains, json!("NEW")));
    }

    #[test]
    fn contains_other_kinds_default() {
        assert!(!check(json!(123), CompareOp::Contains, json!("2")));
        assert!(check(json!(123), CompareOp::NotContains, json!("2")));
        assert!(!check(json!("123"), CompareOp::Contains, json!(2)));
        assert!(check(json!("123"), CompareOp::NotContains, json!(2)));
        assert!(!compare(None, CompareOp::Contains, &json!("x")));
        assert!(compare(None, CompareOp::NotContains, &json!("x")));
    }

    #[test]
    fn prefix_and_suffix() {
        assert!(check(json!("Release/v1"), CompareOp::StartsWith, json!("release")));
        assert!(check(json!("test.JS"), CompareOp::EndsWith, json!(".js")));
        assert!(!check(json!("release"), CompareOp::EndsWith, json!("v1")));
        assert!(!check(json!(123), CompareOp::StartsWith, json!("1")));
        assert!(!check(json!(123), CompareOp::EndsWith, json!("23")));
        assert!(!check(json!("123"), CompareOp::EndsWith, json!(3)));
    }
}
