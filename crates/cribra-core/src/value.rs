//! Value coercion and ordering helpers.
//!
//! Operators and tie-breakers work over loosely-typed `serde_json::Value`
//! fields. This module centralises the coercions (numeric reading accepts
//! numeric strings, matching the permissive behaviour external state tends
//! to need) and defines a total order over values for secondary sorting.

use serde_json::Value;
use std::cmp::Ordering;

/// Read a value as `f64`.
///
/// Accepts JSON numbers and numeric strings (`"200"`); anything else is
/// `None`. Query parameters and UI state frequently deliver numbers as
/// strings, and the engine degrades softly rather than failing the clause
/// on representation alone.
pub fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Read a value as `bool`.
///
/// Accepts JSON booleans and the literal strings `"true"`/`"false"`.
pub fn bool_of(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Read a value as a `f32` vector, for similarity operators.
pub fn vector_of(value: &Value) -> Option<Vec<f32>> {
    let items = value.as_array()?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(number_of(item)? as f32);
    }
    Some(out)
}

/// Rank used to order values of different kinds.
fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over optional values, for tie-breaker comparisons.
///
/// Absent values sort after everything present. Within a kind: numbers by
/// magnitude (NaN compares equal), strings lexicographically, booleans
/// false-before-true. Across kinds, a fixed kind rank applies. Arrays and
/// objects compare equal to each other — tie-breaking on composites is not
/// meaningful.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => compare_present(a, b),
    }
}

fn compare_present(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_of_json_number() {
        assert_eq!(number_of(&json!(42)), Some(42.0));
        assert_eq!(number_of(&json!(2.5)), Some(2.5));
    }

    #[test]
    fn test_number_of_numeric_string() {
        assert_eq!(number_of(&json!("200")), Some(200.0));
        assert_eq!(number_of(&json!(" 3.5 ")), Some(3.5));
    }

    #[test]
    fn test_number_of_rejects_non_numeric() {
        assert_eq!(number_of(&json!("Canon")), None);
        assert_eq!(number_of(&json!(true)), None);
        assert_eq!(number_of(&json!([1])), None);
    }

    #[test]
    fn test_bool_of() {
        assert_eq!(bool_of(&json!(true)), Some(true));
        assert_eq!(bool_of(&json!("false")), Some(false));
        assert_eq!(bool_of(&json!("yes")), None);
        assert_eq!(bool_of(&json!(1)), None);
    }

    #[test]
    fn test_vector_of() {
        assert_eq!(vector_of(&json!([1, 0, 0.5])), Some(vec![1.0, 0.0, 0.5]));
        assert_eq!(vector_of(&json!(["1", "2"])), Some(vec![1.0, 2.0]));
        assert_eq!(vector_of(&json!([1, "x"])), None);
        assert_eq!(vector_of(&json!("not a vector")), None);
    }

    #[test]
    fn test_compare_numbers() {
        assert_eq!(
            compare_values(Some(&json!(1)), Some(&json!(2))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!(2.0)), Some(&json!(2))),
            Ordering::Equal
        );
    }

    #[test]
    fn test_compare_strings() {
        assert_eq!(
            compare_values(Some(&json!("Canon")), Some(&json!("Sony"))),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_bools() {
        assert_eq!(
            compare_values(Some(&json!(false)), Some(&json!(true))),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_absent_sorts_last() {
        assert_eq!(compare_values(None, Some(&json!(0))), Ordering::Greater);
        assert_eq!(compare_values(Some(&json!(0)), None), Ordering::Less);
        assert_eq!(compare_values(None, None), Ordering::Equal);
    }

    #[test]
    fn test_compare_mixed_kinds_by_rank() {
        assert_eq!(
            compare_values(Some(&json!(true)), Some(&json!(0))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!(5)), Some(&json!("5"))),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_composites_equal() {
        assert_eq!(
            compare_values(Some(&json!([1])), Some(&json!([2, 3]))),
            Ordering::Equal
        );
    }
}
