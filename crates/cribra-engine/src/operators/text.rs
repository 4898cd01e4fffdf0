//! Text and equality operators.
//!
//! `eq`/`neq` compare whole JSON values, so they serve numbers and booleans
//! as well as strings — external state frequently routes every scalar
//! through them. The substring operators work on string fields only, and
//! `matches` compiles its regex once per clause; an invalid pattern
//! compiles to a vacuous clause rather than an error.

use regex::Regex;
use serde_json::Value;

use super::{vacuous_hard, HardFn, SoftFn};

/// Operator names owned by the text family.
pub const OPERATORS: &[&str] = &["eq", "neq", "contains", "starts_with", "ends_with", "matches"];

/// Build the hard predicate for a text operator.
pub fn hard(operator: &str, value: &Value) -> HardFn {
    match operator {
        "eq" => {
            let expected = value.clone();
            Box::new(move |field| field == Some(&expected))
        }
        "neq" => {
            let expected = value.clone();
            Box::new(move |field| field.is_some_and(|v| *v != expected))
        }
        "contains" => substring_test(value, |haystack, needle| haystack.contains(needle)),
        "starts_with" => substring_test(value, |haystack, needle| haystack.starts_with(needle)),
        "ends_with" => substring_test(value, |haystack, needle| haystack.ends_with(needle)),
        "matches" => {
            let pattern = value.as_str().and_then(|s| Regex::new(s).ok());
            Box::new(move |field| {
                let (Some(pattern), Some(text)) = (&pattern, field.and_then(Value::as_str))
                else {
                    return false;
                };
                pattern.is_match(text)
            })
        }
        _ => vacuous_hard(),
    }
}

/// Build the soft-score function for a text operator.
///
/// Text matching is binary: the soft score is `1.0` when the hard
/// predicate holds and `0.0` otherwise.
pub fn soft(operator: &str, value: &Value) -> SoftFn {
    let predicate = hard(operator, value);
    Box::new(move |field| if predicate(field) { 1.0 } else { 0.0 })
}

/// Build a predicate comparing a string field against a string needle.
fn substring_test(
    value: &Value,
    test: impl Fn(&str, &str) -> bool + Send + Sync + 'static,
) -> HardFn {
    let Some(needle) = value.as_str().map(String::from) else {
        return vacuous_hard();
    };
    Box::new(move |field| {
        field
            .and_then(Value::as_str)
            .is_some_and(|haystack| test(haystack, &needle))
    })
}

// ============================================================================
// Tests
// ============================================================================
