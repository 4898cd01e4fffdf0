//! Boolean flag operators.
//!
//! `is_true`/`is_false` test a boolean field directly; the clause value is
//! not consulted. String `"true"`/`"false"` fields coerce, matching how
//! flags arrive from query parameters.

use cribra_core::bool_of;
use serde_json::Value;

use super::{HardFn, SoftFn};

/// Operator names owned by the boolean family.
pub const OPERATORS: &[&str] = &["is_true", "is_false"];

/// Build the hard predicate for a boolean operator.
pub fn hard(operator: &str, _value: &Value) -> HardFn {
    let expected = operator == "is_true";
    Box::new(move |field| field.and_then(bool_of) == Some(expected))
}

/// Build the soft-score function for a boolean operator.
pub fn soft(operator: &str, value: &Value) -> SoftFn {
    let predicate = hard(operator, value);
    Box::new(move |field| if predicate(field) { 1.0 } else { 0.0 })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_true() {
        let pred = hard("is_true", &json!(true));
        assert!(pred(Some(&json!(true))));
        assert!(!pred(Some(&json!(false))));
        assert!(!pred(None));
    }

    #[test]
    fn test_is_false() {
        let pred = hard("is_false", &json!(true));
        assert!(pred(Some(&json!(false))));
        assert!(!pred(Some(&json!(true))));
        assert!(!pred(None));
    }

    #[test]
    fn test_string_flags_coerce() {
        assert!(hard("is_true", &json!(true))(Some(&json!("true"))));
        assert!(hard("is_false", &json!(true))(Some(&json!("false"))));
    }

    #[test]
    fn test_non_boolean_field_fails() {
        let pred = hard("is_true", &json!(true));
        assert!(!pred(Some(&json!(1))));
        assert!(!pred(Some(&json!("yes"))));
    }

    #[test]
    fn test_soft_is_binary() {
        let score = soft("is_true", &json!(true));
        assert_eq!(score(Some(&json!(true))), 1.0);
        assert_eq!(score(Some(&json!(false))), 0.0);
        assert_eq!(score(None), 0.0);
    }
}
