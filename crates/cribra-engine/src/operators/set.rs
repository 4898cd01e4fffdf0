//! Set and array-membership operators.
//!
//! `one_of` (alias `in`) tests a scalar field against a clause-side list;
//! `contains_any`/`contains_all` test an array field against a clause-side
//! list. The array operators' soft score is the matched fraction of the
//! clause set, giving partial credit for partial overlap.

use serde_json::Value;

use super::{vacuous_hard, vacuous_soft, HardFn, SoftFn};

/// Operator names owned by the set family.
pub const OPERATORS: &[&str] = &["one_of", "in", "contains_any", "contains_all"];

/// Read the clause-side list, shared by every set operator.
fn list_of(value: &Value) -> Option<Vec<Value>> {
    value.as_array().cloned()
}

/// Count how many of `wanted` appear in the field array.
fn overlap(field: Option<&Value>, wanted: &[Value]) -> Option<usize> {
    let items = field?.as_array()?;
    Some(wanted.iter().filter(|w| items.contains(w)).count())
}

/// Build the hard predicate for a set operator.
pub fn hard(operator: &str, value: &Value) -> HardFn {
    let Some(wanted) = list_of(value) else {
        return vacuous_hard();
    };

    match operator {
        "one_of" | "in" => Box::new(move |field| field.is_some_and(|v| wanted.contains(v))),
        "contains_any" => {
            Box::new(move |field| overlap(field, &wanted).is_some_and(|matched| matched > 0))
        }
        "contains_all" => Box::new(move |field| {
            overlap(field, &wanted).is_some_and(|matched| matched == wanted.len())
        }),
        _ => vacuous_hard(),
    }
}

/// Build the soft-score function for a set operator.
pub fn soft(operator: &str, value: &Value) -> SoftFn {
    let Some(wanted) = list_of(value) else {
        return vacuous_soft();
    };

    match operator {
        "one_of" | "in" => Box::new(move |field| {
            if field.is_some_and(|v| wanted.contains(v)) {
                1.0
            } else {
                0.0
            }
        }),
        "contains_any" | "contains_all" => Box::new(move |field| {
            if wanted.is_empty() {
                return 0.0;
            }
            match overlap(field, &wanted) {
                Some(matched) => matched as f64 / wanted.len() as f64,
                None => 0.0,
            }
        }),
        _ => vacuous_soft(),
    }
}

// ============================================================================
// Tests
// ============================================================================
