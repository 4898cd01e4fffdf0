//! Numeric comparison operators.
//!
//! Hard predicates are exact bound checks. Soft scores degrade gracefully:
//! a value satisfying the bound scores `1.0`, a near miss scores
//! `1 / (1 + distance)` from the violated bound, so ranking can still
//! separate near-qualifying records from far-off ones.
//!
//! Bounds are read at compile time. A bound that is not numeric (or a
//! `between` value that is not a two-element array) compiles to a vacuous
//! clause, consistent with unknown-operator handling.

use cribra_core::number_of;
use serde_json::Value;

use super::{vacuous_hard, vacuous_soft, HardFn, SoftFn};

/// Operator names owned by the numeric family.
pub const OPERATORS: &[&str] = &["lt", "lte", "gt", "gte", "at_most", "at_least", "between"];

/// Inverse-distance decay for near-miss scoring.
fn decay(distance: f64) -> f64 {
    1.0 / (1.0 + distance.abs())
}

/// Read a `between` value as its `(low, high)` bounds.
fn bounds_of(value: &Value) -> Option<(f64, f64)> {
    let items = value.as_array()?;
    if items.len() != 2 {
        return None;
    }
    Some((number_of(&items[0])?, number_of(&items[1])?))
}

/// Build the hard predicate for a numeric operator.
pub fn hard(operator: &str, value: &Value) -> HardFn {
    if operator == "between" {
        let Some((low, high)) = bounds_of(value) else {
            return vacuous_hard();
        };
        return Box::new(move |field| {
            field
                .and_then(number_of)
                .is_some_and(|v| v >= low && v <= high)
        });
    }

    let Some(bound) = number_of(value) else {
        return vacuous_hard();
    };

    match operator {
        "lt" => Box::new(move |field| field.and_then(number_of).is_some_and(|v| v < bound)),
        "gt" => Box::new(move |field| field.and_then(number_of).is_some_and(|v| v > bound)),
        "lte" | "at_most" => {
            Box::new(move |field| field.and_then(number_of).is_some_and(|v| v <= bound))
        }
        "gte" | "at_least" => {
            Box::new(move |field| field.and_then(number_of).is_some_and(|v| v >= bound))
        }
        _ => vacuous_hard(),
    }
}

/// Build the soft-score function for a numeric operator.
pub fn soft(operator: &str, value: &Value) -> SoftFn {
    if operator == "between" {
        let Some((low, high)) = bounds_of(value) else {
            return vacuous_soft();
        };
        return Box::new(move |field| match field.and_then(number_of) {
            Some(v) if v >= low && v <= high => 1.0,
            Some(v) if v < low => decay(low - v),
            Some(v) => decay(v - high),
            None => 0.0,
        });
    }

    let Some(bound) = number_of(value) else {
        return vacuous_soft();
    };

    match operator {
        "lt" | "lte" | "at_most" => Box::new(move |field| match field.and_then(number_of) {
            Some(v) if v <= bound => 1.0,
            Some(v) => decay(v - bound),
            None => 0.0,
        }),
        "gt" | "gte" | "at_least" => Box::new(move |field| match field.and_then(number_of) {
            Some(v) if v >= bound => 1.0,
            Some(v) => decay(bound - v),
            None => 0.0,
        }),
        _ => vacuous_soft(),
    }
}

// ============================================================================
// Tests
// ============================================================================
