//! Vector similarity operators.
//!
//! `similar_to` compares an embedding field against a clause-side target
//! vector by cosine similarity. The clause value is either a bare number
//! array, or `{ "vector": [...], "threshold": t }` to set the hard
//! admission threshold (default `0.0`; the hard test is strictly greater,
//! so orthogonal vectors do not pass by default). The soft score is the
//! similarity clamped to `[0, 1]`.

use cribra_core::{number_of, vector_of};
use cribra_vector::cosine_similarity;
use serde_json::Value;

use super::{vacuous_hard, vacuous_soft, HardFn, SoftFn};

/// Operator names owned by the vector family.
pub const OPERATORS: &[&str] = &["similar_to"];

/// Read the clause value as `(target vector, threshold)`.
fn target_of(value: &Value) -> Option<(Vec<f32>, f32)> {
    if let Some(vector) = vector_of(value) {
        return Some((vector, 0.0));
    }
    let obj = value.as_object()?;
    let vector = vector_of(obj.get("vector")?)?;
    let threshold = obj.get("threshold").and_then(number_of).unwrap_or(0.0) as f32;
    Some((vector, threshold))
}

/// Build the hard predicate for a vector operator.
pub fn hard(operator: &str, value: &Value) -> HardFn {
    if operator != "similar_to" {
        return vacuous_hard();
    }
    let Some((target, threshold)) = target_of(value) else {
        return vacuous_hard();
    };
    Box::new(move |field| {
        field
            .and_then(vector_of)
            .is_some_and(|v| cosine_similarity(&v, &target) > threshold)
    })
}

/// Build the soft-score function for a vector operator.
pub fn soft(operator: &str, value: &Value) -> SoftFn {
    if operator != "similar_to" {
        return vacuous_soft();
    }
    let Some((target, _)) = target_of(value) else {
        return vacuous_soft();
    };
    Box::new(move |field| match field.and_then(vector_of) {
        Some(v) => f64::from(cosine_similarity(&v, &target).clamp(0.0, 1.0)),
        None => 0.0,
    })
}

// ============================================================================
// Tests
// ============================================================================
