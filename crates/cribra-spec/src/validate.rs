//! Structural validation of raw spec documents.
//!
//! [`validate`] walks a raw JSON spec and accumulates every structural
//! problem it finds, locating each with a JSON-pointer-like `at` string
//! (`/allOf/1/not`). It returns a report rather than failing on the first
//! issue, and it is strictly opt-in: compilation and execution never call
//! it, because the engine degrades malformed input softly instead of
//! rejecting it.
//!
//! Rules:
//! - a node must be a JSON object;
//! - a combinator node's `allOf`/`anyOf` must be arrays and `not` a single
//!   node;
//! - a leaf must carry a string `path` and a non-empty string `op`;
//! - a node that is neither a combinator nor a leaf is an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Spec;

// ============================================================================
// Report types
// ============================================================================

/// One structural problem, located by a JSON-pointer-like path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Human-readable description of the problem.
    pub message: String,
    /// Location within the document, e.g. `/allOf/1/path`.
    pub at: String,
}

impl ValidationError {
    fn new(message: impl Into<String>, at: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            at: at.into(),
        }
    }
}

/// Outcome of validating a spec document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether the document is structurally well-formed.
    pub ok: bool,
    /// Accumulated problems; empty when `ok`.
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// An empty, passing report.
    pub fn passing() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Validate a raw JSON spec document.
pub fn validate(spec: &Value) -> ValidationReport {
    let mut errors = Vec::new();
    walk(spec, "", &mut errors);
    if !errors.is_empty() {
        log::debug!("spec validation found {} errors", errors.len());
    }
    ValidationReport {
        ok: errors.is_empty(),
        errors,
    }
}

/// Validate a typed spec by re-serializing it to the wire shape.
///
/// Typed trees are well-formed by construction apart from their strings,
/// so this mainly catches empty operator names introduced by adapters.
pub fn validate_spec(spec: &Spec) -> ValidationReport {
    match serde_json::to_value(spec) {
        Ok(value) => validate(&value),
        Err(err) => ValidationReport {
            ok: false,
            errors: vec![ValidationError::new(
                format!("spec is not serializable: {err}"),
                "",
            )],
        },
    }
}

fn walk(node: &Value, at: &str, errors: &mut Vec<ValidationError>) {
    let Some(obj) = node.as_object() else {
        errors.push(ValidationError::new("node must be an object", at));
        return;
    };

    let is_combinator =
        obj.contains_key("allOf") || obj.contains_key("anyOf") || obj.contains_key("not");
    let is_leaf = obj.contains_key("path") || obj.contains_key("op");

    if is_combinator {
        for key in ["allOf", "anyOf"] {
            if let Some(children) = obj.get(key) {
                match children.as_array() {
                    Some(children) => {
                        for (index, child) in children.iter().enumerate() {
                            walk(child, &format!("{at}/{key}/{index}"), errors);
                        }
                    }
                    None => {
                        errors.push(ValidationError::new(
                            format!("{key} must be an array"),
                            format!("{at}/{key}"),
                        ));
                    }
                }
            }
        }

        if let Some(child) = obj.get("not") {
            let child_at = format!("{at}/not");
            if child.is_array() {
                errors.push(ValidationError::new("not must be a single node", child_at));
            } else {
                walk(child, &child_at, errors);
            }
        }
        return;
    }

    if is_leaf {
        match obj.get("path") {
            Some(Value::String(_)) => {}
            Some(_) => {
                errors.push(ValidationError::new(
                    "path must be a string",
                    format!("{at}/path"),
                ));
            }
            None => {
                errors.push(ValidationError::new("leaf is missing path", at));
            }
        }

        match obj.get("op") {
            Some(Value::String(op)) if !op.is_empty() => {}
            Some(Value::String(_)) => {
                errors.push(ValidationError::new(
                    "op must be a non-empty string",
                    format!("{at}/op"),
                ));
            }
            Some(_) => {
                errors.push(ValidationError::new(
                    "op must be a string",
                    format!("{at}/op"),
                ));
            }
            None => {
                errors.push(ValidationError::new("leaf is missing op", at));
            }
        }
        return;
    }

    errors.push(ValidationError::new(
        "node must be a clause or a combinator",
        at,
    ));
}

// ============================================================================
// Tests
// ============================================================================
