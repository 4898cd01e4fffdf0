//! Opt-in strict diagnostics over a spec.
//!
//! The engine's default posture is silent degradation: unknown operators
//! and malformed clause values compile to vacuous clauses that admit
//! nothing and score zero. That keeps the hot path free of failure modes,
//! but it also masks configuration typos. [`diagnose`] is the strict
//! surface: it reports what the compiler silently degraded, without
//! changing any filter/rank outcome. Callers wire it into dev tooling or
//! request validation as they see fit.

use serde::{Deserialize, Serialize};

use cribra_spec::Spec;

use crate::operators;

// ============================================================================
// Types
// ============================================================================

/// How serious a finding is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The clause will never pass and never score.
    Warning,
    /// Reserved for findings that make the whole spec unusable.
    Error,
}

/// One finding about a spec.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Finding severity.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// The clause path the finding concerns, when clause-specific.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Diagnostic {
    fn warning(message: impl Into<String>, path: Option<&str>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            path: path.map(String::from),
        }
    }
}

// ============================================================================
// Diagnose
// ============================================================================

/// Report what compilation would silently degrade.
pub fn diagnose(spec: &Spec) -> Vec<Diagnostic> {
    let clauses = spec.flatten();
    let mut findings = Vec::new();

    if clauses.is_empty() {
        findings.push(Diagnostic::warning(
            "spec has no clauses; it admits everything and scores zero",
            None,
        ));
        return findings;
    }

    for clause in clauses {
        let Some(family) = operators::resolve(&clause.operator) else {
            findings.push(Diagnostic::warning(
                format!(
                    "unknown operator `{}`; clause can never pass",
                    clause.operator
                ),
                Some(&clause.path),
            ));
            continue;
        };

        match family {
            operators::Family::Numeric => {
                if clause.operator == "between" {
                    let well_formed = clause
                        .value
                        .as_array()
                        .is_some_and(|bounds| {
                            bounds.len() == 2
                                && bounds.iter().all(|b| cribra_core::number_of(b).is_some())
                        });
                    if !well_formed {
                        findings.push(Diagnostic::warning(
                            "between expects a two-element numeric array; clause can never pass",
                            Some(&clause.path),
                        ));
                    }
                } else if cribra_core::number_of(&clause.value).is_none() {
                    findings.push(Diagnostic::warning(
                        format!(
                            "`{}` expects a numeric bound; clause can never pass",
                            clause.operator
                        ),
                        Some(&clause.path),
                    ));
                }
            }
            operators::Family::Set => {
                if !clause.value.is_array() {
                    findings.push(Diagnostic::warning(
                        format!(
                            "`{}` expects an array value; clause can never pass",
                            clause.operator
                        ),
                        Some(&clause.path),
                    ));
                }
            }
            operators::Family::Text => {
                if clause.operator == "matches" {
                    let compiles = clause
                        .value
                        .as_str()
                        .is_some_and(|pattern| regex::Regex::new(pattern).is_ok());
                    if !compiles {
                        findings.push(Diagnostic::warning(
                            "matches expects a valid regex string; clause can never pass",
                            Some(&clause.path),
                        ));
                    }
                }
            }
            operators::Family::Vector => {
                let parseable = cribra_core::vector_of(&clause.value).is_some()
                    || clause
                        .value
                        .get("vector")
                        .is_some_and(|v| cribra_core::vector_of(v).is_some());
                if !parseable {
                    findings.push(Diagnostic::warning(
                        "similar_to expects a number array or {vector, threshold}; \
                         clause can never pass",
                        Some(&clause.path),
                    ));
                }
            }
            operators::Family::Boolean => {}
        }
    }

    findings
}

// ============================================================================
// Tests
// ============================================================================
