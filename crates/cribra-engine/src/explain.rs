//! Per-clause contribution breakdowns for diagnostics and UI tooltips.
//!
//! [`explain`] reports, for one item, how each clause of an executable
//! contributed to the outcome. Soft clauses carry their weighted score
//! contribution and pass when that contribution is positive. Hard clauses
//! carry a zero contribution and report the *overall* admission result —
//! not their individual pass/fail. The score is computed once and reused
//! across all clause entries.

use serde::Serialize;

use cribra_core::Record;
use cribra_spec::{Clause, Mode};

use crate::compile::Executable;

// ============================================================================
// Types
// ============================================================================

/// One clause's entry in an explanation.
#[derive(Clone, Debug, Serialize)]
pub struct ClauseExplanation {
    /// The clause, as compiled.
    pub clause: Clause,
    /// Soft: whether the contribution is positive. Hard: the overall
    /// admission result.
    pub pass: bool,
    /// The clause's score part; always `0.0` for hard clauses.
    pub contribution: f64,
}

/// Full breakdown of one item against one executable.
#[derive(Clone, Debug, Serialize)]
pub struct Explanation {
    /// The overall admission result.
    pub pass: bool,
    /// Sum of all contributions.
    pub total: f64,
    /// Per-clause entries, in flattened clause order.
    pub parts: Vec<ClauseExplanation>,
}

// ============================================================================
// Explain
// ============================================================================

/// Break down one item's outcome clause by clause.
pub fn explain<R: Record>(item: &R, exec: &Executable) -> Explanation {
    let pass = exec.test(item);
    let score = exec.score(item);

    let parts = exec
        .clauses()
        .iter()
        .zip(score.parts.iter())
        .map(|(clause, &contribution)| {
            let clause_pass = match clause.mode {
                Mode::Soft => contribution > 0.0,
                Mode::Hard => pass,
            };
            ClauseExplanation {
                clause: clause.clone(),
                pass: clause_pass,
                contribution,
            }
        })
        .collect();

    Explanation {
        pass,
        total: score.total,
        parts,
    }
}

// ============================================================================
// Tests
// ============================================================================
