//! The declarative constraint-tree model.
//!
//! A [`Spec`] is a tree whose leaves are [`Clause`]s — one atomic
//! path+operator+value rule each — and whose interior nodes are combinator
//! [`Group`]s (`allOf`, `anyOf`, `not`). Specs are ephemeral values: built
//! fresh per external-state change, compiled once, then discarded.
//!
//! # Wire shape
//!
//! ```json
//! {
//!   "allOf": [
//!     { "path": "brand", "op": "eq", "value": "Canon" },
//!     { "path": "price_chf", "op": "between", "value": [200, 1500],
//!       "mode": "soft", "weight": 2.0 }
//!   ]
//! }
//! ```
//!
//! # Flattening
//!
//! [`Spec::flatten`] walks the tree depth-first in declaration order and
//! collects every leaf clause into one list, regardless of which combinator
//! contains it. Evaluation downstream is conjunctive over that list; `anyOf`
//! and `not` parse and round-trip but carry no distinct evaluation
//! semantics. The score `parts` array downstream always matches this
//! flattened order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Mode and missing-field policy
// ============================================================================

/// Whether a clause gates admission or contributes to the score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Must be satisfied for an item to be admitted; failure excludes it.
    #[default]
    Hard,
    /// Contributes a weighted amount to the ranking score; never excludes.
    Soft,
}

/// What a clause does when the accessed field is absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Absent fails the hard test and contributes zero (the default).
    Exclude,
    /// Absent passes the hard test and contributes zero.
    Ignore,
    /// Absent evaluates against the operator family's default value.
    CoerceDefault,
}

// ============================================================================
// Clause
// ============================================================================

/// One atomic test/score rule against one field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    /// Dotted/bracketed field path (e.g. `specs.mount[0]`).
    pub path: String,

    /// Operator name, resolved against the family registry at compile time.
    #[serde(rename = "op")]
    pub operator: String,

    /// Comparison value; its interpretation belongs to the operator.
    #[serde(default)]
    pub value: Value,

    /// Hard (admission-gating) or soft (score-contributing).
    #[serde(default, skip_serializing_if = "is_default_mode")]
    pub mode: Mode,

    /// Multiplier applied to this clause's soft score.
    #[serde(default = "default_weight", skip_serializing_if = "is_default_weight")]
    pub weight: f64,

    /// Missing-field policy; `None` means [`MissingPolicy::Exclude`].
    #[serde(rename = "missing", default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<MissingPolicy>,
}

fn default_weight() -> f64 {
    1.0
}

fn is_default_weight(weight: &f64) -> bool {
    *weight == 1.0
}

fn is_default_mode(mode: &Mode) -> bool {
    *mode == Mode::Hard
}

impl Clause {
    /// Create a hard clause with weight 1.
    pub fn new(path: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            operator: operator.into(),
            value,
            mode: Mode::Hard,
            weight: 1.0,
            missing: None,
        }
    }

    /// Switch this clause to soft mode.
    pub fn soft(mut self) -> Self {
        self.mode = Mode::Soft;
        self
    }

    /// Set the soft-score weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the missing-field policy.
    pub fn with_missing(mut self, policy: MissingPolicy) -> Self {
        self.missing = Some(policy);
        self
    }

    /// The effective missing-field policy.
    pub fn missing_policy(&self) -> MissingPolicy {
        self.missing.unwrap_or(MissingPolicy::Exclude)
    }
}

// ============================================================================
// Spec tree
// ============================================================================

/// A combinator node: children under `allOf`/`anyOf`, or a negated child.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Children that must all hold.
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Spec>,

    /// Children of which any may hold.
    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<Spec>,

    /// A single negated child.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<Spec>>,
}

/// The declarative constraint tree: a leaf clause or a combinator group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Spec {
    /// A leaf clause.
    Clause(Clause),
    /// A combinator node.
    Group(Group),
}

impl Spec {
    /// Build an `allOf` group.
    pub fn all_of(children: Vec<Spec>) -> Self {
        Self::Group(Group {
            all_of: children,
            ..Group::default()
        })
    }

    /// Build an `anyOf` group.
    pub fn any_of(children: Vec<Spec>) -> Self {
        Self::Group(Group {
            any_of: children,
            ..Group::default()
        })
    }

    /// Build a `not` node.
    pub fn negate(child: Spec) -> Self {
        Self::Group(Group {
            not: Some(Box::new(child)),
            ..Group::default()
        })
    }

    /// Collect every leaf clause, depth-first in declaration order.
    ///
    /// Group fields contribute in fixed order: `allOf`, then `anyOf`, then
    /// `not`. The combinator kind does not alter collection — all leaves
    /// land in one conjunctive list.
    pub fn flatten(&self) -> Vec<&Clause> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Clause>) {
        match self {
            Spec::Clause(clause) => out.push(clause),
            Spec::Group(group) => {
                for child in &group.all_of {
                    child.collect(out);
                }
                for child in &group.any_of {
                    child.collect(out);
                }
                if let Some(child) = &group.not {
                    child.collect(out);
                }
            }
        }
    }

    /// Number of leaf clauses in the tree.
    pub fn clause_count(&self) -> usize {
        self.flatten().len()
    }
}

impl From<Clause> for Spec {
    fn from(clause: Clause) -> Self {
        Self::Clause(clause)
    }
}

// ============================================================================
// Tests
// ============================================================================
