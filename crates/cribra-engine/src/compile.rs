//! Spec compilation: from constraint tree to executable closures.
//!
//! [`compile`] flattens a [`Spec`] depth-first into its ordered clause
//! list and binds each clause exactly once: the field path is parsed, the
//! operator family resolved, and the hard/soft factories run, yielding a
//! bundle of reusable closures. The resulting [`Executable`] is immutable
//! and holds no per-call state, so one compile can serve many `test`/
//! `score` calls — typically once per record in a dataset — and can be
//! shared across threads behind an `Arc`.
//!
//! Unknown operator names compile to a vacuous bundle (always-false hard,
//! always-zero soft) rather than erroring; see the
//! [`operators`](crate::operators) module.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use cribra_core::{FieldPath, Record};
use cribra_spec::{Clause, MissingPolicy, Mode, Spec};

use crate::operators::{self, Family, HardFn, SoftFn};

// ============================================================================
// Score
// ============================================================================

/// Result of scoring one item against an executable.
///
/// `parts` is index-aligned with the executable's flattened clause list:
/// soft clauses contribute `weight * soft(value)`, hard clauses always
/// contribute `0.0` (they gate admission, they do not add to the score).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Sum of all parts.
    pub total: f64,
    /// Per-clause contributions, in flattened clause order.
    pub parts: Vec<f64>,
}

// ============================================================================
// Compiled clause
// ============================================================================

/// One clause bound to its accessor and operator closures.
struct CompiledClause {
    mode: Mode,
    weight: f64,
    missing: MissingPolicy,
    path: FieldPath,
    hard: HardFn,
    soft: SoftFn,
    /// Family default used under [`MissingPolicy::CoerceDefault`];
    /// `None` for unknown operators.
    coerced_default: Option<Value>,
}

impl CompiledClause {
    fn bind(clause: &Clause) -> Self {
        let family = operators::resolve(&clause.operator);
        let (hard, soft, coerced_default) = match family {
            Some(family) => (
                family.hard(&clause.operator, &clause.value),
                family.soft(&clause.operator, &clause.value),
                Some(family.default_value()),
            ),
            None => {
                debug!(
                    "unknown operator `{}` on path `{}`; clause compiled vacuous",
                    clause.operator, clause.path
                );
                (operators::vacuous_hard(), operators::vacuous_soft(), None)
            }
        };

        Self {
            mode: clause.mode,
            weight: clause.weight,
            missing: clause.missing_policy(),
            path: FieldPath::parse(clause.path.as_str()),
            hard,
            soft,
            coerced_default,
        }
    }

    fn eval_hard<R: Record>(&self, item: &R) -> bool {
        match (item.field(&self.path), self.missing) {
            (None, MissingPolicy::Ignore) => true,
            (None, MissingPolicy::CoerceDefault) => (self.hard)(self.coerced_default.as_ref()),
            (value, _) => (self.hard)(value.as_ref()),
        }
    }

    fn eval_soft<R: Record>(&self, item: &R) -> f64 {
        match (item.field(&self.path), self.missing) {
            (None, MissingPolicy::Ignore) => 0.0,
            (None, MissingPolicy::CoerceDefault) => (self.soft)(self.coerced_default.as_ref()),
            (value, _) => (self.soft)(value.as_ref()),
        }
    }
}

// ============================================================================
// Executable
// ============================================================================

/// A compiled spec: a reusable `test`/`score` pair plus the clause list
/// it was built from.
///
/// Stateless and re-entrant; safe to share across concurrent callers.
pub struct Executable {
    clauses: Vec<Clause>,
    compiled: Vec<CompiledClause>,
}

impl Executable {
    /// The ordered, flattened clause list this executable was built from.
    ///
    /// Score `parts` are index-aligned with this list.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Admission test.
    ///
    /// Iterates compiled clauses in flattened order and returns `false`
    /// the instant any hard clause fails — clauses after the first failure
    /// are not evaluated. Soft clauses never gate.
    pub fn test<R: Record>(&self, item: &R) -> bool {
        self.compiled
            .iter()
            .filter(|clause| clause.mode == Mode::Hard)
            .all(|clause| clause.eval_hard(item))
    }

    /// Multi-criteria score.
    ///
    /// Evaluates every clause: soft clauses contribute their weighted
    /// score, hard clauses contribute `0.0`.
    pub fn score<R: Record>(&self, item: &R) -> Score {
        let parts: Vec<f64> = self
            .compiled
            .iter()
            .map(|clause| match clause.mode {
                Mode::Hard => 0.0,
                Mode::Soft => clause.weight * clause.eval_soft(item),
            })
            .collect();
        let total = parts.iter().sum();
        Score { total, parts }
    }
}

/// Compile a spec into an [`Executable`].
pub fn compile(spec: &Spec) -> Executable {
    let clauses: Vec<Clause> = spec.flatten().into_iter().cloned().collect();
    let compiled = clauses.iter().map(CompiledClause::bind).collect();
    debug!("compiled spec with {} clauses", clauses.len());
    Executable { clauses, compiled }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn canon_sealed_affordable() -> Spec {
        Spec::all_of(vec![
            Clause::new("brand", "eq", json!("Canon")).into(),
            Clause::new("weather_sealed", "is_true", json!(true)).into(),
            Clause::new("price_chf", "between", json!([200, 1500])).into(),
        ])
    }

    fn cameras() -> Vec<Value> {
        vec![
            json!({"brand": "Canon", "weather_sealed": true, "price_chf": 999}),
            json!({"brand": "Canon", "weather_sealed": false, "price_chf": 999}),
            json!({"brand": "Sony", "weather_sealed": true, "price_chf": 999}),
            json!({"brand": "Canon", "weather_sealed": true, "price_chf": 2001}),
        ]
    }

    #[test]
    fn test_hard_conjunction() {
        let exec = compile(&canon_sealed_affordable());
        let results: Vec<bool> = cameras().iter().map(|c| exec.test(c)).collect();
        assert_eq!(results, vec![true, false, false, false]);
    }

    #[test]
    fn test_executable_is_reusable() {
        let exec = compile(&canon_sealed_affordable());
        let item = &cameras()[0];
        assert!(exec.test(item));
        assert!(exec.test(item));
        assert_eq!(exec.score(item), exec.score(item));
    }

    #[test]
    fn test_executable_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Executable>();
    }

    #[test]
    fn test_clauses_preserve_flattened_order() {
        let exec = compile(&canon_sealed_affordable());
        let paths: Vec<&str> = exec.clauses().iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["brand", "weather_sealed", "price_chf"]);
    }

    #[test]
    fn test_score_parts_align_with_clauses() {
        let spec = Spec::all_of(vec![
            Clause::new("brand", "eq", json!("Canon")).into(),
            Clause::new("price_chf", "at_most", json!(1500))
                .soft()
                .with_weight(2.0)
                .into(),
            Clause::new("weather_sealed", "is_true", json!(true))
                .soft()
                .into(),
        ]);
        let exec = compile(&spec);
        let score = exec.score(&cameras()[0]);

        // Hard clause contributes 0, soft clauses weight * score
        assert_eq!(score.parts, vec![0.0, 2.0, 1.0]);
        assert_eq!(score.total, 3.0);
    }

    #[test]
    fn test_soft_clause_never_gates() {
        let spec = Spec::all_of(vec![
            Clause::new("brand", "eq", json!("Leica")).soft().into(),
        ]);
        let exec = compile(&spec);
        assert!(exec.test(&cameras()[0]));
        assert_eq!(exec.score(&cameras()[0]).total, 0.0);
    }

    #[test]
    fn test_unknown_operator_fails_closed() {
        let spec: Spec = Clause::new("brand", "equals_ish", json!("Canon")).into();
        let exec = compile(&spec);
        assert!(!exec.test(&cameras()[0]));
        assert_eq!(exec.score(&cameras()[0]).total, 0.0);
    }

    #[test]
    fn test_missing_field_fails_hard_by_default() {
        let spec: Spec = Clause::new("sensor.size", "eq", json!("FF")).into();
        let exec = compile(&spec);
        assert!(!exec.test(&json!({"brand": "Canon"})));
    }

    #[test]
    fn test_missing_policy_ignore_passes_hard() {
        let spec: Spec = Clause::new("sensor.size", "eq", json!("FF"))
            .with_missing(MissingPolicy::Ignore)
            .into();
        let exec = compile(&spec);
        assert!(exec.test(&json!({"brand": "Canon"})));
    }

    #[test]
    fn test_missing_policy_ignore_scores_zero() {
        let spec: Spec = Clause::new("sensor.size", "eq", json!("FF"))
            .soft()
            .with_missing(MissingPolicy::Ignore)
            .into();
        let exec = compile(&spec);
        assert_eq!(exec.score(&json!({"brand": "Canon"})).total, 0.0);
    }

    #[test]
    fn test_missing_policy_coerce_default() {
        // Absent numeric field coerces to 0, which is at most 100
        let spec: Spec = Clause::new("price_chf", "at_most", json!(100))
            .with_missing(MissingPolicy::CoerceDefault)
            .into();
        let exec = compile(&spec);
        assert!(exec.test(&json!({"brand": "Canon"})));

        // ...but 0 is not at least 100
        let spec: Spec = Clause::new("price_chf", "at_least", json!(100))
            .with_missing(MissingPolicy::CoerceDefault)
            .into();
        let exec = compile(&spec);
        assert!(!exec.test(&json!({"brand": "Canon"})));
    }

    #[test]
    fn test_nested_path_clause() {
        let spec: Spec = Clause::new("specs.mount[0]", "eq", json!("RF")).into();
        let exec = compile(&spec);
        assert!(exec.test(&json!({"specs": {"mount": ["RF", "EF"]}})));
        assert!(!exec.test(&json!({"specs": {"mount": ["E"]}})));
    }

    #[test]
    fn test_any_of_leaves_are_conjunctive() {
        // Flattening folds every leaf into one AND list regardless of
        // the combinator that contains it.
        let spec = Spec::any_of(vec![
            Clause::new("brand", "eq", json!("Canon")).into(),
            Clause::new("brand", "eq", json!("Sony")).into(),
        ]);
        let exec = compile(&spec);
        assert_eq!(exec.clauses().len(), 2);
        // No record can equal both, so nothing passes.
        assert!(!exec.test(&cameras()[0]));
        assert!(!exec.test(&cameras()[2]));
    }

    #[test]
    fn test_empty_spec_admits_everything() {
        let exec = compile(&Spec::all_of(vec![]));
        assert!(exec.test(&json!({"anything": 1})));
        assert_eq!(exec.score(&json!({"anything": 1})).parts.len(), 0);
    }

    #[test]
    fn test_score_on_failing_item_still_computed() {
        let spec = Spec::all_of(vec![
            Clause::new("brand", "eq", json!("Canon")).into(),
            Clause::new("price_chf", "at_most", json!(1500)).soft().into(),
        ]);
        let exec = compile(&spec);
        let sony = &cameras()[2];
        assert!(!exec.test(sony));
        // Scoring is independent of admission
        assert_eq!(exec.score(sony).total, 1.0);
    }
}
