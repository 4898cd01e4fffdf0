//! State → Spec translation.
//!
//! UI filter state arrives as an arbitrary JSON object; a mapping table
//! declares how its fields become clauses. Each [`StateMapping`] is
//! optionally gated by a `condition` over the whole state, extracts one
//! field by dotted path, optionally transforms it, and emits one clause.
//! All emitted clauses combine under one top-level `allOf`. Absent state
//! fields emit nothing.
//!
//! Mode and weight are [`Setting`]s — either a static value or a function
//! of the state — resolved once here, when the spec is built, never
//! re-dispatched per record.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use cribra_core::FieldPath;
use cribra_spec::{Clause, Mode, Spec};

// ============================================================================
// Setting
// ============================================================================

/// A mapping parameter that is either fixed or derived from the state.
#[derive(Clone)]
pub enum Setting<T> {
    /// A fixed value.
    Static(T),
    /// A value computed from the external state at spec-build time.
    Derived(Arc<dyn Fn(&Value) -> T + Send + Sync>),
}

impl<T: Clone> Setting<T> {
    /// Resolve against the state.
    pub fn resolve(&self, state: &Value) -> T {
        match self {
            Setting::Static(value) => value.clone(),
            Setting::Derived(f) => f(state),
        }
    }
}

impl<T> From<T> for Setting<T> {
    fn from(value: T) -> Self {
        Setting::Static(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Static(value) => write!(f, "Static({value:?})"),
            Setting::Derived(_) => write!(f, "Derived(..)"),
        }
    }
}

// ============================================================================
// StateMapping
// ============================================================================

/// Transform applied to an extracted state value; receives the value and
/// the whole state.
pub type TransformFn = Arc<dyn Fn(&Value, &Value) -> Value + Send + Sync>;

/// Gate deciding whether a mapping applies to the current state.
pub type ConditionFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// One mapping from a state field to a clause.
#[derive(Clone)]
pub struct StateMapping {
    /// Dotted path into the state object.
    pub source_field: String,
    /// Clause path in the record domain.
    pub target_path: String,
    /// Clause operator name.
    pub operator: String,
    /// Clause mode, static or state-derived.
    pub mode: Setting<Mode>,
    /// Clause weight, static or state-derived.
    pub weight: Setting<f64>,
    /// Optional value transform.
    pub transform: Option<TransformFn>,
    /// Optional gate over the state.
    pub condition: Option<ConditionFn>,
}

impl StateMapping {
    /// Create a hard, weight-1 mapping.
    pub fn new(
        source_field: impl Into<String>,
        target_path: impl Into<String>,
        operator: impl Into<String>,
    ) -> Self {
        Self {
            source_field: source_field.into(),
            target_path: target_path.into(),
            operator: operator.into(),
            mode: Setting::Static(Mode::Hard),
            weight: Setting::Static(1.0),
            transform: None,
            condition: None,
        }
    }

    /// Set the mode (static value or derived function).
    pub fn with_mode(mut self, mode: impl Into<Setting<Mode>>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Set the weight (static value or derived function).
    pub fn with_weight(mut self, weight: impl Into<Setting<f64>>) -> Self {
        self.weight = weight.into();
        self
    }

    /// Set a value transform.
    pub fn with_transform(
        mut self,
        transform: impl Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Set a condition gate.
    pub fn with_condition(
        mut self,
        condition: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.condition = Some(Arc::new(condition));
        self
    }
}

impl fmt::Debug for StateMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMapping")
            .field("source_field", &self.source_field)
            .field("target_path", &self.target_path)
            .field("operator", &self.operator)
            .field("mode", &self.mode)
            .field("weight", &self.weight)
            .field("transform", &self.transform.as_ref().map(|_| ".."))
            .field("condition", &self.condition.as_ref().map(|_| ".."))
            .finish()
    }
}

// ============================================================================
// Translation
// ============================================================================

/// Build a spec from an external state object and a mapping table.
pub fn spec_from_state(state: &Value, mappings: &[StateMapping]) -> Spec {
    let mut clauses: Vec<Spec> = Vec::new();

    for mapping in mappings {
        if mapping
            .condition
            .as_ref()
            .is_some_and(|applies| !applies(state))
        {
            continue;
        }

        let Some(raw) = FieldPath::parse(mapping.source_field.as_str()).resolve(state) else {
            continue;
        };

        let value = match &mapping.transform {
            Some(transform) => transform(raw, state),
            None => raw.clone(),
        };

        let mut clause = Clause::new(&mapping.target_path, &mapping.operator, value);
        clause.mode = mapping.mode.resolve(state);
        clause.weight = mapping.weight.resolve(state);
        clauses.push(clause.into());
    }

    log::debug!(
        "state adapter emitted {} of {} mapped clauses",
        clauses.len(),
        mappings.len()
    );
    Spec::all_of(clauses)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mappings() -> Vec<StateMapping> {
        vec![
            StateMapping::new("filters.brand", "brand", "eq"),
            StateMapping::new("filters.maxPrice", "price_chf", "at_most")
                .with_mode(Mode::Soft)
                .with_weight(2.0),
            StateMapping::new("filters.sealedOnly", "weather_sealed", "is_true")
                .with_condition(|state| state["filters"]["sealedOnly"] == json!(true)),
        ]
    }

    #[test]
    fn test_spec_from_state_emits_all_of() {
        let state = json!({"filters": {"brand": "Canon", "maxPrice": 1500, "sealedOnly": true}});
        let spec = spec_from_state(&state, &mappings());

        let clauses = spec.flatten();
        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[0].path, "brand");
        assert_eq!(clauses[0].value, json!("Canon"));
        assert_eq!(clauses[1].mode, Mode::Soft);
        assert_eq!(clauses[1].weight, 2.0);
    }

    #[test]
    fn test_absent_state_fields_emit_nothing() {
        let state = json!({"filters": {"brand": "Canon"}});
        let spec = spec_from_state(&state, &mappings());

        let clauses = spec.flatten();
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].path, "brand");
    }

    #[test]
    fn test_condition_gates_mapping() {
        let state = json!({"filters": {"brand": "Canon", "sealedOnly": false}});
        let spec = spec_from_state(&state, &mappings());

        // sealedOnly is present but the condition rejects the state.
        assert!(spec.flatten().iter().all(|c| c.path != "weather_sealed"));
    }

    #[test]
    fn test_transform_rewrites_value() {
        let mapping = StateMapping::new("budget", "price_chf", "at_most")
            .with_transform(|value, _state| {
                // Budget arrives in hundreds
                json!(value.as_f64().unwrap_or(0.0) * 100.0)
            });
        let spec = spec_from_state(&json!({"budget": 15}), &[mapping]);

        assert_eq!(spec.flatten()[0].value, json!(1500.0));
    }

    #[test]
    fn test_derived_mode_and_weight() {
        let mapping = StateMapping::new("brand", "brand", "eq")
            .with_mode(Setting::Derived(Arc::new(|state: &Value| {
                if state["strictBrand"] == json!(true) {
                    Mode::Hard
                } else {
                    Mode::Soft
                }
            })))
            .with_weight(Setting::Derived(Arc::new(|state: &Value| {
                state["brandWeight"].as_f64().unwrap_or(1.0)
            })));

        let strict = json!({"brand": "Canon", "strictBrand": true, "brandWeight": 3.0});
        let clauses_strict = spec_from_state(&strict, std::slice::from_ref(&mapping));
        let flattened = clauses_strict.flatten();
        assert_eq!(flattened[0].mode, Mode::Hard);
        assert_eq!(flattened[0].weight, 3.0);

        let relaxed = json!({"brand": "Canon", "strictBrand": false});
        let clauses_relaxed = spec_from_state(&relaxed, std::slice::from_ref(&mapping));
        assert_eq!(clauses_relaxed.flatten()[0].mode, Mode::Soft);
    }

    #[test]
    fn test_empty_state_yields_empty_all_of() {
        let spec = spec_from_state(&json!({}), &mappings());
        assert!(spec.flatten().is_empty());
    }

    #[test]
    fn test_setting_from_value() {
        let setting: Setting<f64> = 2.5.into();
        assert_eq!(setting.resolve(&json!({})), 2.5);
    }
}
