//! Query-string ↔ Spec translation for URL-state round-tripping.
//!
//! [`from_query_params`] reads named parameters through a mapping table
//! and emits clauses under one top-level `allOf`; [`to_query_params`] is
//! the inverse, re-serializing each mapped clause's value back to a
//! string. With the default parse/format pair — literal string in, bare
//! string or compact JSON out — simple `eq`/`is_true`/`between` mappings
//! round-trip their parameter values unchanged.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use cribra_spec::{Clause, Mode, Spec};

// ============================================================================
// QueryMapping
// ============================================================================

/// Parse a raw parameter string into a clause value.
pub type ParseFn = Arc<dyn Fn(&str) -> Value + Send + Sync>;

/// Render a clause value back to a parameter string.
pub type FormatFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// One mapping between a query parameter and a clause.
#[derive(Clone)]
pub struct QueryMapping {
    /// Query parameter name.
    pub query_param: String,
    /// Clause path in the record domain.
    pub target_path: String,
    /// Clause operator name.
    pub operator: String,
    /// Clause mode.
    pub mode: Mode,
    /// Clause weight.
    pub weight: f64,
    /// Optional inbound parse; defaults to the literal string.
    pub parse_in: Option<ParseFn>,
    /// Optional outbound format; defaults to bare strings and compact
    /// JSON for everything else.
    pub format_out: Option<FormatFn>,
}

impl QueryMapping {
    /// Create a hard, weight-1 mapping.
    pub fn new(
        query_param: impl Into<String>,
        target_path: impl Into<String>,
        operator: impl Into<String>,
    ) -> Self {
        Self {
            query_param: query_param.into(),
            target_path: target_path.into(),
            operator: operator.into(),
            mode: Mode::Hard,
            weight: 1.0,
            parse_in: None,
            format_out: None,
        }
    }

    /// Switch emitted clauses to soft mode.
    pub fn soft(mut self) -> Self {
        self.mode = Mode::Soft;
        self
    }

    /// Set the clause weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the inbound parse function.
    pub fn with_parse(mut self, parse: impl Fn(&str) -> Value + Send + Sync + 'static) -> Self {
        self.parse_in = Some(Arc::new(parse));
        self
    }

    /// Set the outbound format function.
    pub fn with_format(
        mut self,
        format: impl Fn(&Value) -> String + Send + Sync + 'static,
    ) -> Self {
        self.format_out = Some(Arc::new(format));
        self
    }
}

impl fmt::Debug for QueryMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryMapping")
            .field("query_param", &self.query_param)
            .field("target_path", &self.target_path)
            .field("operator", &self.operator)
            .field("mode", &self.mode)
            .field("weight", &self.weight)
            .finish()
    }
}

// ============================================================================
// Translation
// ============================================================================

/// Default inbound parse: the literal string.
fn default_parse(raw: &str) -> Value {
    Value::String(raw.to_string())
}

/// Default outbound format: strings render bare, everything else as
/// compact JSON.
fn default_format(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Build a spec from query parameters and a mapping table.
pub fn from_query_params(
    params: &BTreeMap<String, String>,
    mappings: &[QueryMapping],
) -> Spec {
    let mut clauses: Vec<Spec> = Vec::new();

    for mapping in mappings {
        let Some(raw) = params.get(&mapping.query_param) else {
            continue;
        };
        let value = match &mapping.parse_in {
            Some(parse) => parse(raw),
            None => default_parse(raw),
        };

        let mut clause = Clause::new(&mapping.target_path, &mapping.operator, value);
        clause.mode = mapping.mode;
        clause.weight = mapping.weight;
        clauses.push(clause.into());
    }

    log::debug!("query adapter emitted {} clauses", clauses.len());
    Spec::all_of(clauses)
}

/// Re-serialize a spec's mapped clauses back to query parameters.
///
/// For each mapping, the first flattened clause matching its target path
/// and operator is rendered; unmapped clauses are ignored.
pub fn to_query_params(spec: &Spec, mappings: &[QueryMapping]) -> BTreeMap<String, String> {
    let clauses = spec.flatten();
    let mut params = BTreeMap::new();

    for mapping in mappings {
        let Some(clause) = clauses
            .iter()
            .find(|c| c.path == mapping.target_path && c.operator == mapping.operator)
        else {
            continue;
        };
        let rendered = match &mapping.format_out {
            Some(format) => format(&clause.value),
            None => default_format(&clause.value),
        };
        params.insert(mapping.query_param.clone(), rendered);
    }

    params
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mappings() -> Vec<QueryMapping> {
        vec![
            QueryMapping::new("brand", "brand", "eq"),
            QueryMapping::new("sealed", "weather_sealed", "is_true"),
            QueryMapping::new("priceMin", "price_chf", "at_least"),
        ]
    }

    fn params(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_query_params_emits_all_of() {
        let spec = from_query_params(
            &params(&[("brand", "Canon"), ("sealed", "true"), ("priceMin", "200")]),
            &mappings(),
        );

        let clauses = spec.flatten();
        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[0].path, "brand");
        assert_eq!(clauses[0].value, json!("Canon"));
    }

    #[test]
    fn test_from_query_params_skips_absent_parameters() {
        let spec = from_query_params(&params(&[("brand", "Canon")]), &mappings());
        assert_eq!(spec.flatten().len(), 1);
    }

    #[test]
    fn test_round_trip_literal_values() {
        let original = params(&[("brand", "Canon"), ("sealed", "true"), ("priceMin", "200")]);
        let spec = from_query_params(&original, &mappings());
        let round_tripped = to_query_params(&spec, &mappings());

        assert_eq!(round_tripped, original);
    }

    #[test]
    fn test_custom_parse_and_format_round_trip() {
        let mapping = QueryMapping::new("price", "price_chf", "between")
            .with_parse(|raw| {
                let bounds: Vec<f64> = raw
                    .split('-')
                    .filter_map(|part| part.parse().ok())
                    .collect();
                json!(bounds)
            })
            .with_format(|value| {
                let bounds = value.as_array().cloned().unwrap_or_default();
                bounds
                    .iter()
                    .filter_map(Value::as_f64)
                    .map(|b| format!("{b}"))
                    .collect::<Vec<_>>()
                    .join("-")
            });

        let original = params(&[("price", "200-1500")]);
        let spec = from_query_params(&original, std::slice::from_ref(&mapping));
        assert_eq!(spec.flatten()[0].value, json!([200.0, 1500.0]));

        let round_tripped = to_query_params(&spec, std::slice::from_ref(&mapping));
        assert_eq!(round_tripped, original);
    }

    #[test]
    fn test_soft_mapping_sets_mode_and_weight() {
        let mapping = QueryMapping::new("maxPrice", "price_chf", "at_most")
            .soft()
            .with_weight(2.0);
        let spec = from_query_params(
            &params(&[("maxPrice", "1500")]),
            std::slice::from_ref(&mapping),
        );

        let clauses = spec.flatten();
        assert_eq!(clauses[0].mode, Mode::Soft);
        assert_eq!(clauses[0].weight, 2.0);
    }

    #[test]
    fn test_to_query_params_ignores_unmapped_clauses() {
        let spec = Spec::all_of(vec![
            Clause::new("brand", "eq", json!("Canon")).into(),
            Clause::new("iso_max", "at_least", json!(51200)).into(),
        ]);
        let rendered = to_query_params(&spec, &mappings());

        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered.get("brand").unwrap(), "Canon");
    }

    #[test]
    fn test_default_format_renders_scalars() {
        assert_eq!(default_format(&json!("Canon")), "Canon");
        assert_eq!(default_format(&json!(200)), "200");
        assert_eq!(default_format(&json!(true)), "true");
        assert_eq!(default_format(&json!([200, 1500])), "[200,1500]");
    }

    #[test]
    fn test_empty_params_yield_empty_spec() {
        let spec = from_query_params(&BTreeMap::new(), &mappings());
        assert!(spec.flatten().is_empty());
    }
}
