//! Cribra Adapters — translators between external representations and
//! the canonical spec.
//!
//! All adapters are stateless pure functions: external state in, spec out
//! (or the reverse). They never evaluate anything — compilation and
//! execution belong to `cribra-engine`.
//!
//! # Modules
//!
//! - [`state`]: arbitrary application state → spec, via mapping tables
//! - [`query`]: URL query parameters ↔ spec, round-trippable
//! - [`dataset`]: externally-described dataset integration points

pub mod dataset;
pub mod query;
pub mod state;

// Re-export key types at crate root for convenience
pub use dataset::{params_to_spec, schema_to_dataset, DatasetDescriptor, FieldDescriptor};
pub use query::{from_query_params, to_query_params, QueryMapping};
pub use state::{spec_from_state, Setting, StateMapping};
