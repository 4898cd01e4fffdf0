//! Cribra — declarative filter/rank compilation engine, umbrella crate.
//!
//! Re-exports the component crates behind one roof:
//!
//! - `cribra-core`: errors, field-path accessors, the `Record` trait
//! - `cribra-spec`: the constraint-tree model and validator
//! - `cribra-engine`: compilation, filter/rank execution, explain
//! - `cribra-vector` (feature `vector`): exact cosine vector index
//! - `cribra-adapters` (feature `adapters`): state/query-param translators
//!
//! # Example
//!
//! ```rust
//! use cribra::engine::{compile, filter};
//! use cribra::spec::{Clause, Spec};
//! use serde_json::json;
//!
//! let spec = Spec::all_of(vec![
//!     Clause::new("brand", "eq", json!("Canon")).into(),
//! ]);
//! let exec = compile(&spec);
//!
//! let kept = filter(vec![json!({"brand": "Canon"}), json!({"brand": "Sony"})], &exec);
//! assert_eq!(kept.len(), 1);
//! ```

pub use cribra_core as core;
pub use cribra_engine as engine;
pub use cribra_spec as spec;

#[cfg(feature = "adapters")]
pub use cribra_adapters as adapters;

#[cfg(feature = "vector")]
pub use cribra_vector as vector;
