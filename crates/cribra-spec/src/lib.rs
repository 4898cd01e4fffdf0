//! Cribra Spec — the declarative constraint-tree model.
//!
//! This crate defines the canonical [`Spec`] tree (clauses under
//! `allOf`/`anyOf`/`not` combinators), its wire/JSON shape, and the opt-in
//! structural validator. Compilation and execution live in `cribra-engine`;
//! translation from external representations lives in `cribra-adapters`.
//!
//! # Modules
//!
//! - [`types`]: Clause, Spec, Group, Mode, MissingPolicy
//! - [`validate`]: structural well-formedness reports

pub mod types;
pub mod validate;

// Re-export key types at crate root for convenience
pub use types::{Clause, Group, MissingPolicy, Mode, Spec};
pub use validate::{validate, validate_spec, ValidationError, ValidationReport};
