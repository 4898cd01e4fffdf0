//! Dataset-schema integration points.
//!
//! Externally-described datasets (an API exposing its own schema document)
//! will eventually translate into field descriptors and specs here. The
//! descriptor types and both entry points are declared so callers can wire
//! the seams today; the translations themselves return empty structures.
//!
//! TODO: map schema field types onto operator families once the dataset
//! API settles on a type vocabulary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use cribra_spec::Spec;

/// One field of an externally-described dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field path within dataset records.
    pub path: String,
    /// Declared field type, as named by the external schema.
    pub kind: String,
}

/// A dataset as described by an external schema document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    /// Dataset name.
    pub name: String,
    /// Declared fields.
    pub fields: Vec<FieldDescriptor>,
}

/// Translate an external schema document into a dataset descriptor.
pub fn schema_to_dataset(_schema: &Value) -> DatasetDescriptor {
    DatasetDescriptor::default()
}

/// Translate an external parameter document into a spec.
pub fn params_to_spec(_params: &Value) -> Spec {
    Spec::all_of(Vec::new())
}
