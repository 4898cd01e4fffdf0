//! Record abstraction for filterable and rankable items.
//!
//! The engine is generic over the collections it scans: anything that can
//! answer "what value lives at this field path?" can be filtered, ranked,
//! and explained. `serde_json::Value` implements [`Record`] out of the box;
//! application types with their own storage implement it directly.

use crate::path::FieldPath;
use serde_json::Value;

/// An item the engine can test and score.
///
/// `field` returns the value at a compiled path, or `None` when the field
/// is absent. Absence is a first-class outcome: hard operators read it as
/// "not satisfied" and soft operators contribute nothing for it.
pub trait Record {
    /// Look up the value at `path`, if present.
    fn field(&self, path: &FieldPath) -> Option<Value>;
}

impl Record for Value {
    fn field(&self, path: &FieldPath) -> Option<Value> {
        path.resolve(self).cloned()
    }
}

impl<T: Record> Record for &T {
    fn field(&self, path: &FieldPath) -> Option<Value> {
        (*self).field(path)
    }
}
