//! Field-path accessors for record values.
//!
//! A [`FieldPath`] compiles a dotted/bracketed path string such as
//! `specs.mount[2].name` into a reusable segment list. Parsing happens once
//! per path (typically once per compiled clause), never per record.
//!
//! Resolution walks a `serde_json::Value` and short-circuits to `None` —
//! the "absent" sentinel — the moment an intermediate node is null, missing,
//! or of the wrong shape. A null leaf is also treated as absent: downstream
//! operators read absence as "not satisfied", never as an error.
//!
//! Parsing is total. A bracket pair whose content is not a valid index
//! (`specs[first]`, unclosed brackets) falls back to a literal key segment,
//! keeping the accessor layer free of failure paths; the validator and
//! diagnostics layers are where malformed paths get surfaced.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// Segments
// ============================================================================

/// One step of a compiled field path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    /// An object key lookup.
    Key(String),
    /// An array index lookup.
    Index(usize),
}

// ============================================================================
// FieldPath
// ============================================================================

/// A compiled field path: the raw string plus its parsed segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parse a dotted/bracketed path string.
    ///
    /// `a.b[2].c` → `[Key("a"), Key("b"), Index(2), Key("c")]`.
    /// Empty segments (leading/trailing/double dots) are skipped.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let mut segments = Vec::new();

        for part in raw.split('.') {
            if part.is_empty() {
                continue;
            }
            parse_part(part, &mut segments);
        }

        Self { raw, segments }
    }

    /// The original path string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The compiled segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Walk `root` along this path.
    ///
    /// Returns `None` as soon as any step is missing, mistyped, or null.
    /// A null value at the leaf is also reported as absent.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for segment in &self.segments {
            current = match segment {
                Segment::Key(key) => current.as_object()?.get(key)?,
                Segment::Index(idx) => current.as_array()?.get(*idx)?,
            };
        }
        if current.is_null() { None } else { Some(current) }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for FieldPath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Parse one dot-separated part, splitting off any `[n]` index suffixes.
fn parse_part(part: &str, segments: &mut Vec<Segment>) {
    let mut rest = part;
    loop {
        let Some(open) = rest.find('[') else {
            if !rest.is_empty() {
                segments.push(Segment::Key(rest.to_string()));
            }
            return;
        };

        let Some(close) = rest[open..].find(']').map(|i| open + i) else {
            // Unclosed bracket: keep the whole part as a literal key.
            segments.push(Segment::Key(rest.to_string()));
            return;
        };

        let Ok(index) = rest[open + 1..close].parse::<usize>() else {
            // Non-numeric index: keep the whole part as a literal key.
            segments.push(Segment::Key(rest.to_string()));
            return;
        };

        if open > 0 {
            segments.push(Segment::Key(rest[..open].to_string()));
        }
        segments.push(Segment::Index(index));
        rest = &rest[close + 1..];
        if rest.is_empty() {
            return;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
