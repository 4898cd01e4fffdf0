//! Exact nearest-neighbour index over dense vectors.
//!
//! [`ExactVectorIndex`] is a brute-force cosine-similarity scan: every query
//! computes the similarity against all stored vectors, sorts descending, and
//! truncates to `top_k`. That is `O(n)` per query with exact results — no
//! approximation, no recall trade-off. For the collection sizes this engine
//! serves (in-memory record sets), the linear scan is the right tool.
//!
//! `build()` is a no-op hook kept for API parity with approximate indexes
//! that need a construction pass; callers may treat add/build/search as the
//! standard index lifecycle either way.

use serde::{Deserialize, Serialize};

use crate::similarity::cosine_similarity;

// ============================================================================
// Types
// ============================================================================

/// One stored vector with its identifier and caller payload.
#[derive(Clone, Debug)]
struct IndexEntry<P> {
    id: u64,
    vector: Vec<f32>,
    payload: P,
}

/// One search result: identifier, cosine similarity, payload snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit<P> {
    /// Identifier passed to `add`.
    pub id: u64,
    /// Cosine similarity against the query, higher is more similar.
    pub score: f32,
    /// The payload stored with the vector.
    pub payload: P,
}

// ============================================================================
// ExactVectorIndex
// ============================================================================

/// Brute-force exact cosine-similarity index.
#[derive(Clone, Debug)]
pub struct ExactVectorIndex<P> {
    entries: Vec<IndexEntry<P>>,
}

impl<P> Default for ExactVectorIndex<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ExactVectorIndex<P> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Store a vector with its identifier and payload.
    pub fn add(&mut self, id: u64, vector: Vec<f32>, payload: P) {
        self.entries.push(IndexEntry {
            id,
            vector,
            payload,
        });
    }

    /// Finish construction.
    ///
    /// The exact scan needs no build pass; this hook exists so callers can
    /// follow the usual add/build/search index lifecycle.
    pub fn build(&mut self) {}

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all stored vectors.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<P: Clone> ExactVectorIndex<P> {
    /// Exact nearest-neighbour search.
    ///
    /// Scans every stored vector, computes cosine similarity against
    /// `query`, optionally pre-filters by `predicate` over the payload,
    /// sorts descending by similarity, and returns at most `top_k` hits.
    pub fn search(
        &self,
        query: &[f32],
        top_k: usize,
        predicate: Option<&dyn Fn(&P) -> bool>,
    ) -> Vec<SearchHit<P>> {
        let mut hits: Vec<SearchHit<P>> = self
            .entries
            .iter()
            .filter(|entry| predicate.is_none_or(|keep| keep(&entry.payload)))
            .map(|entry| SearchHit {
                id: entry.id,
                score: cosine_similarity(query, &entry.vector),
                payload: entry.payload.clone(),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(top_k);
        hits
    }
}

// ============================================================================
// Tests
// ============================================================================
