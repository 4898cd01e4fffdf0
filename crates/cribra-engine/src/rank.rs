//! Rank execution: score, order, window, break ties.
//!
//! [`rank`] filters first (items failing `test` are dropped), scores each
//! survivor, reduces the per-clause parts to one scalar, and orders
//! descending — either through the bounded [`TopK`] buffer when `top_k`
//! is set (bounded memory, no total ordering among discarded items) or a
//! full stable sort otherwise. `offset`/`limit` pagination selects the
//! visible window, and tie-breakers are applied *within that window only*:
//! ties are broken on the page the caller sees, not globally before
//! paging. That ordering contract is part of the API.

use std::cmp::Ordering;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use cribra_core::{compare_values, FieldPath, Record};

use crate::compile::Executable;
use crate::topk::TopK;

// ============================================================================
// Reducer
// ============================================================================

/// Combines per-clause soft parts into one scalar rank score.
///
/// `Sum` is the weighted sum — weights are pre-applied per clause, so no
/// separate weighted variant exists. `Custom` carries a caller-supplied
/// function and is code-level only (it does not serialize).
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreReducer {
    /// Sum of parts (the default).
    #[default]
    Sum,
    /// Smallest part; 0 for an empty parts list.
    Min,
    /// Largest part; 0 for an empty parts list.
    Max,
    /// Caller-supplied reduction over the parts array.
    #[serde(skip)]
    Custom(Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>),
}

impl ScoreReducer {
    /// Reduce a parts array to one scalar. An empty parts list reduces
    /// to `0.0` under every built-in reducer.
    pub fn reduce(&self, parts: &[f64]) -> f64 {
        match self {
            ScoreReducer::Sum => parts.iter().sum(),
            ScoreReducer::Min => parts.iter().copied().reduce(f64::min).unwrap_or(0.0),
            ScoreReducer::Max => parts.iter().copied().reduce(f64::max).unwrap_or(0.0),
            ScoreReducer::Custom(f) => f(parts),
        }
    }
}

impl std::fmt::Debug for ScoreReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreReducer::Sum => write!(f, "Sum"),
            ScoreReducer::Min => write!(f, "Min"),
            ScoreReducer::Max => write!(f, "Max"),
            ScoreReducer::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

// ============================================================================
// Tie-breakers and options
// ============================================================================

/// Secondary sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// One secondary comparator: a field path and a direction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieBreaker {
    /// Dotted/bracketed field path.
    pub path: String,
    /// Sort direction.
    #[serde(rename = "dir", default)]
    pub direction: Direction,
}

impl TieBreaker {
    /// Create a tie-breaker.
    pub fn new(path: impl Into<String>, direction: Direction) -> Self {
        Self {
            path: path.into(),
            direction,
        }
    }
}

/// Options controlling rank execution.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RankOptions {
    /// Parts-to-scalar reduction; defaults to [`ScoreReducer::Sum`].
    #[serde(rename = "scoreReducer")]
    pub reducer: ScoreReducer,

    /// Secondary comparators, applied left to right within the window.
    #[serde(rename = "tieBreakers", skip_serializing_if = "Vec::is_empty")]
    pub tie_breakers: Vec<TieBreaker>,

    /// Bounded selection: retain only the k highest-scoring items.
    #[serde(rename = "topK", skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,

    /// Page size, applied after top-K selection or the full sort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Page start, applied before `limit`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl RankOptions {
    /// Set the reducer.
    pub fn with_reducer(mut self, reducer: ScoreReducer) -> Self {
        self.reducer = reducer;
        self
    }

    /// Append a tie-breaker.
    pub fn with_tie_breaker(mut self, path: impl Into<String>, direction: Direction) -> Self {
        self.tie_breakers.push(TieBreaker::new(path, direction));
        self
    }

    /// Set bounded top-K selection.
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }

    /// Set the page size.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the page start.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

// ============================================================================
// Ranked items
// ============================================================================

/// One admitted item with its reduced score and per-clause parts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ranked<T> {
    /// The admitted item.
    pub item: T,
    /// The reduced scalar score.
    pub score: f64,
    /// Per-clause contributions, in flattened clause order.
    pub parts: Vec<f64>,
}

// ============================================================================
// Rank
// ============================================================================

/// Filter, score, order, and window a collection.
pub fn rank<T, I>(data: I, exec: &Executable, options: &RankOptions) -> Vec<Ranked<T>>
where
    T: Record,
    I: IntoIterator<Item = T>,
{
    let scored = data.into_iter().filter(|item| exec.test(item)).map(|item| {
        let score = exec.score(&item);
        let total = options.reducer.reduce(&score.parts);
        Ranked {
            item,
            score: total,
            parts: score.parts,
        }
    });

    let ordered: Vec<Ranked<T>> = match options.top_k {
        Some(k) => {
            let mut topk = TopK::new(k);
            for ranked in scored {
                topk.insert(ranked.score, ranked);
            }
            topk.into_descending()
                .into_iter()
                .map(|entry| entry.item)
                .collect()
        }
        None => {
            let mut all: Vec<Ranked<T>> = scored.collect();
            // Stable: equal scores keep scan order.
            all.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
            all
        }
    };

    let offset = options.offset.unwrap_or(0);
    let limit = options.limit.unwrap_or(usize::MAX);
    let mut window: Vec<Ranked<T>> = ordered.into_iter().skip(offset).take(limit).collect();

    if !options.tie_breakers.is_empty() {
        break_ties(&mut window, &options.tie_breakers);
    }

    debug!("ranked window of {} items", window.len());
    window
}

/// Stable re-sort of the visible window: primary score descending, then
/// each tie-breaker's accessed value in its direction, left to right.
fn break_ties<T: Record>(window: &mut [Ranked<T>], tie_breakers: &[TieBreaker]) {
    let compiled: Vec<(FieldPath, Direction)> = tie_breakers
        .iter()
        .map(|tb| (FieldPath::parse(tb.path.as_str()), tb.direction))
        .collect();

    window.sort_by(|a, b| {
        match b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        for (path, direction) in &compiled {
            let left = a.item.field(path);
            let right = b.item.field(path);
            let ordering = compare_values(left.as_ref(), right.as_ref());
            let ordering = match direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use cribra_spec::{Clause, Spec};
    use serde_json::{json, Value};

    fn scoring_spec() -> Spec {
        Spec::all_of(vec![
            Clause::new("brand", "eq", json!("Canon")).into(),
            Clause::new("price_chf", "at_most", json!(1000)).soft().into(),
            Clause::new("weather_sealed", "is_true", json!(true))
                .soft()
                .with_weight(0.5)
                .into(),
        ])
    }

    fn cameras() -> Vec<Value> {
        vec![
            json!({"id": 1, "brand": "Canon", "price_chf": 900, "weather_sealed": true}),
            json!({"id": 2, "brand": "Canon", "price_chf": 1200, "weather_sealed": true}),
            json!({"id": 3, "brand": "Sony", "price_chf": 800, "weather_sealed": true}),
            json!({"id": 4, "brand": "Canon", "price_chf": 950, "weather_sealed": false}),
        ]
    }

    fn ids(ranked: &[Ranked<Value>]) -> Vec<i64> {
        ranked
            .iter()
            .map(|r| r.item["id"].as_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_rank_drops_failing_items() {
        let exec = compile(&scoring_spec());
        let ranked = rank(cameras(), &exec, &RankOptions::default());
        assert!(ids(&ranked).iter().all(|id| *id != 3));
    }

    #[test]
    fn test_rank_orders_descending_by_total() {
        let exec = compile(&scoring_spec());
        let ranked = rank(cameras(), &exec, &RankOptions::default());

        // id 1: 1.0 + 0.5; id 4: 1.0; id 2: decayed + 0.5
        assert_eq!(ids(&ranked)[0], 1);
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_rank_parts_align_with_clauses() {
        let exec = compile(&scoring_spec());
        let ranked = rank(cameras(), &exec, &RankOptions::default());
        let top = &ranked[0];
        assert_eq!(top.parts.len(), 3);
        assert_eq!(top.parts[0], 0.0); // hard clause
        assert_eq!(top.score, top.parts.iter().sum::<f64>());
    }

    #[test]
    fn test_rank_top_k_bounds_results() {
        let exec = compile(&scoring_spec());
        let options = RankOptions::default().with_top_k(2);
        let ranked = rank(cameras(), &exec, &options);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ids(&ranked)[0], 1);
        // Every retained item is a member of the filtered set
        assert!(ids(&ranked).iter().all(|id| [1, 2, 4].contains(id)));
    }

    #[test]
    fn test_rank_pagination() {
        let exec = compile(&scoring_spec());
        let all = rank(cameras(), &exec, &RankOptions::default());

        let options = RankOptions::default().with_offset(1).with_limit(1);
        let page = rank(cameras(), &exec, &options);

        assert_eq!(page.len(), 1);
        assert_eq!(ids(&page)[0], ids(&all)[1]);
    }

    #[test]
    fn test_rank_offset_beyond_end_is_empty() {
        let exec = compile(&scoring_spec());
        let options = RankOptions::default().with_offset(10);
        assert!(rank(cameras(), &exec, &options).is_empty());
    }

    #[test]
    fn test_tie_breakers_order_equal_scores() {
        // All hard: every admitted item scores 0, so ties decide everything.
        let spec = Spec::all_of(vec![
            Clause::new("brand", "eq", json!("Canon")).into(),
        ]);
        let exec = compile(&spec);

        let options = RankOptions::default().with_tie_breaker("price_chf", Direction::Asc);
        let ranked = rank(cameras(), &exec, &options);
        assert_eq!(ids(&ranked), vec![1, 4, 2]);

        let options = RankOptions::default().with_tie_breaker("price_chf", Direction::Desc);
        let ranked = rank(cameras(), &exec, &options);
        assert_eq!(ids(&ranked), vec![2, 4, 1]);
    }

    #[test]
    fn test_tie_breakers_chain_left_to_right() {
        let spec = Spec::all_of(vec![]);
        let exec = compile(&spec);
        let items = vec![
            json!({"id": 1, "grp": "b", "n": 1}),
            json!({"id": 2, "grp": "a", "n": 2}),
            json!({"id": 3, "grp": "a", "n": 1}),
        ];

        let options = RankOptions::default()
            .with_tie_breaker("grp", Direction::Asc)
            .with_tie_breaker("n", Direction::Desc);
        let ranked = rank(items, &exec, &options);
        assert_eq!(ids(&ranked), vec![2, 3, 1]);
    }

    #[test]
    fn test_tie_breaking_applies_to_window_only() {
        // Page out the top item, then tie-break the remaining window.
        let spec = Spec::all_of(vec![]);
        let exec = compile(&spec);
        let items = vec![
            json!({"id": 1, "name": "zulu"}),
            json!({"id": 2, "name": "alpha"}),
            json!({"id": 3, "name": "mike"}),
        ];

        let options = RankOptions::default()
            .with_offset(1)
            .with_tie_breaker("name", Direction::Asc);
        let ranked = rank(items, &exec, &options);

        // Offset removed id 1 (scan order, all scores equal); the window
        // is then tie-broken alphabetically.
        assert_eq!(ids(&ranked), vec![2, 3]);
    }

    #[test]
    fn test_reducer_sum_min_max() {
        assert_eq!(ScoreReducer::Sum.reduce(&[1.0, 2.0, 3.0]), 6.0);
        assert_eq!(ScoreReducer::Min.reduce(&[1.0, 2.0, 3.0]), 1.0);
        assert_eq!(ScoreReducer::Max.reduce(&[1.0, 2.0, 3.0]), 3.0);
    }

    #[test]
    fn test_reducer_empty_parts_is_zero() {
        assert_eq!(ScoreReducer::Sum.reduce(&[]), 0.0);
        assert_eq!(ScoreReducer::Min.reduce(&[]), 0.0);
        assert_eq!(ScoreReducer::Max.reduce(&[]), 0.0);
    }

    #[test]
    fn test_reducer_custom() {
        let mean = ScoreReducer::Custom(Arc::new(|parts: &[f64]| {
            if parts.is_empty() {
                0.0
            } else {
                parts.iter().sum::<f64>() / parts.len() as f64
            }
        }));
        assert_eq!(mean.reduce(&[1.0, 3.0]), 2.0);
    }

    #[test]
    fn test_rank_with_min_reducer_changes_order() {
        let spec = Spec::all_of(vec![
            Clause::new("a", "at_most", json!(10)).soft().into(),
            Clause::new("b", "at_most", json!(10)).soft().into(),
        ]);
        let exec = compile(&spec);
        let items = vec![
            // Balanced: min part 1.0
            json!({"id": 1, "a": 5, "b": 5}),
            // Lopsided: one part decays, min < 1
            json!({"id": 2, "a": 5, "b": 12}),
        ];

        let options = RankOptions::default().with_reducer(ScoreReducer::Min);
        let ranked = rank(items, &exec, &options);
        assert_eq!(ids(&ranked), vec![1, 2]);
    }

    #[test]
    fn test_rank_options_wire_shape() {
        let options: RankOptions = serde_json::from_value(json!({
            "scoreReducer": "max",
            "tieBreakers": [{"path": "price_chf", "dir": "desc"}],
            "topK": 5,
            "limit": 3,
            "offset": 1
        }))
        .unwrap();

        assert!(matches!(options.reducer, ScoreReducer::Max));
        assert_eq!(options.tie_breakers.len(), 1);
        assert_eq!(options.tie_breakers[0].direction, Direction::Desc);
        assert_eq!(options.top_k, Some(5));
        assert_eq!(options.limit, Some(3));
        assert_eq!(options.offset, Some(1));
    }

    #[test]
    fn test_rank_options_default_wire_shape() {
        let options: RankOptions = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(options.reducer, ScoreReducer::Sum));
        assert!(options.tie_breakers.is_empty());
        assert!(options.top_k.is_none());
    }
}
