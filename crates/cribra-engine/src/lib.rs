//! Cribra Engine — spec compilation and filter/rank execution.
//!
//! This crate turns a declarative constraint tree into an executable pair
//! of functions — a boolean admission test and a multi-criteria numeric
//! score — and applies them to arbitrary record collections.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      cribra-engine                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  operators: five families (numeric/text/set/boolean/vector) │
//! │  ├── membership lists probed in fixed order                 │
//! │  └── compile-time hard/soft closure factories               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  compile: Spec → Executable (test/score closure bundles)    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  filter: eager Vec + lazy Stream forms                      │
//! │  rank:   reduce → TopK/sort → paginate → tie-break window   │
//! │  explain: per-clause contribution breakdown                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  diagnostics: opt-in strict lint over a spec                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use cribra_engine::{compile, rank, RankOptions};
//! use cribra_spec::{Clause, Spec};
//! use serde_json::json;
//!
//! let spec = Spec::all_of(vec![
//!     Clause::new("brand", "eq", json!("Canon")).into(),
//!     Clause::new("price_chf", "at_most", json!(1500)).soft().into(),
//! ]);
//! let exec = compile(&spec);
//!
//! let cameras = vec![
//!     json!({"brand": "Canon", "price_chf": 999}),
//!     json!({"brand": "Sony", "price_chf": 899}),
//! ];
//! let ranked = rank(cameras, &exec, &RankOptions::default().with_top_k(10));
//! assert_eq!(ranked.len(), 1);
//! ```
//!
//! The engine has no internal threads or timers: everything runs
//! synchronously on the caller's thread, and the only suspension points
//! are the pulls of the lazy stream filter. An [`Executable`] holds no
//! per-call state, so one compile serves many records and many threads.

pub mod compile;
pub mod diagnostics;
pub mod explain;
pub mod filter;
pub mod operators;
pub mod rank;
pub mod topk;

// Re-export key types at crate root for convenience
pub use compile::{compile, Executable, Score};
pub use diagnostics::{diagnose, Diagnostic, Severity};
pub use explain::{explain, ClauseExplanation, Explanation};
pub use filter::{filter, filter_stream};
pub use rank::{rank, Direction, RankOptions, Ranked, ScoreReducer, TieBreaker};
pub use topk::{ScoredEntry, TopK};
