//! Filter execution over record collections.
//!
//! Two forms share one [`Executable`]:
//!
//! - [`filter`] consumes a finite in-memory collection and returns a new
//!   one preserving relative order. It is a pure filter: applying it again
//!   with the same executable returns the result unchanged.
//! - [`filter_stream`] adapts a lazily-pulled [`Stream`] — finite or
//!   infinite, not restartable. Each pull advances the source until the
//!   next admitted item (or exhaustion). The consumer paces everything;
//!   there is no internal buffering beyond the in-flight item, and
//!   cancellation is simply dropping the stream.

use std::sync::Arc;

use futures::{future, Stream, StreamExt};

use cribra_core::Record;

use crate::compile::Executable;

/// Filter an in-memory collection, preserving relative order.
pub fn filter<T, I>(data: I, exec: &Executable) -> Vec<T>
where
    T: Record,
    I: IntoIterator<Item = T>,
{
    data.into_iter().filter(|item| exec.test(item)).collect()
}

/// Filter a lazily-pulled sequence.
///
/// The executable is shared via `Arc` so the returned stream is `'static`
/// when the source is, and the same compile can serve concurrent consumers.
pub fn filter_stream<T, S>(source: S, exec: Arc<Executable>) -> impl Stream<Item = T>
where
    T: Record,
    S: Stream<Item = T>,
{
    source.filter(move |item| future::ready(exec.test(item)))
}

// ============================================================================
// Tests
// ============================================================================
