//! Scoring strategies.
//!
//! Each strategy scores every unwatched movie in a catalog snapshot against
//! a [`WatchedProfile`]. They differ only in how the work is spread out;
//! ranking and truncation happen afterwards in the calling [`Recommender`],
//! so every strategy gives the same final answer.
//!
//! [`Recommender`]: crate::service::Recommender

mod parallel_flux;
mod parallel_stream;
mod sequential_loop;
mod structured_concurrency;

pub use parallel_flux::ParallelFlux;
pub use parallel_stream::ParallelStream;
pub use sequential_loop::SequentialLoop;
pub use structured_concurrency::StructuredConcurrency;

use crate::error::Result;
use crate::ranker::WatchedProfile;
use crate::types::{Ranking, Strategy};
use async_trait::async_trait;
use database::{Catalog, Movie};
use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::trace;

/// Default number of movies each worker scores at a time
pub const DEFAULT_CHUNK_SIZE: usize = 256;

/// Core trait for a concurrency strategy.
///
/// `Send + Sync + 'static` so one instance can be shared by every request a
/// backend serves.
#[async_trait]
pub trait ScoringStrategy: Send + Sync + 'static {
    /// Which strategy this is
    fn strategy(&self) -> Strategy;

    /// Score every movie in `catalog` the profile hasn't watched.
    ///
    /// Output order is unspecified.
    async fn score(
        &self,
        catalog: Arc<Catalog>,
        profile: Arc<WatchedProfile>,
    ) -> Result<Vec<Ranking>>;
}

/// Split `0..len` into ranges of at most `chunk_size`
pub(crate) fn chunk_ranges(len: usize, chunk_size: usize) -> Vec<Range<usize>> {
    let chunk_size = chunk_size.max(1);
    (0..len)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(len))
        .collect()
}

/// Shared flag telling blocking workers their request is gone.
///
/// Raised when the scoring future holding the [`CancelOnDrop`] guard is
/// dropped. Workers check it before every chunk; a chunk already being
/// scored runs to the end.
#[derive(Debug, Clone, Default)]
pub(crate) struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Guard that raises the flag when dropped
    pub(crate) fn cancel_on_drop(&self) -> CancelOnDrop {
        CancelOnDrop(self.clone())
    }
}

pub(crate) struct CancelOnDrop(Cancellation);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        (self.0).0.store(true, Ordering::Release);
    }
}

/// Score one chunk, or nothing if the request was cancelled
pub(crate) fn score_chunk(
    profile: &WatchedProfile,
    chunk: &[Movie],
    cancellation: &Cancellation,
) -> Vec<Ranking> {
    if cancellation.is_cancelled() {
        trace!("Request cancelled, skipping chunk of {} movies", chunk.len());
        return Vec::new();
    }
    let rankings = profile.score_all(chunk);
    trace!("Scored chunk of {} movies", chunk.len());
    rankings
}
