//! Parallel flux: chunk workers publish partial results into a channel.
//!
//! Batches are merged in completion order, not catalog order. The channel
//! has room for every batch so no worker ever waits on the collector.
//!
//! Workers live in a `JoinSet` owned by the scoring future. Dropping the
//! future aborts workers that haven't started and tells queued ones to skip
//! their chunk.

use super::{Cancellation, DEFAULT_CHUNK_SIZE, ScoringStrategy, chunk_ranges, score_chunk};
use crate::error::Result;
use crate::ranker::WatchedProfile;
use crate::types::{Ranking, Strategy};
use async_trait::async_trait;
use database::Catalog;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct ParallelFlux {
    chunk_size: usize,
}

impl ParallelFlux {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Configure how many movies each worker scores (default: 256)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

impl Default for ParallelFlux {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScoringStrategy for ParallelFlux {
    fn strategy(&self) -> Strategy {
        Strategy::ParallelFlux
    }

    async fn score(
        &self,
        catalog: Arc<Catalog>,
        profile: Arc<WatchedProfile>,
    ) -> Result<Vec<Ranking>> {
        let ranges = chunk_ranges(catalog.len(), self.chunk_size);
        let expected = ranges.len();
        let (tx, mut rx) = mpsc::channel::<Vec<Ranking>>(expected.max(1));

        let cancellation = Cancellation::default();
        let _guard = cancellation.cancel_on_drop();

        let mut workers = JoinSet::new();
        for range in ranges {
            let tx = tx.clone();
            let catalog = Arc::clone(&catalog);
            let profile = Arc::clone(&profile);
            let cancellation = cancellation.clone();
            workers.spawn_blocking(move || {
                let batch = score_chunk(&profile, &catalog.movies()[range], &cancellation);
                // The collector is gone if the request was cancelled
                let _ = tx.blocking_send(batch);
            });
        }
        drop(tx);

        let mut rankings = Vec::with_capacity(catalog.len());
        let mut received = 0usize;
        while let Some(batch) = rx.recv().await {
            received += 1;
            rankings.extend(batch);
        }
        debug!("Merged {} of {} batches", received, expected);

        // A worker that panicked dropped its sender without publishing
        while let Some(joined) = workers.join_next().await {
            joined?;
        }
        Ok(rankings)
    }
}
