//! Structured concurrency: a scoped group of chunk tasks.
//!
//! All chunks are spawned into one `JoinSet`. The group finishes only when
//! every chunk has; if one fails the error is returned and dropping the set
//! aborts whatever hasn't started yet. Chunks that were already queued when
//! the request went away skip their scoring.

use super::{Cancellation, DEFAULT_CHUNK_SIZE, ScoringStrategy, chunk_ranges, score_chunk};
use crate::error::Result;
use crate::ranker::WatchedProfile;
use crate::types::{Ranking, Strategy};
use async_trait::async_trait;
use database::Catalog;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct StructuredConcurrency {
    chunk_size: usize,
}

impl StructuredConcurrency {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Configure how many movies each task scores (default: 256)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

impl Default for StructuredConcurrency {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScoringStrategy for StructuredConcurrency {
    fn strategy(&self) -> Strategy {
        Strategy::StructuredConcurrency
    }

    async fn score(
        &self,
        catalog: Arc<Catalog>,
        profile: Arc<WatchedProfile>,
    ) -> Result<Vec<Ranking>> {
        let ranges = chunk_ranges(catalog.len(), self.chunk_size);
        debug!("Spawning {} scoring tasks", ranges.len());

        let cancellation = Cancellation::default();
        let _guard = cancellation.cancel_on_drop();

        let mut tasks = JoinSet::new();
        for range in ranges {
            let catalog = Arc::clone(&catalog);
            let profile = Arc::clone(&profile);
            let cancellation = cancellation.clone();
            tasks.spawn_blocking(move || {
                score_chunk(&profile, &catalog.movies()[range], &cancellation)
            });
        }

        let mut rankings = Vec::with_capacity(catalog.len());
        while let Some(joined) = tasks.join_next().await {
            rankings.extend(joined?);
        }
        Ok(rankings)
    }
}
