//! Parallel stream: let Rayon split the catalog across its thread pool.

use super::{Cancellation, DEFAULT_CHUNK_SIZE, ScoringStrategy, score_chunk};
use crate::error::Result;
use crate::ranker::WatchedProfile;
use crate::types::{Ranking, Strategy};
use async_trait::async_trait;
use database::Catalog;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Scores the catalog with `par_chunks`.
///
/// The Rayon work runs inside `spawn_blocking` so it never stalls the async
/// runtime's worker threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelStream;

impl ParallelStream {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScoringStrategy for ParallelStream {
    fn strategy(&self) -> Strategy {
        Strategy::ParallelStream
    }

    async fn score(
        &self,
        catalog: Arc<Catalog>,
        profile: Arc<WatchedProfile>,
    ) -> Result<Vec<Ranking>> {
        let cancellation = Cancellation::default();
        let _guard = cancellation.cancel_on_drop();

        let rankings = tokio::task::spawn_blocking(move || {
            debug!(
                "Scoring {} movies on {} rayon threads",
                catalog.len(),
                rayon::current_num_threads()
            );
            catalog
                .movies()
                .par_chunks(DEFAULT_CHUNK_SIZE)
                .flat_map_iter(|chunk| score_chunk(&profile, chunk, &cancellation))
                .collect::<Vec<Ranking>>()
        })
        .await?;
        Ok(rankings)
    }
}
