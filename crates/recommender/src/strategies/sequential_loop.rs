//! Sequential loop: score one movie after another on a single thread.

use super::{Cancellation, DEFAULT_CHUNK_SIZE, ScoringStrategy, score_chunk};
use crate::error::Result;
use crate::ranker::WatchedProfile;
use crate::types::{Ranking, Strategy};
use async_trait::async_trait;
use database::Catalog;
use std::sync::Arc;

/// Scores the catalog with a plain `for` loop on a blocking thread.
///
/// The loop walks the catalog in chunks so a cancelled request stops at
/// the next chunk boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialLoop;

impl SequentialLoop {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScoringStrategy for SequentialLoop {
    fn strategy(&self) -> Strategy {
        Strategy::SequentialLoop
    }

    async fn score(
        &self,
        catalog: Arc<Catalog>,
        profile: Arc<WatchedProfile>,
    ) -> Result<Vec<Ranking>> {
        let cancellation = Cancellation::default();
        let _guard = cancellation.cancel_on_drop();

        let rankings = tokio::task::spawn_blocking(move || {
            let mut rankings = Vec::with_capacity(catalog.len());
            for chunk in catalog.movies().chunks(DEFAULT_CHUNK_SIZE) {
                rankings.extend(score_chunk(&profile, chunk, &cancellation));
            }
            rankings
        })
        .await?;
        Ok(rankings)
    }
}
