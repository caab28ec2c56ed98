//! A closed set of backend handles, one variant per strategy.
//!
//! Lets callers pick a backend from a [`Strategy`] value at construction
//! time while still dispatching statically.

use crate::api::RecommenderApi;
use crate::service::{DEFAULT_CHANNEL_CAPACITY, Recommender};
use crate::strategies::{
    DEFAULT_CHUNK_SIZE, ParallelFlux, ParallelStream, SequentialLoop, StructuredConcurrency,
};
use crate::timer::Timer;
use crate::types::{RankingStream, Strategy};
use database::MovieStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Tuning knobs shared by every backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Movies scored per task by the chunked strategies
    pub chunk_size: usize,
    /// Capacity of the result channel handed to consumers
    pub channel_capacity: usize,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

#[derive(Clone)]
pub enum BackendHandle {
    ParallelFlux(Recommender<ParallelFlux>),
    ParallelStream(Recommender<ParallelStream>),
    StructuredConcurrency(Recommender<StructuredConcurrency>),
    SequentialLoop(Recommender<SequentialLoop>),
}

impl BackendHandle {
    /// Build the backend for `strategy` over a shared store and timer
    pub fn new(
        strategy: Strategy,
        store: Arc<MovieStore>,
        timer: Arc<Timer>,
        settings: BackendSettings,
    ) -> Self {
        let capacity = settings.channel_capacity;
        match strategy {
            Strategy::ParallelFlux => Self::ParallelFlux(
                Recommender::new(
                    store,
                    ParallelFlux::new().with_chunk_size(settings.chunk_size),
                    timer,
                )
                .with_channel_capacity(capacity),
            ),
            Strategy::ParallelStream => Self::ParallelStream(
                Recommender::new(store, ParallelStream::new(), timer)
                    .with_channel_capacity(capacity),
            ),
            Strategy::StructuredConcurrency => Self::StructuredConcurrency(
                Recommender::new(
                    store,
                    StructuredConcurrency::new().with_chunk_size(settings.chunk_size),
                    timer,
                )
                .with_channel_capacity(capacity),
            ),
            Strategy::SequentialLoop => Self::SequentialLoop(
                Recommender::new(store, SequentialLoop::new(), timer)
                    .with_channel_capacity(capacity),
            ),
        }
    }
}

/// Forward a call to whichever recommender the handle wraps
macro_rules! delegate {
    ($self:ident, $backend:ident => $call:expr) => {
        match $self {
            BackendHandle::ParallelFlux($backend) => $call,
            BackendHandle::ParallelStream($backend) => $call,
            BackendHandle::StructuredConcurrency($backend) => $call,
            BackendHandle::SequentialLoop($backend) => $call,
        }
    };
}

impl RecommenderApi for BackendHandle {
    fn strategy(&self) -> Strategy {
        delegate!(self, backend => backend.strategy())
    }

    fn movies(&self) -> RankingStream {
        delegate!(self, backend => backend.movies())
    }

    fn movies_timed(&self) -> RankingStream {
        delegate!(self, backend => backend.movies_timed())
    }

    fn search(&self, query: &str) -> RankingStream {
        delegate!(self, backend => backend.search(query))
    }

    fn search_timed(&self, query: &str) -> RankingStream {
        delegate!(self, backend => backend.search_timed(query))
    }

    fn recommendations(&self, watched: &[String], max_count: usize) -> RankingStream {
        delegate!(self, backend => backend.recommendations(watched, max_count))
    }

    fn recommendations_timed(&self, watched: &[String], max_count: usize) -> RankingStream {
        delegate!(self, backend => backend.recommendations_timed(watched, max_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_matches_requested_strategy() {
        let store = Arc::new(MovieStore::new());
        let timer = Arc::new(Timer::new());

        for strategy in Strategy::ALL {
            let handle = BackendHandle::new(
                strategy,
                Arc::clone(&store),
                Arc::clone(&timer),
                BackendSettings::default(),
            );
            assert_eq!(handle.strategy(), strategy);
        }
    }
}
