//! A recommender backend for one scoring strategy.
//!
//! ## Request lifecycle
//! 1. The API call spawns a producer task and returns the receiving end of
//!    a bounded channel as a stream
//! 2. The producer computes the full result (listing, search or ranking)
//! 3. Results are sent one at a time; a slow consumer blocks the producer
//! 4. If the consumer drops the stream, the producer stops at the next
//!    send, or straight away if it is still computing
//!
//! Faults are delivered as an `Err` item on the stream.

use crate::api::RecommenderApi;
use crate::error::{RecommenderError, Result};
use crate::ranker::{WatchedProfile, check_max_count, rank_top};
use crate::strategies::ScoringStrategy;
use crate::timer::{Operation, Timer};
use crate::types::{Ranking, RankingStream, Strategy};
use database::MovieStore;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{Instrument, debug, instrument, warn};

/// Default capacity of the channel between a producer and its consumer
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// Serves listing, search and recommendation requests over a shared store
/// using the scoring strategy `S`.
pub struct Recommender<S> {
    /// Shared reference to the movie store (read-only here)
    store: Arc<MovieStore>,
    scorer: Arc<S>,
    timer: Arc<Timer>,
    channel_capacity: usize,
}

// Manual impl: cloning shares everything, `S` itself needn't be Clone
impl<S> Clone for Recommender<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            scorer: Arc::clone(&self.scorer),
            timer: Arc::clone(&self.timer),
            channel_capacity: self.channel_capacity,
        }
    }
}

impl<S: ScoringStrategy> Recommender<S> {
    pub fn new(store: Arc<MovieStore>, scorer: S, timer: Arc<Timer>) -> Self {
        Self {
            store,
            scorer: Arc::new(scorer),
            timer,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Configure the result channel capacity (default: 32)
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub fn timer(&self) -> &Arc<Timer> {
        &self.timer
    }

    /// Spawn `work` and stream its output.
    ///
    /// When `timed` is set the elapsed time from spawn to last item sent is
    /// recorded. A request the consumer abandoned is not recorded. The
    /// producer runs inside the caller's current span.
    fn stream<F>(&self, operation: Operation, timed: bool, work: F) -> RankingStream
    where
        F: Future<Output = Result<Vec<Ranking>>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let strategy = self.scorer.strategy();
        let timer = timed.then(|| Arc::clone(&self.timer));

        tokio::spawn(async move {
            let start = Instant::now();

            let outcome = tokio::select! {
                _ = tx.closed() => {
                    debug!("{} {} cancelled before results were ready", strategy, operation);
                    return;
                }
                outcome = work => outcome,
            };

            match outcome {
                Ok(rankings) => {
                    let total = rankings.len();
                    for (sent, ranking) in rankings.into_iter().enumerate() {
                        if tx.send(Ok(ranking)).await.is_err() {
                            debug!(
                                "{} {} cancelled after {} of {} results",
                                strategy, operation, sent, total
                            );
                            return;
                        }
                    }
                }
                Err(e) => {
                    warn!("{} {} failed: {}", strategy, operation, e);
                    let _ = tx.send(Err(e)).await;
                }
            }

            if let Some(timer) = timer {
                timer.record(strategy, operation, start.elapsed());
            }
        }
        .in_current_span());

        Box::pin(ReceiverStream::new(rx))
    }

    fn movies_with(&self, timed: bool) -> RankingStream {
        let store = Arc::clone(&self.store);
        self.stream(Operation::Movies, timed, async move {
            let catalog = store.available_snapshot()?;
            let rankings: Vec<Ranking> = catalog.movies().iter().map(Ranking::unscored).collect();
            Ok::<_, RecommenderError>(rankings)
        })
    }

    fn search_with(&self, query: &str, timed: bool) -> RankingStream {
        let store = Arc::clone(&self.store);
        let query = query.to_string();
        self.stream(Operation::Search, timed, async move {
            // The matcher fans out on rayon; keep it off the async workers
            let movies = tokio::task::spawn_blocking(move || store.search_text(&query)).await??;
            let rankings: Vec<Ranking> = movies.iter().map(Ranking::unscored).collect();
            Ok::<_, RecommenderError>(rankings)
        })
    }

    #[instrument(skip(self, watched), fields(strategy = %self.scorer.strategy(), watched = watched.len()))]
    fn recommendations_with(&self, watched: &[String], max_count: usize, timed: bool) -> RankingStream {
        let store = Arc::clone(&self.store);
        let scorer = Arc::clone(&self.scorer);
        let watched = watched.to_vec();
        self.stream(Operation::Recommendations, timed, async move {
            check_max_count(max_count)?;
            let catalog = store.available_snapshot()?;

            let Some(profile) = WatchedProfile::resolve(&catalog, watched.as_slice()) else {
                debug!("None of the watched titles are known, nothing to recommend");
                return Ok(Vec::new());
            };

            let scored = scorer.score(catalog, Arc::new(profile)).await?;
            Ok::<_, RecommenderError>(rank_top(scored, max_count))
        })
    }
}

impl<S: ScoringStrategy> RecommenderApi for Recommender<S> {
    fn strategy(&self) -> Strategy {
        self.scorer.strategy()
    }

    fn movies(&self) -> RankingStream {
        self.movies_with(false)
    }

    fn movies_timed(&self) -> RankingStream {
        self.movies_with(true)
    }

    fn search(&self, query: &str) -> RankingStream {
        self.search_with(query, false)
    }

    fn search_timed(&self, query: &str) -> RankingStream {
        self.search_with(query, true)
    }

    fn recommendations(&self, watched: &[String], max_count: usize) -> RankingStream {
        self.recommendations_with(watched, max_count, false)
    }

    fn recommendations_timed(&self, watched: &[String], max_count: usize) -> RankingStream {
        self.recommendations_with(watched, max_count, true)
    }
}
