//! # Strategy Dispatcher
//!
//! Client-side front for one recommender backend. Each dispatcher is bound
//! to exactly one strategy, the one its backend computes with. Every call
//! names the strategy the caller expects, either as the lower-case tag
//! (`parallelflux`) or the constant form (`PARALLEL_FLUX`). Anything else,
//! including near misses, fails with `StrategyMismatch` and the backend is
//! never touched.
//!
//! Past that check the dispatcher is a pass-through: it picks the timed or
//! plain entry point and hands back the backend's stream untouched. No
//! retries, no timeouts, no reshaping of results.

use recommender::{RankingStream, RecommenderApi, RecommenderError, Result, Strategy};
use tracing::debug;

pub struct StrategyDispatcher<A> {
    strategy: Strategy,
    api: A,
}

impl<A: RecommenderApi> StrategyDispatcher<A> {
    /// Bind a dispatcher to `api` and the strategy it serves
    pub fn new(api: A) -> Self {
        Self {
            strategy: api.strategy(),
            api,
        }
    }

    /// The one strategy this dispatcher accepts
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fail fast unless `requested` is exactly one of the bound tags
    fn check_strategy(&self, requested: &str) -> Result<()> {
        if self.strategy.is_tag(requested) {
            return Ok(());
        }
        Err(RecommenderError::StrategyMismatch {
            expected: self.strategy,
            requested: requested.to_string(),
        })
    }

    /// Every movie title, ascending
    pub fn movies(&self, strategy: &str, timed: bool) -> Result<RankingStream> {
        self.check_strategy(strategy)?;
        debug!("Dispatching movies to {} (timed: {})", self.strategy, timed);

        Ok(if timed {
            self.api.movies_timed()
        } else {
            self.api.movies()
        })
    }

    /// Titles containing every word of `query`, ascending
    pub fn search(&self, strategy: &str, query: &str, timed: bool) -> Result<RankingStream> {
        self.check_strategy(strategy)?;
        debug!("Dispatching search '{}' to {} (timed: {})", query, self.strategy, timed);

        Ok(if timed {
            self.api.search_timed(query)
        } else {
            self.api.search(query)
        })
    }

    /// Up to `max_count` movies most similar to one watched movie
    pub fn recommendations(
        &self,
        strategy: &str,
        watched_movie: &str,
        max_count: usize,
        timed: bool,
    ) -> Result<RankingStream> {
        self.recommendations_many(strategy, &[watched_movie.to_string()], max_count, timed)
    }

    /// Up to `max_count` movies most similar to a list of watched movies
    pub fn recommendations_many(
        &self,
        strategy: &str,
        watched_movies: &[String],
        max_count: usize,
        timed: bool,
    ) -> Result<RankingStream> {
        self.check_strategy(strategy)?;
        debug!(
            "Dispatching recommendations for {} watched movie(s) to {} (max: {}, timed: {})",
            watched_movies.len(),
            self.strategy,
            max_count,
            timed
        );

        Ok(if timed {
            self.api.recommendations_timed(watched_movies, max_count)
        } else {
            self.api.recommendations(watched_movies, max_count)
        })
    }
}
