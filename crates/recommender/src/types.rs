//! Shared types: what a backend emits and which strategy emitted it.

use crate::error::RecommenderError;
use database::Movie;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::pin::Pin;
use std::str::FromStr;
use tokio_stream::Stream;

/// One entry of a result sequence: a movie title and its score.
///
/// Listing and search results carry a score of `0.0`; recommendations carry
/// the similarity to what the user watched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub title: String,
    pub score: f64,
}

impl Ranking {
    pub fn new(title: impl Into<String>, score: f64) -> Self {
        Self {
            title: title.into(),
            score,
        }
    }

    /// A ranking for a listing or search hit, where only the order matters
    pub fn unscored(movie: &Movie) -> Self {
        Self::new(movie.id.clone(), 0.0)
    }
}

/// Pull-based, cancellable sequence of rankings.
///
/// Dropping the stream tells the producing backend to stop.
pub type RankingStream = Pin<Box<dyn Stream<Item = Result<Ranking, RecommenderError>> + Send>>;

/// The concurrency strategy a backend uses to compute its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strategy {
    /// Chunk workers fan results into a channel, merged as they complete
    ParallelFlux,
    /// Rayon data parallelism
    ParallelStream,
    /// A tokio `JoinSet` that succeeds or fails as one unit
    StructuredConcurrency,
    /// A plain loop
    SequentialLoop,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::ParallelFlux,
        Strategy::ParallelStream,
        Strategy::StructuredConcurrency,
        Strategy::SequentialLoop,
    ];

    /// Canonical tag, as accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::ParallelFlux => "parallelflux",
            Strategy::ParallelStream => "parallelstream",
            Strategy::StructuredConcurrency => "structuredconcurrency",
            Strategy::SequentialLoop => "sequentialloop",
        }
    }
}

impl Strategy {
    /// Upper-case constant form of the tag, e.g. `PARALLEL_FLUX`
    pub fn constant_name(&self) -> &'static str {
        match self {
            Strategy::ParallelFlux => "PARALLEL_FLUX",
            Strategy::ParallelStream => "PARALLEL_STREAM",
            Strategy::StructuredConcurrency => "STRUCTURED_CONCURRENCY",
            Strategy::SequentialLoop => "SEQUENTIAL_LOOP",
        }
    }

    /// Whether `tag` is exactly one of this strategy's two spellings
    pub fn is_tag(&self, tag: &str) -> bool {
        tag == self.as_str() || tag == self.constant_name()
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown strategy '{}'", self.0)
    }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    /// Case-insensitive; `_` and `-` are ignored, so `PARALLEL_FLUX`,
    /// `parallel-flux` and `parallelflux` are all the same tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}
