//! The backend proxy contract.
//!
//! One implementation per strategy. Every call returns immediately with a
//! [`RankingStream`]; the work happens on a spawned task and results arrive
//! as the caller polls. The `_timed` variants return the same data and also
//! report their latency to the backend's [`Timer`](crate::Timer).

use crate::types::{RankingStream, Strategy};

pub trait RecommenderApi: Send + Sync {
    /// The strategy this backend computes with
    fn strategy(&self) -> Strategy;

    /// Every movie title, ascending
    fn movies(&self) -> RankingStream;
    fn movies_timed(&self) -> RankingStream;

    /// Titles containing every word of `query` (ignoring case), ascending
    fn search(&self, query: &str) -> RankingStream;
    fn search_timed(&self, query: &str) -> RankingStream;

    /// Up to `max_count` titles most similar to `watched`, best first
    fn recommendations(&self, watched: &[String], max_count: usize) -> RankingStream;
    fn recommendations_timed(&self, watched: &[String], max_count: usize) -> RankingStream;
}
