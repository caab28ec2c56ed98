//! # Client Crate
//!
//! The caller-facing side of the recommender: a [`StrategyDispatcher`] per
//! backend that refuses requests meant for another strategy, a [`Gateway`]
//! that wires all four together, and [`ClientConfig`].

pub mod config;
pub mod dispatcher;
pub mod gateway;

pub use config::{ClientConfig, DEFAULT_MAX_COUNT};
pub use dispatcher::StrategyDispatcher;
pub use gateway::Gateway;

use recommender::{Ranking, RankingStream, Result};
use tokio_stream::StreamExt;

/// Drain a stream into a vector, stopping at the first error
pub async fn collect_rankings(mut stream: RankingStream) -> Result<Vec<Ranking>> {
    let mut rankings = Vec::new();
    while let Some(ranking) = stream.next().await {
        rankings.push(ranking?);
    }
    Ok(rankings)
}
