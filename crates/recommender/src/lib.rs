//! # Recommender Crate
//!
//! Recommendation backends, one per concurrency strategy, all answering
//! the same three questions over a shared [`MovieStore`](database::MovieStore):
//! list every movie, search titles, and recommend movies similar to what a
//! user watched.
//!
//! ## Strategies
//!
//! - **ParallelFlux**: chunk workers publish into a channel, merged as they finish
//! - **ParallelStream**: Rayon `par_iter` over the catalog
//! - **StructuredConcurrency**: a tokio `JoinSet` that succeeds or fails as a group
//! - **SequentialLoop**: a plain loop, the baseline
//!
//! Whatever the strategy, recommendations are ranked the same way (see
//! [`ranker`]), so all four return identical results.
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommender::{BackendHandle, BackendSettings, RecommenderApi, Strategy, Timer};
//! use tokio_stream::StreamExt;
//!
//! let backend = BackendHandle::new(
//!     Strategy::ParallelStream,
//!     store.clone(),
//!     Arc::new(Timer::new()),
//!     BackendSettings::default(),
//! );
//!
//! let mut stream = backend.recommendations(&["Inception".to_string()], 5);
//! while let Some(ranking) = stream.next().await {
//!     let ranking = ranking?;
//!     println!("{} {:.3}", ranking.title, ranking.score);
//! }
//! ```
//!
//! ## Streams
//!
//! Every backend call returns a [`RankingStream`] immediately. Results are
//! produced on a spawned task, so calls must be made inside a tokio runtime.
//! The stream is backed by a bounded channel: a slow reader slows the
//! producer down, and dropping the stream cancels the request.

pub mod error;
pub mod types;
pub mod similarity;
pub mod ranker;
pub mod strategies;
pub mod timer;
pub mod api;
pub mod service;
pub mod handle;

// Re-export commonly used types
pub use error::{RecommenderError, Result};
pub use types::{Ranking, RankingStream, Strategy, UnknownStrategy};
pub use api::RecommenderApi;
pub use service::Recommender;
pub use handle::{BackendHandle, BackendSettings};
pub use strategies::{ParallelFlux, ParallelStream, ScoringStrategy, SequentialLoop, StructuredConcurrency};
pub use timer::{Operation, Timer, TimingSummary};
