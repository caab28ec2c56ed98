//! The recommendation ranking contract.
//!
//! Every strategy must produce the same answer for the same input:
//!
//! 1. Resolve the watched titles against the catalog. Unknown titles are
//!    ignored; if none are known there is no signal and the result is empty.
//! 2. Average the watched vectors into one profile.
//! 3. Score every unwatched movie by cosine similarity to the profile.
//! 4. Sort by score (highest first), ties by title ascending, and keep
//!    `max_count`.
//!
//! Strategies differ only in how step 3 is spread across threads; steps 1,
//! 2 and 4 live here.

use crate::error::{RecommenderError, Result};
use crate::similarity::{cosine_similarity, mean_vector};
use crate::types::Ranking;
use database::{Catalog, Movie, title_key};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, warn};

/// What the user watched, boiled down to one vector plus the titles to skip.
#[derive(Debug, Clone)]
pub struct WatchedProfile {
    vector: Vec<f64>,
    /// Lower-cased titles of everything the user asked about
    watched: HashSet<String>,
}

impl WatchedProfile {
    /// Build a profile from watched titles.
    ///
    /// Returns `None` when no watched title is in the catalog.
    pub fn resolve<S: AsRef<str>>(catalog: &Catalog, watched: &[S]) -> Option<Self> {
        let mut known: Vec<&Movie> = Vec::with_capacity(watched.len());
        for title in watched {
            let title = title.as_ref();
            match catalog.get(title) {
                Some(movie) => known.push(movie),
                None => warn!("Watched title '{}' is not in the catalog, ignoring it", title),
            }
        }

        let vector = mean_vector(known.iter().map(|movie| movie.vector.as_slice()))?;
        let watched = watched.iter().map(|t| title_key(t.as_ref())).collect();

        debug!("Resolved profile from {} known watched titles", known.len());
        Some(Self { vector, watched })
    }

    pub fn vector(&self) -> &[f64] {
        &self.vector
    }

    pub fn is_watched(&self, title: &str) -> bool {
        self.watched.contains(&title_key(title))
    }

    /// Score one movie, or `None` if the user already watched it
    pub fn score(&self, movie: &Movie) -> Option<Ranking> {
        if self.is_watched(&movie.id) {
            return None;
        }
        Some(Ranking::new(
            movie.id.clone(),
            cosine_similarity(&self.vector, &movie.vector),
        ))
    }

    /// Score a slice of movies sequentially
    pub fn score_all(&self, movies: &[Movie]) -> Vec<Ranking> {
        movies.iter().filter_map(|movie| self.score(movie)).collect()
    }
}

/// Best match first; ties by title ignoring case, then by exact title so
/// the order is total.
pub fn compare_rankings(a: &Ranking, b: &Ranking) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| Movie::compare_titles(&a.title, &b.title))
        .then_with(|| a.title.cmp(&b.title))
}

/// Sort scored movies and keep the best `max_count`
pub fn rank_top(mut rankings: Vec<Ranking>, max_count: usize) -> Vec<Ranking> {
    rankings.sort_by(compare_rankings);
    rankings.truncate(max_count);
    rankings
}

/// Reject a zero `max_count` up front
pub fn check_max_count(max_count: usize) -> Result<()> {
    if max_count == 0 {
        return Err(RecommenderError::InvalidQuery(
            "max_count must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Reference single-threaded recommendation over a catalog snapshot.
pub fn recommend<S: AsRef<str>>(
    catalog: &Catalog,
    watched: &[S],
    max_count: usize,
) -> Result<Vec<Ranking>> {
    check_max_count(max_count)?;
    let Some(profile) = WatchedProfile::resolve(catalog, watched) else {
        return Ok(Vec::new());
    };
    Ok(rank_top(profile.score_all(catalog.movies()), max_count))
}
