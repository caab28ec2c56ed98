//! Multi-query title search.
//!
//! A search is a list of tokens. A movie matches when its lower-cased title
//! contains *every* token; an empty list matches everything. Results are
//! deduplicated by title and sorted ascending, ignoring case.
//!
//! ## Algorithm
//! 1. Lower-case each token and fold them into one conjunctive [`TitlePredicate`]
//! 2. Filter the catalog snapshot in parallel with Rayon
//! 3. Sort and deduplicate, since parallel filtering gives no ordering guarantee

use crate::error::{DatabaseError, Result};
use crate::store::MovieStore;
use crate::types::{Movie, title_key};
use rayon::prelude::*;
use tracing::{debug, instrument};

/// A conjunction of "title contains token" tests.
///
/// Built once per query so every catalog row doesn't re-lower-case the tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitlePredicate {
    tokens: Vec<String>,
}

impl TitlePredicate {
    /// The empty conjunction: true for every title
    pub fn conjunction() -> Self {
        Self::default()
    }

    /// "And" one more token onto the predicate
    pub fn and_contains(mut self, token: &str) -> Self {
        self.tokens.push(title_key(token));
        self
    }

    /// Build a predicate from raw query tokens.
    ///
    /// Fails with `InvalidQuery` if any token is empty or whitespace-only.
    pub fn from_queries<S: AsRef<str>>(queries: &[S]) -> Result<Self> {
        queries
            .iter()
            .enumerate()
            .try_fold(Self::conjunction(), |predicate, (idx, query)| {
                let query = query.as_ref();
                if query.trim().is_empty() {
                    return Err(DatabaseError::InvalidQuery(format!(
                        "query token {idx} is empty"
                    )));
                }
                Ok(predicate.and_contains(query))
            })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn matches(&self, title: &str) -> bool {
        let title = title_key(title);
        self.tokens.iter().all(|token| title.contains(token.as_str()))
    }
}

/// Split free text into search tokens on whitespace.
///
/// `"star   WARS"` -> `["star", "WARS"]`. Each word becomes its own
/// conjunctive term.
pub fn split_query(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

impl MovieStore {
    /// Find movies whose titles contain all of `queries` (ignoring case),
    /// sorted ascending by title with no duplicates.
    #[instrument(skip(self, queries), fields(tokens = queries.len()))]
    pub fn find_all_by_id_containing_in_order_by_asc<S: AsRef<str>>(
        &self,
        queries: &[S],
    ) -> Result<Vec<Movie>> {
        let predicate = TitlePredicate::from_queries(queries)?;
        let catalog = self.available_snapshot()?;

        let mut matches: Vec<Movie> = catalog
            .movies()
            .par_iter()
            .filter(|movie| predicate.matches(&movie.id))
            .cloned()
            .collect();

        // Group by title, then order ascending
        matches.par_sort();
        matches.dedup();

        debug!(
            "Matched {} of {} movies for {:?}",
            matches.len(),
            catalog.len(),
            predicate.tokens()
        );
        Ok(matches)
    }

    /// Search with a free-text string; every whitespace-separated word must
    /// appear in the title.
    pub fn search_text(&self, text: &str) -> Result<Vec<Movie>> {
        let tokens = split_query(text);
        self.find_all_by_id_containing_in_order_by_asc(tokens.as_slice())
    }
}
