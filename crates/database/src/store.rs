//! The in-memory movie store.
//!
//! [`Catalog`] is an immutable, sorted set of movies with a case-insensitive
//! title index. [`MovieStore`] hands out `Arc<Catalog>` snapshots and swaps
//! in a whole new catalog on `save_all`, so a reader never sees a
//! half-written catalog no matter how many recommenders share the store.

use crate::error::{DatabaseError, Result};
use crate::parser;
use crate::types::{Movie, title_key};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// An immutable snapshot of every movie in the store, sorted by title.
#[derive(Debug, Default)]
pub struct Catalog {
    movies: Vec<Movie>,
    /// Lower-cased title -> position in `movies`
    by_key: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, deduplicating titles without regard to case.
    ///
    /// When a title shows up twice the later movie replaces the earlier one.
    pub fn from_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        let mut unique: HashMap<String, Movie> = HashMap::new();
        for movie in movies {
            if let Some(previous) = unique.insert(movie.key(), movie) {
                warn!("Duplicate movie title '{}', keeping the later entry", previous.id);
            }
        }

        let mut movies: Vec<Movie> = unique.into_values().collect();
        movies.sort();

        let by_key = movies
            .iter()
            .enumerate()
            .map(|(idx, movie)| (movie.key(), idx))
            .collect();

        Self { movies, by_key }
    }

    /// All movies, sorted ascending by title (ignoring case)
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Look a movie up by title, ignoring case
    pub fn get(&self, title: &str) -> Option<&Movie> {
        self.by_key
            .get(&title_key(title))
            .map(|&idx| &self.movies[idx])
    }

    pub fn contains(&self, title: &str) -> bool {
        self.by_key.contains_key(&title_key(title))
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

/// Shared, snapshot-consistent movie store.
///
/// Wrap it in an `Arc` and hand clones to every backend.
#[derive(Debug, Default)]
pub struct MovieStore {
    current: RwLock<Arc<Catalog>>,
}

impl MovieStore {
    /// Creates an empty store. Queries fail with `DataUnavailable` until
    /// something is saved into it.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        Self {
            current: RwLock::new(Arc::new(Catalog::from_movies(movies))),
        }
    }

    /// Load a dataset file into a fresh store
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading movie dataset from {:?}", path);
        let movies = parser::parse_movies(path)?;
        let store = Self::from_movies(movies);
        info!("Loaded {} movies", store.count());
        Ok(store)
    }

    /// The current catalog. Holding on to it pins that version; later
    /// saves don't affect it.
    pub fn snapshot(&self) -> Arc<Catalog> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Like [`snapshot`](Self::snapshot) but fails when there is nothing to read.
    pub fn available_snapshot(&self) -> Result<Arc<Catalog>> {
        let catalog = self.snapshot();
        if catalog.is_empty() {
            return Err(DatabaseError::DataUnavailable(
                "movie store is empty".to_string(),
            ));
        }
        Ok(catalog)
    }

    /// Replace the whole catalog. Returns the number of movies stored.
    pub fn save_all(&self, movies: impl IntoIterator<Item = Movie>) -> usize {
        let catalog = Arc::new(Catalog::from_movies(movies));
        let count = catalog.len();
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = catalog;
        count
    }

    /// Every movie in the store, sorted ascending by title
    pub fn find_all(&self) -> Result<Vec<Movie>> {
        Ok(self.available_snapshot()?.movies().to_vec())
    }

    pub fn find_by_title(&self, title: &str) -> Option<Movie> {
        self.snapshot().get(title).cloned()
    }

    /// Movies matching any of `titles`, in the order given. Unknown titles
    /// are skipped.
    pub fn find_all_by_titles<S: AsRef<str>>(&self, titles: &[S]) -> Vec<Movie> {
        let catalog = self.snapshot();
        titles
            .iter()
            .filter_map(|title| catalog.get(title.as_ref()).cloned())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.snapshot().len()
    }
}
