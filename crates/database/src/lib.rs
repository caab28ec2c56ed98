//! # Database Crate
//!
//! Holds the movie catalog (title -> feature vector) and answers title
//! searches against it.
//!
//! ## Main Components
//!
//! - **types**: The `Movie` entity, identified by its title ignoring case
//! - **parser**: Parse `title::v1,v2,...` dataset files
//! - **store**: `MovieStore`, a snapshot-consistent in-memory catalog
//! - **repository**: Multi-token, case-insensitive title search
//! - **error**: Error types for loading and querying
//!
//! ## Example Usage
//!
//! ```ignore
//! use database::MovieStore;
//! use std::path::Path;
//!
//! let store = MovieStore::load_from_file(Path::new("data/movies.txt"))?;
//!
//! // Every title containing both "star" and "wars", sorted ascending
//! let movies = store.find_all_by_id_containing_in_order_by_asc(&["star", "wars"])?;
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod store;
pub mod repository;

// Re-export commonly used types for convenience
pub use error::{DatabaseError, Result};
pub use types::{Movie, Title, title_key};
pub use store::{Catalog, MovieStore};
pub use repository::{TitlePredicate, split_query};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_creation() {
        let store = MovieStore::new();
        assert_eq!(store.count(), 0);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_load_then_search() {
        let movies = parser::parse_movies_str(
            "Inception::0.9,0.1\nInterstellar::0.8,0.2\nInsomnia::0.3,0.7\n",
            "movies.txt",
        )
        .unwrap();
        let store = MovieStore::from_movies(movies);

        let found = store
            .find_all_by_id_containing_in_order_by_asc(&["IN", "som"])
            .unwrap();
        assert_eq!(found, vec![Movie::new("insomnia", vec![])]);
    }

    #[test]
    fn test_load_sample_dataset() {
        // Only runs when the bundled sample dataset is present
        let path = std::path::Path::new("../../data/movies.txt");

        if path.exists() {
            let store = MovieStore::load_from_file(path).unwrap();
            assert!(store.count() > 0);
        }
    }
}
