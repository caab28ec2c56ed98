//! Core domain types for the movie catalog.
//!
//! A [`Movie`] is a title plus the feature vector the recommenders compare.
//! Its identity is the title, compared without regard to case, so
//! `"Inception"` and `"INCEPTION"` are the same movie no matter what their
//! vectors hold.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// The title of a movie doubles as its identifier
pub type Title = String;

/// Movie title and vector as stored in and returned from the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// The movie name
    pub id: Title,
    /// The encoding of the movie properties
    pub vector: Vec<f64>,
}

impl Movie {
    pub fn new(id: impl Into<Title>, vector: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            vector,
        }
    }

    /// The title of the movie (same as `id`)
    pub fn title(&self) -> &str {
        &self.id
    }

    /// Lower-cased title, used as the lookup key everywhere
    pub fn key(&self) -> String {
        title_key(&self.id)
    }

    /// Case-insensitive comparison of two titles.
    pub fn compare_titles(a: &str, b: &str) -> Ordering {
        a.chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase))
    }
}

/// Normalize a title into its case-insensitive lookup key
pub fn title_key(title: &str) -> String {
    title.chars().flat_map(char::to_lowercase).collect()
}

impl From<(Title, Vec<f64>)> for Movie {
    fn from((id, vector): (Title, Vec<f64>)) -> Self {
        Self { id, vector }
    }
}

// Equality, hashing and ordering all look at the title only, ignoring case.
// They must agree with each other, so all three go through lower-cased chars.

impl PartialEq for Movie {
    fn eq(&self, other: &Self) -> bool {
        Movie::compare_titles(&self.id, &other.id) == Ordering::Equal
    }
}

impl Eq for Movie {}

impl Hash for Movie {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.id.chars().flat_map(char::to_lowercase) {
            c.hash(state);
        }
    }
}

impl PartialOrd for Movie {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Movie {
    fn cmp(&self, other: &Self) -> Ordering {
        Movie::compare_titles(&self.id, &other.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_ignores_case_and_vector() {
        let a = Movie::new("Inception", vec![1.0, 0.0]);
        let b = Movie::new("INCEPTION", vec![0.0, 1.0]);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b), "same title in another case is a duplicate");
    }

    #[test]
    fn test_ordering_is_case_insensitive() {
        let mut movies = vec![
            Movie::new("interstellar", vec![]),
            Movie::new("Inception", vec![]),
            Movie::new("INSOMNIA", vec![]),
        ];
        movies.sort();

        let titles: Vec<&str> = movies.iter().map(Movie::title).collect();
        assert_eq!(titles, vec!["Inception", "INSOMNIA", "interstellar"]);
    }

    #[test]
    fn test_from_map_entry() {
        let movie = Movie::from(("Heat".to_string(), vec![0.5, 0.25]));
        assert_eq!(movie.title(), "Heat");
        assert_eq!(movie.vector, vec![0.5, 0.25]);
        assert_eq!(movie.key(), "heat");
    }
}
