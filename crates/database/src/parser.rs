//! Parser for movie dataset files.
//!
//! Format: one movie per line, `title::v1,v2,...,vn`
//!
//! - Blank lines and lines starting with `#` are skipped
//! - Every vector in a file must have the same dimension
//! - Titles are kept verbatim; trailing whitespace is trimmed

use crate::error::{DatabaseError, Result};
use crate::types::Movie;
use std::fs;
use std::path::Path;

/// Read a dataset file and parse every movie in it.
///
/// The file is decoded lossily so a stray non-UTF-8 byte in a title
/// doesn't sink the whole load.
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DatabaseError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DatabaseError::IoError(e),
    })?;
    let content = String::from_utf8_lossy(&bytes);

    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    parse_movies_str(&content, &file)
}

/// Parse dataset content that is already in memory.
///
/// `file` is only used to label errors.
pub fn parse_movies_str(content: &str, file: &str) -> Result<Vec<Movie>> {
    let mut movies = Vec::new();
    let mut dimension: Option<usize> = None;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() || line_trimmed.starts_with('#') {
            continue;
        }

        // Split on the last "::" so titles may contain "::" themselves
        let (title, vector_str) = line_trimmed.rsplit_once("::").ok_or_else(|| {
            DatabaseError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: "Missing '::' between title and vector".to_string(),
            }
        })?;

        let title = title.trim();
        if title.is_empty() {
            return Err(DatabaseError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: "Missing title".to_string(),
            });
        }

        let vector = parse_vector(vector_str).map_err(|reason| DatabaseError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason,
        })?;

        match dimension {
            None => dimension = Some(vector.len()),
            Some(expected) if expected != vector.len() => {
                return Err(DatabaseError::ValidationError(format!(
                    "{file} line {line_no}: expected vector of dimension {expected}, found {}",
                    vector.len()
                )));
            }
            Some(_) => {}
        }

        movies.push(Movie::new(title, vector));
    }

    Ok(movies)
}

/// Parse comma-separated floats
///
/// Example: "0.1, 0.2,0.3" -> vec![0.1, 0.2, 0.3]
fn parse_vector(s: &str) -> std::result::Result<Vec<f64>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Missing vector".to_string());
    }

    let mut vector = Vec::new();
    for component in s.split(',') {
        let component = component.trim();
        let value: f64 = component
            .parse()
            .map_err(|e| format!("Invalid vector component '{component}': {e}"))?;
        if !value.is_finite() {
            return Err(format!("Vector component '{component}' is not finite"));
        }
        vector.push(value);
    }
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vector() {
        assert_eq!(parse_vector("0.5, 1,-2.25").unwrap(), vec![0.5, 1.0, -2.25]);
        assert!(parse_vector("").is_err());
        assert!(parse_vector("1.0,abc").is_err());
        assert!(parse_vector("NaN").is_err());
    }

    #[test]
    fn test_parse_movies_str() {
        let content = "\
# title::vector
Inception::0.9,0.1,0.0

Interstellar::0.8,0.2,0.1
Star Wars: Episode IV::0.1,0.9,0.3
";
        let movies = parse_movies_str(content, "movies.txt").unwrap();
        assert_eq!(movies.len(), 3);
        assert_eq!(movies[0].title(), "Inception");
        assert_eq!(movies[2].title(), "Star Wars: Episode IV");
        assert_eq!(movies[2].vector, vec![0.1, 0.9, 0.3]);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let content = "Inception::0.9,0.1\nBroken line without vector\n";
        let err = parse_movies_str(content, "movies.txt").unwrap_err();
        match err {
            DatabaseError::ParseError { file, line, .. } => {
                assert_eq!(file, "movies.txt");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_mixed_dimensions_rejected() {
        let content = "A::1.0,2.0\nB::1.0\n";
        let err = parse_movies_str(content, "movies.txt").unwrap_err();
        assert!(matches!(err, DatabaseError::ValidationError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_movies(Path::new("definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, DatabaseError::FileNotFound { .. }));
    }
}
