//! Vector similarity.
//!
//! Recommendations compare a user's watched profile against every movie
//! with cosine similarity:
//!
//! ```text
//! cosine(A, B) = (A · B) / (||A|| * ||B||)
//! ```
//!
//! The result lies in [-1, 1]. A zero-length or zero-norm vector has no
//! direction, so it scores 0.0 against everything.

/// Cosine similarity of two vectors.
///
/// Returns 0.0 if the dimensions differ or either vector has zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0, 0.0, 0.0), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Element-wise mean of `vectors`.
///
/// The first vector fixes the dimension; vectors of any other length are
/// skipped. Returns `None` when there is nothing to average.
pub fn mean_vector<'a>(vectors: impl IntoIterator<Item = &'a [f64]>) -> Option<Vec<f64>> {
    let mut sum: Option<Vec<f64>> = None;
    let mut count = 0usize;

    for vector in vectors {
        if let Some(acc) = sum.as_mut() {
            if acc.len() != vector.len() {
                continue;
            }
            acc.iter_mut().zip(vector).for_each(|(a, v)| *a += v);
        } else {
            sum = Some(vector.to_vec());
        }
        count += 1;
    }

    sum.map(|mut acc| {
        acc.iter_mut().for_each(|a| *a /= count as f64);
        acc
    })
}
