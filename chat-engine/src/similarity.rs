//! Cosine similarity and threshold matching over embedding vectors.

use crate::errors::SimilarityError;

/// Canonical FAQ match threshold; overridable with `FAQ_SIMILARITY_THRESHOLD`.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.65;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimilarityMatch {
    /// Position of the candidate in the input slice.
    pub index: usize,
    pub similarity: f32,
}

/// Cosine similarity of `a` and `b`.
///
/// Returns `0.0` when either vector has zero magnitude.
///
/// # Errors
/// [`SimilarityError::DimensionMismatch`] when the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }

    if na == 0.0 || nb == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (na.sqrt() * nb.sqrt()))
}

/// Scores every candidate against `query` and keeps those at or above
/// `threshold`, best first. Ties keep input order.
///
/// # Errors
/// Fails on the first candidate whose length differs from `query`.
pub fn find_similar<C>(
    query: &[f32],
    candidates: &[C],
    threshold: f32,
) -> Result<Vec<SimilarityMatch>, SimilarityError>
where
    C: AsRef<[f32]>,
{
    let mut out = Vec::new();
    for (index, c) in candidates.iter().enumerate() {
        let similarity = cosine_similarity(query, c.as_ref())?;
        if similarity >= threshold {
            out.push(SimilarityMatch { index, similarity });
        }
    }
    // stable: equal scores keep candidate order
    out.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    Ok(out)
}
