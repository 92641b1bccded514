use std::collections::HashMap;

use super::matrix::InteractionMatrix;
use crate::{
    error::EngineError,
    models::{MovieId, UserId},
};

/// Similarity of one user to the request's target user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScore {
    pub user_id: UserId,
    pub score: f64,
}

/// Cosine similarity of two sparse count vectors
///
/// Missing entries count as zero. Returns 0.0 when either vector is all zero.
pub fn cosine(a: &HashMap<MovieId, u32>, b: &HashMap<MovieId, u32>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let dot: f64 = small
        .iter()
        .filter_map(|(movie_id, x)| large.get(movie_id).map(|y| f64::from(*x) * f64::from(*y)))
        .sum();

    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

fn norm(v: &HashMap<MovieId, u32>) -> f64 {
    v.values()
        .map(|x| f64::from(*x).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Scores every other user against `target`, in row order
pub fn score_all(
    matrix: &InteractionMatrix,
    target: UserId,
) -> Result<Vec<SimilarityScore>, EngineError> {
    let target_row = matrix.row(target).ok_or(EngineError::UnknownUser(target))?;

    Ok(matrix
        .users()
        .iter()
        .filter(|user_id| **user_id != target)
        .filter_map(|user_id| {
            matrix.row(*user_id).map(|row| SimilarityScore {
                user_id: *user_id,
                score: cosine(target_row, row),
            })
        })
        .collect())
}

/// The `k` users most similar to `target`, best first
///
/// Ties keep row order (the user seen first in the history wins), so the
/// selection is identical across runs over the same snapshot.
pub fn neighbors(
    matrix: &InteractionMatrix,
    target: UserId,
    k: usize,
) -> Result<Vec<SimilarityScore>, EngineError> {
    let mut scores = score_all(matrix, target)?;

    // stable sort: equal scores stay in row order
    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    scores.truncate(k);

    Ok(scores)
}
