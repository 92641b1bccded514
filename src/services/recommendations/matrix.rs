use std::collections::{HashMap, HashSet};

use crate::{
    error::EngineError,
    models::{MovieId, UserId, WatchEntry},
};

/// Sparse user x movie watch counts
///
/// Rows are the distinct users in the order they first appear in the input,
/// columns the distinct movies in the same first-appearance order. Absent
/// cells are zero; every stored cell is at least 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionMatrix {
    rows: HashMap<UserId, HashMap<MovieId, u32>>,
    users: Vec<UserId>,
    movies: Vec<MovieId>,
}

impl InteractionMatrix {
    /// Counts watch entries per (user, movie) pair
    pub fn build(entries: &[WatchEntry]) -> Result<Self, EngineError> {
        if entries.is_empty() {
            return Err(EngineError::EmptyInput);
        }

        let mut rows: HashMap<UserId, HashMap<MovieId, u32>> = HashMap::new();
        let mut users = Vec::new();
        let mut movies = Vec::new();
        let mut seen_movies = HashSet::new();

        for entry in entries {
            let row = rows.entry(entry.user_id).or_insert_with(|| {
                users.push(entry.user_id);
                HashMap::new()
            });
            *row.entry(entry.movie_id).or_insert(0) += 1;

            if seen_movies.insert(entry.movie_id) {
                movies.push(entry.movie_id);
            }
        }

        let matrix = Self {
            rows,
            users,
            movies,
        };

        tracing::debug!(
            users = matrix.users.len(),
            movies = matrix.movies.len(),
            entries = entries.len(),
            "Interaction matrix built"
        );

        Ok(matrix)
    }

    /// Row order
    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    /// Column order
    pub fn movies(&self) -> &[MovieId] {
        &self.movies
    }

    pub fn row(&self, user_id: UserId) -> Option<&HashMap<MovieId, u32>> {
        self.rows.get(&user_id)
    }

    #[cfg(test)]
    fn count(&self, user_id: UserId, movie_id: MovieId) -> u32 {
        self.row(user_id)
            .and_then(|row| row.get(&movie_id))
            .copied()
            .unwrap_or(0)
    }

    /// Distinct movies watched by `user_id`, in column order
    pub fn watched_items(&self, user_id: UserId) -> Vec<MovieId> {
        match self.row(user_id) {
            Some(row) => self
                .movies
                .iter()
                .filter(|movie_id| row.contains_key(movie_id))
                .copied()
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn watched_set(&self, user_id: UserId) -> HashSet<MovieId> {
        self.row(user_id)
            .map(|row| row.keys().copied().collect())
            .unwrap_or_default()
    }
}
