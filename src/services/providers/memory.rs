//! In-memory history and catalog reader
//!
//! Serves a fixed snapshot with the same orderings as the PostgreSQL store.
//! Backs the engine and HTTP test suites.

use crate::{
    error::AppResult,
    models::{Movie, MovieId, WatchEntry},
    services::providers::{CatalogReader, HistoryReader},
};
use std::cmp::Ordering;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    movies: Arc<Vec<Movie>>,
    entries: Arc<Vec<WatchEntry>>,
}

impl InMemoryStore {
    pub fn new(movies: Vec<Movie>, entries: Vec<WatchEntry>) -> Self {
        Self {
            movies: Arc::new(movies),
            entries: Arc::new(entries),
        }
    }
}

/// rating desc, release year desc, id asc; missing values sort last
fn popularity_order(a: &Movie, b: &Movie) -> Ordering {
    fn desc_nulls_last<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    desc_nulls_last(a.rating, b.rating)
        .then_with(|| desc_nulls_last(a.release_year, b.release_year))
        .then_with(|| a.id.cmp(&b.id))
}

#[async_trait::async_trait]
impl HistoryReader for InMemoryStore {
    async fn all_watch_entries(&self) -> AppResult<Vec<WatchEntry>> {
        Ok(self.entries.as_ref().clone())
    }
}

#[async_trait::async_trait]
impl CatalogReader for InMemoryStore {
    async fn top_rated_recent(&self, limit: usize) -> AppResult<Vec<MovieId>> {
        let mut ranked: Vec<&Movie> = self.movies.iter().collect();
        ranked.sort_by(|a, b| popularity_order(a, b));
        Ok(ranked.into_iter().take(limit).map(|m| m.id).collect())
    }

    async fn movies_by_genre_substring(&self, token: &str) -> AppResult<Vec<MovieId>> {
        let mut ids: Vec<MovieId> = self
            .movies
            .iter()
            .filter(|movie| movie.genre_contains(token))
            .map(|movie| movie.id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Movie> {
        vec![
            Movie::new(1, "Old Classic", Some("Drama")).with_rating(9.0, 1972),
            Movie::new(2, "New Classic", Some("Drama")).with_rating(9.0, 2008),
            Movie::new(3, "Tied A", Some("Action")).with_rating(8.0, 2010),
            Movie::new(4, "Tied B", Some("Action/Comedy")).with_rating(8.0, 2010),
            Movie::new(5, "Unrated", Some("Live-Action")),
            Movie::new(6, "Mid", None).with_rating(7.0, 2020),
        ]
    }

    #[tokio::test]
    async fn test_top_rated_recent_ordering() {
        let store = InMemoryStore::new(catalog(), vec![]);
        let ids = store.top_rated_recent(10).await.unwrap();
        assert_eq!(ids, vec![2, 1, 3, 4, 6, 5]);
    }

    #[tokio::test]
    async fn test_top_rated_recent_respects_limit() {
        let store = InMemoryStore::new(catalog(), vec![]);
        let ids = store.top_rated_recent(3).await.unwrap();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn test_genre_substring_over_matches() {
        let store = InMemoryStore::new(catalog(), vec![]);
        let ids = store.movies_by_genre_substring("Action").await.unwrap();
        assert_eq!(ids, vec![3, 4, 5]);
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let store = InMemoryStore::default();
        assert!(store.top_rated_recent(5).await.unwrap().is_empty());
        assert!(store.all_watch_entries().await.unwrap().is_empty());
    }
}
