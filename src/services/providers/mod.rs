//! Watch history and catalog data sources
//!
//! The recommendation engine only ever reads through these traits, so the
//! backing store (PostgreSQL in production, an in-memory fixture in tests)
//! is pluggable. Implementations own their connections; the engine owns
//! nothing beyond a single request.

use crate::{
    error::AppResult,
    models::{MovieId, WatchEntry},
};

#[cfg(test)]
use mockall::automock;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Source of every recorded watch relation
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait HistoryReader: Send + Sync {
    /// Returns every (user, movie, genre) watch entry currently known
    ///
    /// May be empty. Rows missing a user or movie id are dropped before
    /// they are returned.
    async fn all_watch_entries(&self) -> AppResult<Vec<WatchEntry>>;
}

/// Source of movie metadata
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CatalogReader: Send + Sync {
    /// Up to `limit` movie ids ordered by rating desc, release year desc, id asc
    async fn top_rated_recent(&self, limit: usize) -> AppResult<Vec<MovieId>>;

    /// Ids of movies whose genre field contains `token` as a substring
    async fn movies_by_genre_substring(&self, token: &str) -> AppResult<Vec<MovieId>>;
}
