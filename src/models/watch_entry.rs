use serde::{Deserialize, Serialize};

use super::{MovieId, UserId};
use crate::error::EngineError;

/// A single watchlist relation between a user and a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchEntry {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub title: String,
    /// Comma-separated genre tags, e.g. "Action, Drama"
    pub genre: Option<String>,
}

impl WatchEntry {
    pub fn new(user_id: UserId, movie_id: MovieId, title: &str, genre: Option<&str>) -> Self {
        Self {
            user_id,
            movie_id,
            title: title.to_string(),
            genre: genre.map(str::to_string),
        }
    }

    /// Genre tokens of this entry, trimmed, empty tokens dropped
    pub fn genre_tokens(&self) -> impl Iterator<Item = &str> {
        self.genre
            .as_deref()
            .into_iter()
            .flat_map(|genre| genre.split(','))
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

/// Watchlist row as it comes out of storage, before validation
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct RawWatchRow {
    pub user_id: Option<i64>,
    pub movie_id: Option<i64>,
    pub title: Option<String>,
    pub genre: Option<String>,
}

impl TryFrom<RawWatchRow> for WatchEntry {
    type Error = EngineError;

    fn try_from(row: RawWatchRow) -> Result<Self, Self::Error> {
        let user_id = row
            .user_id
            .ok_or_else(|| EngineError::MalformedEntry("missing user_id".to_string()))?;
        let movie_id = row.movie_id.ok_or_else(|| {
            EngineError::MalformedEntry(format!("missing movie_id for user {}", user_id))
        })?;

        Ok(WatchEntry {
            user_id,
            movie_id,
            title: row.title.unwrap_or_default(),
            genre: row.genre.filter(|g| !g.trim().is_empty()),
        })
    }
}

/// Converts raw rows into entries, dropping malformed ones
pub fn validate_rows(rows: Vec<RawWatchRow>) -> Vec<WatchEntry> {
    let total = rows.len();
    let entries: Vec<WatchEntry> = rows
        .into_iter()
        .filter_map(|row| match WatchEntry::try_from(row) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping watch entry");
                None
            }
        })
        .collect();

    if entries.len() < total {
        tracing::warn!(
            dropped = total - entries.len(),
            kept = entries.len(),
            "Malformed watch entries skipped"
        );
    }

    entries
}
