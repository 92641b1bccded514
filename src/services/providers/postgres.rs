//! PostgreSQL-backed history and catalog reader
//!
//! Expects the `movies(id, title, genre, rating, release_year)` and
//! `watchlists(user_id, movie_id)` tables written by the catalog service.

use crate::{
    error::AppResult,
    models::{validate_rows, MovieId, RawWatchRow, WatchEntry},
    services::providers::{CatalogReader, HistoryReader},
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgStore {
    db_pool: PgPool,
}

impl PgStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait::async_trait]
impl HistoryReader for PgStore {
    async fn all_watch_entries(&self) -> AppResult<Vec<WatchEntry>> {
        let rows: Vec<RawWatchRow> = sqlx::query_as(
            r#"
            SELECT w.user_id::int8 AS user_id,
                   w.movie_id::int8 AS movie_id,
                   m.title,
                   m.genre
            FROM watchlists w
            JOIN movies m ON m.id = w.movie_id
            ORDER BY w.user_id, w.movie_id
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        tracing::debug!(rows = rows.len(), "Loaded watch entries");

        Ok(validate_rows(rows))
    }
}

#[async_trait::async_trait]
impl CatalogReader for PgStore {
    async fn top_rated_recent(&self, limit: usize) -> AppResult<Vec<MovieId>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT id::int8
            FROM movies
            ORDER BY rating DESC NULLS LAST, release_year DESC NULLS LAST, id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(ids)
    }

    async fn movies_by_genre_substring(&self, token: &str) -> AppResult<Vec<MovieId>> {
        // strpos keeps the match literal; LIKE would treat % and _ in the token as wildcards
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT id::int8
            FROM movies
            WHERE strpos(genre, $1) > 0
            ORDER BY id
            "#,
        )
        .bind(token)
        .fetch_all(&self.db_pool)
        .await?;

        tracing::debug!(genre = %token, matches = ids.len(), "Genre lookup");

        Ok(ids)
    }
}
