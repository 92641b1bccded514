use std::collections::HashSet;
use std::sync::Arc;

use tracing::instrument;

use crate::{
    error::AppResult,
    models::{MovieId, Recommendation, RecommendationSource, UserId, WatchEntry},
    services::providers::{CatalogReader, HistoryReader},
};

pub mod fallback;
pub mod matrix;
pub mod similarity;
pub mod workers;

pub use matrix::InteractionMatrix;
pub use similarity::SimilarityScore;
pub use workers::{NeighborPool, NeighborTask};

/// Tunables of the recommendation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Nearest neighbors consulted per request
    pub neighbor_count: usize,
    /// Neighbor tasks computed concurrently
    pub worker_pool_size: usize,
    /// Length of the genre and popularity fallback lists
    pub candidate_limit: usize,
}

/// Upper bound on neighbors consulted per request
pub const MAX_NEIGHBORS: usize = 5;

impl EngineSettings {
    /// Brings every knob into its valid range
    ///
    /// Neighbors stay within `1..=MAX_NEIGHBORS`; pool size and candidate
    /// limit are at least 1, so a non-empty catalog always yields candidates.
    pub fn clamped(self) -> Self {
        Self {
            neighbor_count: self.neighbor_count.clamp(1, MAX_NEIGHBORS),
            worker_pool_size: self.worker_pool_size.max(1),
            candidate_limit: self.candidate_limit.max(1),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            neighbor_count: 5,
            worker_pool_size: 4,
            candidate_limit: 5,
        }
    }
}

/// Generates movie recommendations for a single user
///
/// Every call recomputes from a fresh history snapshot:
/// 1. Build the user x movie interaction matrix
/// 2. Rank the other users by cosine similarity and keep the nearest ones
/// 3. Collect what those neighbors watched that the user has not (in parallel)
/// 4. Otherwise fall back to the user's favourite genre, then to the
///    catalog's top rated recent movies
///
/// Nothing computed here outlives the call.
#[derive(Clone)]
pub struct Recommender {
    history: Arc<dyn HistoryReader>,
    catalog: Arc<dyn CatalogReader>,
    pool: NeighborPool,
    settings: EngineSettings,
}

impl Recommender {
    pub fn new(
        history: Arc<dyn HistoryReader>,
        catalog: Arc<dyn CatalogReader>,
        requested: EngineSettings,
    ) -> Self {
        let settings = requested.clamped();
        if settings != requested {
            tracing::warn!(?requested, ?settings, "Engine settings out of range, clamped");
        }
        Self {
            history,
            catalog,
            pool: NeighborPool::new(settings.worker_pool_size),
            settings,
        }
    }

    /// Recommends movies for `user_id`
    ///
    /// Only a failing reader makes this return an error; every other
    /// condition degrades through the fallback chain. The list is empty only
    /// when the catalog is.
    #[instrument(skip(self))]
    pub async fn recommend(&self, user_id: UserId) -> AppResult<Recommendation> {
        let entries = self.history.all_watch_entries().await?;

        let matrix = match InteractionMatrix::build(&entries) {
            Ok(matrix) => matrix,
            Err(e) => {
                tracing::info!(error = %e, "No watch history, using popularity");
                return self.popular(RecommendationSource::NoHistory).await;
            }
        };

        let neighbors = match similarity::neighbors(&matrix, user_id, self.settings.neighbor_count)
        {
            Ok(neighbors) => neighbors,
            Err(e) => {
                tracing::info!(error = %e, "Target not in history, using popularity");
                return self.popular(RecommendationSource::UnknownUser).await;
            }
        };

        tracing::debug!(
            neighbors = ?neighbors.iter().map(|n| n.user_id).collect::<Vec<_>>(),
            "Nearest neighbors selected"
        );

        let candidates = self.neighbor_candidates(&matrix, user_id, &neighbors).await?;
        if !candidates.is_empty() {
            return Ok(self.finish(candidates, RecommendationSource::NeighborSuccess));
        }

        let own_entries: Vec<WatchEntry> = entries
            .into_iter()
            .filter(|entry| entry.user_id == user_id)
            .collect();
        let genre_candidates = fallback::genre_affinity(
            self.catalog.as_ref(),
            &own_entries,
            self.settings.candidate_limit,
        )
        .await?;
        if !genre_candidates.is_empty() {
            return Ok(self.finish(genre_candidates, RecommendationSource::GenreFallback));
        }

        self.popular(RecommendationSource::PopularityFallback).await
    }

    /// Fans the neighbors out to the worker pool and merges their output
    async fn neighbor_candidates(
        &self,
        matrix: &InteractionMatrix,
        user_id: UserId,
        neighbors: &[SimilarityScore],
    ) -> AppResult<Vec<MovieId>> {
        if neighbors.is_empty() {
            return Ok(Vec::new());
        }

        let target_items: Arc<HashSet<MovieId>> = Arc::new(matrix.watched_set(user_id));
        let tasks: Vec<NeighborTask> = neighbors
            .iter()
            .map(|neighbor| NeighborTask {
                neighbor: neighbor.user_id,
                neighbor_items: matrix.watched_items(neighbor.user_id),
                target_items: Arc::clone(&target_items),
            })
            .collect();

        let results = self.pool.run(tasks).await?;
        Ok(fallback::merge_candidates(results))
    }

    async fn popular(&self, source: RecommendationSource) -> AppResult<Recommendation> {
        let movie_ids =
            fallback::popularity(self.catalog.as_ref(), self.settings.candidate_limit).await?;
        Ok(self.finish(movie_ids, source))
    }

    fn finish(&self, movie_ids: Vec<MovieId>, source: RecommendationSource) -> Recommendation {
        tracing::info!(source = %source, candidates = movie_ids.len(), "Recommendation ready");
        Recommendation { movie_ids, source }
    }
}
