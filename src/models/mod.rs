use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod movie;
pub mod watch_entry;

pub use movie::Movie;
pub use watch_entry::{validate_rows, RawWatchRow, WatchEntry};

pub type UserId = i64;
pub type MovieId = i64;

/// Which stage of the pipeline produced a recommendation list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    /// No watch history exists at all; popularity was used
    NoHistory,
    /// Target user has no watch history; popularity was used
    UnknownUser,
    /// Movies watched by similar users
    NeighborSuccess,
    /// Movies sharing the user's most watched genre
    GenreFallback,
    /// Highest rated, most recent movies
    PopularityFallback,
}

impl Display for RecommendationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RecommendationSource::NoHistory => "no_history",
            RecommendationSource::UnknownUser => "unknown_user",
            RecommendationSource::NeighborSuccess => "neighbor_success",
            RecommendationSource::GenreFallback => "genre_fallback",
            RecommendationSource::PopularityFallback => "popularity_fallback",
        };
        write!(f, "{}", name)
    }
}

/// Ordered, deduplicated candidates for one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub movie_ids: Vec<MovieId>,
    pub source: RecommendationSource,
}

/// Response body of the recommendation endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub recommended_movie_ids: Vec<MovieId>,
    pub source: RecommendationSource,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(recommendation: Recommendation) -> Self {
        Self {
            recommended_movie_ids: recommendation.movie_ids,
            source: recommendation.source,
        }
    }
}
