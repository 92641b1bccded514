use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{RecommendationResponse, UserId},
    routes::AppState,
};

/// Handler for the recommendation endpoint
///
/// Blocks until the whole pipeline, including the neighbor fan-out, is done.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        user_id,
        "Processing recommendation request"
    );

    let recommendation = state.recommender.recommend(user_id).await?;

    tracing::info!(
        request_id = %request_id,
        source = %recommendation.source,
        count = recommendation.movie_ids.len(),
        "Recommendation completed"
    );

    Ok(Json(recommendation.into()))
}
