use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};

use crate::error::AppResult;
use crate::middleware::RequestId;
use crate::models::{RecommendRequest, RecommendResponse};

use super::AppState;

/// Recommends unseen locations liked by the most similar user
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> AppResult<Json<RecommendResponse>> {
    let Json(request) = payload?;
    let top_n = request.top_n.unwrap_or(state.config.default_top_n);

    tracing::info!(
        request_id = %request_id,
        user_id = %request.user_id,
        users = request.user_location_matrix.len(),
        top_n,
        "Processing recommendation request"
    );

    let recommendations = state
        .recommender
        .recommend(&request.user_id, &request.user_location_matrix, top_n)?;

    tracing::info!(
        request_id = %request_id,
        count = recommendations.len(),
        "Recommendation completed"
    );

    Ok(Json(RecommendResponse {
        user_id: request.user_id,
        recommendations,
    }))
}
