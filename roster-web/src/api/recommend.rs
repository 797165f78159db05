//! Recommendation endpoint

use axum::{extract::State, Json};
use serde::Deserialize;

use roster_common::recommend::{RecommendationInput, Recommendations};
use roster_common::Error;

use crate::{ApiResult, AppState};

/// Favorites submitted by the dashboard
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default)]
    pub favorite_vehicle_ids: Vec<String>,
    #[serde(default)]
    pub favorite_assignment_ids: Vec<String>,
}

/// POST /api/recommendations
///
/// Candidate pools come from the current snapshot with favorites removed.
/// Recommended ids unknown to the snapshot are dropped from the response.
///
/// **Errors:**
/// - 404 Not Found: no snapshot yet
/// - 500: no recommendation backend configured
/// - 502: backend call failed
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> ApiResult<Json<Recommendations>> {
    let recommender = state.recommender.as_ref().ok_or_else(|| {
        Error::Config("Recommendation backend is not configured".to_string())
    })?;

    let fleet = state
        .store()
        .load_fleet()?
        .ok_or_else(|| Error::NotFound("No fleet snapshot; run a sync first".to_string()))?;

    let input = RecommendationInput::from_snapshot(
        &fleet,
        request.favorite_vehicle_ids,
        request.favorite_assignment_ids,
    );
    let output = recommender.recommend(&input).await?;

    Ok(Json(Recommendations::resolve(&fleet, output)))
}
