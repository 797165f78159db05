//! Fleet snapshot and dashboard view endpoints

use axum::{extract::State, Json};

use roster_common::query::{self, FleetView, Selection};
use roster_common::{Error, FleetData};

use crate::{ApiResult, AppState};

/// GET /api/fleet
///
/// Returns the persisted snapshot. When no snapshot exists yet a normal
/// (cooldown-gated) sync runs first.
pub async fn get_fleet(State(state): State<AppState>) -> ApiResult<Json<FleetData>> {
    Ok(Json(state.sync.load_or_sync().await?))
}

/// POST /api/fleet/view
///
/// **Request:** the user's [`Selection`] (selected assignment and model,
/// favorite ids, active pill)
/// **Response:** favorites view, roster view, model list and plate hint
///
/// **Errors:**
/// - 404 Not Found: no snapshot has been synced yet
pub async fn fleet_view(
    State(state): State<AppState>,
    Json(selection): Json<Selection>,
) -> ApiResult<Json<FleetView>> {
    let fleet = state
        .store()
        .load_fleet()?
        .ok_or_else(|| Error::NotFound("No fleet snapshot; run a sync first".to_string()))?;

    Ok(Json(query::query(&fleet, &selection)))
}
