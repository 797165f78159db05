//! Sync trigger and status endpoints

use axum::{extract::State, Json};
use tracing::info;

use roster_common::{FleetData, SyncStatus};

use crate::{ApiResult, AppState};

/// POST /api/sync
///
/// Non-privileged sync. Fails with 429 while the 24 hour cooldown is active.
pub async fn sync_fleet(State(state): State<AppState>) -> ApiResult<Json<FleetData>> {
    info!("Sync requested");
    Ok(Json(state.sync.sync(false).await?))
}

/// GET /api/sync/status
///
/// `canSync` is recomputed from `lastSync` on every call.
pub async fn sync_status(State(state): State<AppState>) -> ApiResult<Json<SyncStatus>> {
    Ok(Json(state.sync.gate().status()?))
}
