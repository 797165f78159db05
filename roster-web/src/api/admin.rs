//! Operator endpoints: token check, forced sync, public banner

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use roster_common::auth::verify_admin_token;
use roster_common::{AdminData, FleetData};

use crate::{ApiResult, AppState};

/// Request payload for the admin token check
#[derive(Debug, Deserialize)]
pub struct AdminAuthRequest {
    #[serde(default)]
    pub token: String,
}

/// Response payload for the admin token check
#[derive(Debug, Serialize)]
pub struct AdminAuthResponse {
    pub success: bool,
}

/// POST /api/admin/auth
///
/// **Request:** `{"token": "..."}`
/// **Response:** `{"success": true}`
///
/// **Errors:**
/// - 400 Bad Request: empty token
/// - 401 Unauthorized: wrong token
/// - 500: no admin token configured
pub async fn admin_auth(
    State(state): State<AppState>,
    Json(payload): Json<AdminAuthRequest>,
) -> ApiResult<Json<AdminAuthResponse>> {
    verify_admin_token(&payload.token, state.admin_token.as_deref())?;
    Ok(Json(AdminAuthResponse { success: true }))
}

/// POST /api/admin/sync
///
/// Operator sync: bypasses the cooldown but still records the sync time.
pub async fn admin_sync(State(state): State<AppState>) -> ApiResult<Json<FleetData>> {
    info!("Forced sync requested by operator");
    Ok(Json(state.sync.sync(true).await?))
}

/// GET /api/admin/settings
pub async fn get_admin_settings(State(state): State<AppState>) -> ApiResult<Json<AdminData>> {
    Ok(Json(state.store().load_admin()?))
}

/// PUT /api/admin/settings
pub async fn update_admin_settings(
    State(state): State<AppState>,
    Json(settings): Json<AdminData>,
) -> ApiResult<Json<AdminData>> {
    state.store().save_admin(&settings)?;
    info!(
        show_public_message = settings.show_public_message,
        "Admin settings updated"
    );
    Ok(Json(settings))
}

/// Public banner response
#[derive(Debug, Serialize)]
pub struct AnnouncementResponse {
    pub message: Option<String>,
}

/// GET /api/announcement
///
/// Returns the operator banner only while it is switched on.
pub async fn announcement(State(state): State<AppState>) -> ApiResult<Json<AnnouncementResponse>> {
    let admin = state.store().load_admin()?;
    Ok(Json(AnnouncementResponse {
        message: admin.visible_message().map(str::to_string),
    }))
}
