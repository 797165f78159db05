//! roster-web library - fleet roster dashboard service
//!
//! Serves the fleet snapshot, the dashboard query views, sync triggers,
//! recommendations and the operator settings over HTTP.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use roster_common::recommend::Recommender;
use roster_common::store::SnapshotStore;
use roster_common::sync::SyncService;

pub mod api;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Sync pipeline (gate, row source, snapshot store)
    pub sync: Arc<SyncService>,
    /// Recommendation backend, `None` when not configured
    pub recommender: Option<Arc<dyn Recommender>>,
    /// Secret for admin routes, `None` disables them
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        sync: Arc<SyncService>,
        recommender: Option<Arc<dyn Recommender>>,
        admin_token: Option<String>,
    ) -> Self {
        Self {
            sync,
            recommender,
            admin_token: admin_token.map(Arc::from),
        }
    }

    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        self.sync.store()
    }
}

/// Build application router
///
/// Admin routes sit behind the admin token middleware; everything else,
/// including the token check itself, is public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    let admin = Router::new()
        .route("/api/admin/sync", post(api::admin_sync))
        .route(
            "/api/admin/settings",
            get(api::get_admin_settings).put(api::update_admin_settings),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::admin_middleware,
        ));

    let public = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/fleet", get(api::get_fleet))
        .route("/api/fleet/view", post(api::fleet_view))
        .route("/api/sync", post(api::sync_fleet))
        .route("/api/sync/status", get(api::sync_status))
        .route("/api/recommendations", post(api::recommend))
        .route("/api/announcement", get(api::announcement))
        .route("/api/admin/auth", post(api::admin_auth))
        .merge(api::health_routes());

    Router::new()
        .merge(admin)
        .merge(public)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
