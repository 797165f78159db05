//! HTTP API handlers for roster-web

pub mod admin;
pub mod auth;
pub mod buildinfo;
pub mod fleet;
pub mod health;
pub mod recommend;
pub mod sync;

pub use admin::{admin_auth, admin_sync, announcement, get_admin_settings, update_admin_settings};
pub use auth::admin_middleware;
pub use buildinfo::get_build_info;
pub use fleet::{fleet_view, get_fleet};
pub use health::health_routes;
pub use recommend::recommend;
pub use sync::{sync_fleet, sync_status};
