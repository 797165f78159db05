//! # Fleet Roster Common Library
//!
//! Shared code for the fleet roster dashboard including:
//! - Fleet data model (assignments, vehicles, sync status, admin data)
//! - Spreadsheet row classification
//! - Sync gate and sync orchestration
//! - Snapshot persistence
//! - Fleet query engine for the dashboard views
//! - Configuration loading

pub mod auth;
pub mod classifier;
pub mod config;
pub mod error;
pub mod gate;
pub mod model;
pub mod query;
pub mod recommend;
pub mod store;
pub mod sync;
pub mod time;

pub use error::{Error, Result};
pub use model::{AdminData, Assignment, FleetData, SyncStatus, Vehicle};
