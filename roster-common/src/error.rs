//! Common error types for the fleet roster

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Common result type for fleet roster operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the fleet roster crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot or status file could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Required configuration is absent or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Non-privileged sync attempted before the cooldown elapsed
    #[error("Sync is only allowed once every 24 hours.")]
    RateLimited {
        last_sync: DateTime<Utc>,
        next_allowed: DateTime<Utc>,
    },

    /// Upstream spreadsheet returned no rows
    #[error("No data found in spreadsheet.")]
    SourceUnavailable,

    /// External call failed (network, HTTP status, malformed payload)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Admin token missing or wrong
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
