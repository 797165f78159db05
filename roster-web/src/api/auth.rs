//! Admin token middleware
//!
//! Admin routes require the configured token in either an `X-Admin-Token`
//! header or an `Authorization: Bearer <token>` header.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use roster_common::auth::verify_admin_token;
use roster_common::Error;

use crate::{ApiError, AppState};

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Token submitted with a request, empty if none
pub fn submitted_token(headers: &HeaderMap) -> &str {
    if let Some(token) = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        return token;
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("")
}

/// Reject requests without the admin token
pub async fn admin_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = submitted_token(request.headers());

    verify_admin_token(token, state.admin_token.as_deref()).map_err(|e| match e {
        // Missing token on a protected route is an auth failure, not bad input
        Error::InvalidInput(_) => Error::Unauthorized("Admin token required".to_string()),
        Error::Unauthorized(msg) => {
            warn!("Rejected admin request to {}", request.uri().path());
            Error::Unauthorized(msg)
        }
        other => other,
    })?;

    Ok(next.run(request).await)
}
