//! Admin token check
//!
//! A plain equality check between a submitted token and the configured
//! secret. This gates operator actions (forced sync, banner settings); it is
//! not a credential system.

use crate::{Error, Result};

/// Validate a submitted admin token against the configured secret
///
/// - empty submission: [`Error::InvalidInput`]
/// - no secret configured: [`Error::Config`]
/// - mismatch: [`Error::Unauthorized`]
pub fn verify_admin_token(submitted: &str, configured: Option<&str>) -> Result<()> {
    if submitted.is_empty() {
        return Err(Error::InvalidInput("Token is required".to_string()));
    }

    let Some(secret) = configured else {
        return Err(Error::Config("Admin token is not configured".to_string()));
    };

    if submitted == secret {
        Ok(())
    } else {
        Err(Error::Unauthorized("Invalid token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_token() {
        assert!(verify_admin_token("hunter2", Some("hunter2")).is_ok());
    }

    #[test]
    fn test_wrong_token() {
        assert!(matches!(
            verify_admin_token("hunter3", Some("hunter2")),
            Err(Error::Unauthorized(_))
        ));
        // Exact comparison, no trimming
        assert!(matches!(
            verify_admin_token("hunter2 ", Some("hunter2")),
            Err(Error::Unauthorized(_))
        ));
    }

    #[test]
    fn test_empty_token() {
        assert!(matches!(
            verify_admin_token("", Some("hunter2")),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unconfigured_secret() {
        assert!(matches!(
            verify_admin_token("hunter2", None),
            Err(Error::Config(_))
        ));
    }
}
