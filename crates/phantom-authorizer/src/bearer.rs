//! Bearer credential extraction

use crate::error::{AuthError, Result};

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the opaque token from the gateway's `authorizationToken`.
///
/// A literal `Bearer ` prefix is stripped once if present. Missing or blank
/// values are [`AuthError::MissingCredential`].
pub fn extract_token(authorization: Option<&str>) -> Result<&str> {
    let raw = authorization
        .ok_or(AuthError::MissingCredential)?
        .trim_start();
    let token = raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw).trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }

    Ok(token)
}
