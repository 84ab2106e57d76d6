//! Authorizer configuration
//!
//! Loaded once at process start from environment variables and passed by
//! reference into the authorizer. Missing required values are a startup
//! fault, never a per-request condition.

use crate::error::{AuthError, Result};
use crate::scope::ScopeSet;
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

/// Configuration keys read from the environment
pub struct ConfigKeys;

impl ConfigKeys {
    pub const HOST: &'static str = "HOST";
    pub const PORT: &'static str = "PORT";
    pub const INTROSPECTION_PATH: &'static str = "INTROSPECTION_PATH";
    pub const CLIENT_ID: &'static str = "CLIENT_ID";
    pub const CLIENT_SECRET: &'static str = "CLIENT_SECRET";
    pub const SCOPE: &'static str = "SCOPE";
    pub const TIMEOUT_MS: &'static str = "INTROSPECTION_TIMEOUT_MS";
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Credentials the authorizer presents to the introspection endpoint
#[derive(Debug)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
}

#[derive(Debug)]
pub struct Config {
    /// Full introspection endpoint URL (always https)
    pub introspection_endpoint: Url,
    pub credentials: ClientCredentials,
    /// Scopes a caller must hold. Empty means unrestricted.
    pub required_scope: ScopeSet,
    /// Upper bound on a single introspection call
    pub timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    AuthError::Configuration(format!("Missing required variable {key}"))
                })
        };

        let host = required(ConfigKeys::HOST)?;
        let port = required(ConfigKeys::PORT)?.parse::<u16>().map_err(|e| {
            AuthError::Configuration(format!("Invalid {}: {e}", ConfigKeys::PORT))
        })?;
        let path = required(ConfigKeys::INTROSPECTION_PATH)?;
        let client_id = required(ConfigKeys::CLIENT_ID)?;
        let client_secret = SecretString::from(required(ConfigKeys::CLIENT_SECRET)?);

        let required_scope = lookup(ConfigKeys::SCOPE)
            .map(|s| ScopeSet::parse(&s))
            .unwrap_or_default();

        let timeout = match lookup(ConfigKeys::TIMEOUT_MS) {
            Some(raw) if !raw.trim().is_empty() => {
                let millis = raw.trim().parse::<u64>().map_err(|e| {
                    AuthError::Configuration(format!("Invalid {}: {e}", ConfigKeys::TIMEOUT_MS))
                })?;
                if millis == 0 {
                    return Err(AuthError::Configuration(format!(
                        "{} must be greater than zero",
                        ConfigKeys::TIMEOUT_MS
                    )));
                }
                Duration::from_millis(millis)
            }
            _ => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            introspection_endpoint: introspection_url(&host, port, &path)?,
            credentials: ClientCredentials {
                client_id,
                client_secret,
            },
            required_scope,
            timeout,
        })
    }
}

/// Build the https introspection endpoint from its parts
fn introspection_url(host: &str, port: u16, path: &str) -> Result<Url> {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    let url = Url::parse(&format!("https://{host}:{port}{path}"))
        .map_err(|e| AuthError::Configuration(format!("Invalid introspection endpoint: {e}")))?;

    if url.host_str().is_none() {
        return Err(AuthError::Configuration(
            "Introspection endpoint has no host".to_string(),
        ));
    }

    Ok(url)
}
