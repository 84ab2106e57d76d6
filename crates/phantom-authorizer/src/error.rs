//! Error types for the phantom token authorizer

use thiserror::Error;

/// Result type alias for authorizer operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Authorizer error types
#[derive(Error, Debug)]
pub enum AuthError {
    /// Missing or invalid configuration. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No bearer credential in the inbound request
    #[error("Missing bearer credential")]
    MissingCredential,

    #[error("Introspection request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Introspection endpoint returned status {0}")]
    IntrospectionStatus(u16),

    #[error("Introspection returned an empty response")]
    EmptyResponse,

    /// The introspection response is not a compact JWS
    #[error("Malformed phantom token: {0}")]
    MalformedToken(String),

    #[error("Invalid claims payload: {0}")]
    InvalidClaims(#[from] serde_json::Error),
}

impl AuthError {
    /// Whether this failure takes the gateway's hard-reject path.
    ///
    /// Input and transport faults surface as `Unauthorized`. Anything that
    /// goes wrong after a phantom token was obtained collapses into the
    /// deny-all decision instead.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential
                | Self::Transport(_)
                | Self::IntrospectionStatus(_)
                | Self::EmptyResponse
        )
    }
}
