//! Phantom token claims decoding
//!
//! The phantom token comes straight from the introspection authority, which is
//! the trust boundary. Only the payload segment is read here; the signature is
//! not verified locally.

use crate::error::{AuthError, Result};
use crate::scope::ScopeSet;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::Deserialize;

/// base64url that accepts the payload with or without `=` padding
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims carried by a phantom token
#[derive(Debug, Clone, Deserialize)]
pub struct PhantomClaims {
    /// Subject
    #[serde(default)]
    pub sub: Option<String>,

    /// OAuth2 scope claim
    #[serde(default)]
    scope: Option<ScopeValue>,

    /// Microsoft-style scope claim
    #[serde(default)]
    scp: Option<ScopeValue>,

    /// Every other claim, untyped. `exp`, `iss` and friends land here and
    /// are never validated locally.
    #[serde(flatten)]
    pub additional: serde_json::Map<String, serde_json::Value>,
}

/// Scope value (can be string or array)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ScopeValue {
    String(String),
    List(Vec<String>),
}

impl ScopeValue {
    fn to_scope_set(&self) -> ScopeSet {
        match self {
            Self::String(s) => ScopeSet::parse(s),
            Self::List(list) => list.iter().map(String::as_str).collect(),
        }
    }
}

impl PhantomClaims {
    /// Granted scopes. A token without a scope claim grants nothing.
    pub fn scopes(&self) -> ScopeSet {
        // OAuth2 'scope' claim takes precedence
        self.scope
            .as_ref()
            .or(self.scp.as_ref())
            .map(ScopeValue::to_scope_set)
            .unwrap_or_default()
    }

    /// The subject, if present and non-blank
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Decode the payload segment of a compact JWS into [`PhantomClaims`]
pub fn decode(phantom_token: &str) -> Result<PhantomClaims> {
    let mut segments = phantom_token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AuthError::MalformedToken(
            "expected three dot-separated segments".to_string(),
        ));
    };

    if payload.is_empty() {
        return Err(AuthError::MalformedToken("empty payload segment".to_string()));
    }

    let bytes = URL_SAFE_LENIENT
        .decode(payload)
        .map_err(|e| AuthError::MalformedToken(format!("payload is not base64url: {e}")))?;

    Ok(serde_json::from_slice(&bytes)?)
}
