//! OAuth 2.0 Token Introspection (RFC 7662) with phantom token responses
//!
//! The authorizer asks for `application/jwt`, so a successful introspection
//! returns the phantom token itself rather than a JSON document.

use crate::config::{ClientCredentials, Config};
use crate::error::{AuthError, Result};
use async_trait::async_trait;
use base64::Engine;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

const ACCEPT_JWT: &str = "application/jwt";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Exchanges an opaque access token for a phantom token
#[async_trait]
pub trait Introspector: Send + Sync {
    /// Introspect `token` and return the raw phantom token.
    ///
    /// Transport failures, non-success statuses and empty bodies are errors.
    /// Nothing is retried.
    async fn introspect(&self, token: &str) -> Result<String>;
}

/// Introspection client for the configured authority
#[derive(Debug, Clone)]
pub struct IntrospectionClient {
    client: reqwest::Client,
    endpoint: Url,
    authorization: HeaderValue,
}

impl IntrospectionClient {
    pub fn new(endpoint: Url, credentials: &ClientCredentials, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        let mut authorization = HeaderValue::from_str(&basic_authorization(
            &credentials.client_id,
            credentials.client_secret.expose_secret(),
        ))
        .map_err(|_| {
            AuthError::Configuration("Client credentials are not valid header text".to_string())
        })?;
        authorization.set_sensitive(true);

        Ok(Self {
            client,
            endpoint,
            authorization,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.introspection_endpoint.clone(),
            &config.credentials,
            config.timeout,
        )
    }
}

#[async_trait]
impl Introspector for IntrospectionClient {
    async fn introspect(&self, token: &str) -> Result<String> {
        if token.is_empty() {
            return Err(AuthError::MissingCredential);
        }

        tracing::debug!(endpoint = %self.endpoint, "Introspecting token");

        // Credentials go in the Authorization header, never in the form body
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, self.authorization.clone())
            .header(ACCEPT, ACCEPT_JWT)
            .header(CONTENT_TYPE, FORM_URLENCODED)
            .body(form_body(token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::IntrospectionStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let phantom_token = body.trim();
        if phantom_token.is_empty() {
            return Err(AuthError::EmptyResponse);
        }

        Ok(phantom_token.to_string())
    }
}

/// `Basic` authorization value for the client credentials
pub fn basic_authorization(client_id: &str, client_secret: &str) -> String {
    let encoded =
        base64::engine::general_purpose::STANDARD.encode(format!("{client_id}:{client_secret}"));
    format!("Basic {encoded}")
}

/// Form-encoded introspection request body
fn form_body(token: &str) -> String {
    format!("token={}", urlencoding::encode(token))
}
