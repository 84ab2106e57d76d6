//! Authorization decisions for gateway requests
//!
//! A request moves through credential validation, introspection, claims
//! decoding, the scope check and decision building. Only a missing credential
//! or a failed introspection leaves early with [`AuthorizerOutcome::Unauthorized`];
//! everything after a phantom token was obtained ends in an [`AccessDecision`].

use crate::bearer;
use crate::claims;
use crate::config::Config;
use crate::error::Result;
use crate::introspection::{IntrospectionClient, Introspector};
use crate::policy::{self, AccessDecision};
use crate::scope::{self, ScopeSet};
use serde::{Deserialize, Serialize};

/// Inbound gateway authorizer event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerRequest {
    /// Event type, `TOKEN` for token authorizers
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub authorization_token: Option<String>,
    /// Method and resource being invoked
    #[serde(default)]
    pub method_arn: String,
}

impl AuthorizerRequest {
    pub fn new(authorization_token: Option<&str>, method_arn: impl Into<String>) -> Self {
        Self {
            kind: Some("TOKEN".to_string()),
            authorization_token: authorization_token.map(String::from),
            method_arn: method_arn.into(),
        }
    }
}

/// Result of authorizing one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizerOutcome {
    /// Hard reject: no credential, or introspection did not produce a token
    Unauthorized,
    /// Structured allow or deny-all decision
    Decision(AccessDecision),
}

impl AuthorizerOutcome {
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Decision(d) if d.is_allow())
    }

    pub fn decision(&self) -> Option<&AccessDecision> {
        match self {
            Self::Decision(d) => Some(d),
            Self::Unauthorized => None,
        }
    }
}

/// Phantom token authorizer
pub struct Authorizer<I> {
    introspector: I,
    required_scope: ScopeSet,
}

impl Authorizer<IntrospectionClient> {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            IntrospectionClient::from_config(config)?,
            config.required_scope.clone(),
        ))
    }
}

impl<I: Introspector> Authorizer<I> {
    pub fn new(introspector: I, required_scope: ScopeSet) -> Self {
        Self {
            introspector,
            required_scope,
        }
    }

    pub fn required_scope(&self) -> &ScopeSet {
        &self.required_scope
    }

    /// Authorize one gateway request.
    ///
    /// Dropping the returned future abandons an in-flight introspection call
    /// and produces no decision.
    #[tracing::instrument(name = "authorize", skip_all, fields(method_arn = %request.method_arn))]
    pub async fn authorize(&self, request: &AuthorizerRequest) -> AuthorizerOutcome {
        let token = match bearer::extract_token(request.authorization_token.as_deref()) {
            Ok(token) => token,
            Err(_) => {
                tracing::info!("Request carries no bearer credential");
                return AuthorizerOutcome::Unauthorized;
            }
        };

        let phantom_token = match self.introspector.introspect(token).await {
            Ok(phantom_token) => phantom_token,
            Err(e) if e.is_unauthorized() => {
                tracing::warn!(error = %e, "Token introspection failed");
                return AuthorizerOutcome::Unauthorized;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Introspection response unusable");
                return AuthorizerOutcome::Decision(AccessDecision::deny_all());
            }
        };

        let decision = self
            .decide(&phantom_token, &request.method_arn)
            .with_forwarding_token(phantom_token);

        tracing::debug!(allow = decision.is_allow(), "Authorization decided");
        AuthorizerOutcome::Decision(decision)
    }

    fn decide(&self, phantom_token: &str, method_arn: &str) -> AccessDecision {
        let claims = match claims::decode(phantom_token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!(error = %e, "Could not decode phantom token");
                return AccessDecision::deny_all();
            }
        };

        let Some(subject) = claims.subject() else {
            tracing::warn!("Phantom token has no subject");
            return AccessDecision::deny_all();
        };

        if method_arn.trim().is_empty() {
            tracing::warn!("Request has no method ARN");
            return AccessDecision::deny_all();
        }

        let matched = scope::matches(&claims.scopes(), &self.required_scope);
        if !matched {
            tracing::info!(subject, "Required scope not granted");
        }

        policy::build_decision(matched, subject, method_arn)
    }
}
