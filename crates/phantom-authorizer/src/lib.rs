//! Phantom Token Authorizer
//!
//! Authorizer for API gateways. An opaque bearer token is exchanged for a
//! phantom token (a signed JWT) at the OAuth introspection endpoint, its scopes
//! are checked against the configured requirement, and the gateway receives an
//! IAM-style allow or deny policy. On allow the phantom token rides along in
//! the decision context so the gateway can forward it upstream.

pub mod authorizer;
pub mod bearer;
pub mod claims;
pub mod config;
pub mod error;
pub mod introspection;
pub mod logging;
pub mod policy;
pub mod scope;
pub mod server;

pub use authorizer::{Authorizer, AuthorizerOutcome, AuthorizerRequest};
pub use config::Config;
pub use error::{AuthError, Result};
pub use introspection::{IntrospectionClient, Introspector};
pub use policy::AccessDecision;
pub use scope::ScopeSet;
