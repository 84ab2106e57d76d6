//! Shared fixtures: a mock introspection authority and phantom token minting

#![allow(dead_code)]

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use jsonwebtoken::{EncodingKey, Header, encode};
use phantom_authorizer::config::ClientCredentials;
use phantom_authorizer::IntrospectionClient;
use secrecy::SecretString;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

pub const CLIENT_ID: &str = "gateway-client";
pub const CLIENT_SECRET: &str = "gateway-secret";
pub const METHOD_ARN: &str = "arn:aws:execute-api:eu-west-1:123456789012:abcdef/prod/GET/orders";

/// What the mock authority answers with
#[derive(Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn jwt(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
            delay: None,
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: String::new(),
            delay: None,
        }
    }
}

/// A request as seen by the mock authority
#[derive(Debug, Clone)]
pub struct Captured {
    pub headers: HeaderMap,
    pub body: String,
}

#[derive(Clone)]
struct AuthorityState {
    reply: Reply,
    captured: Arc<Mutex<Vec<Captured>>>,
}

pub struct MockAuthority {
    pub endpoint: Url,
    pub captured: Arc<Mutex<Vec<Captured>>>,
    handle: tokio::task::JoinHandle<()>,
}

impl MockAuthority {
    pub async fn start(reply: Reply) -> Self {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = AuthorityState {
            reply,
            captured: captured.clone(),
        };

        let app = Router::new()
            .route("/oauth/v2/oauth-introspect", post(introspect))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let endpoint = Url::parse(&format!("http://{addr}/oauth/v2/oauth-introspect")).unwrap();
        Self {
            endpoint,
            captured,
            handle,
        }
    }

    pub fn client(&self) -> IntrospectionClient {
        self.client_with_timeout(Duration::from_secs(5))
    }

    pub fn client_with_timeout(&self, timeout: Duration) -> IntrospectionClient {
        IntrospectionClient::new(self.endpoint.clone(), &credentials(), timeout).unwrap()
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

impl Drop for MockAuthority {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn introspect(
    State(state): State<AuthorityState>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    state.captured.lock().unwrap().push(Captured { headers, body });
    if let Some(delay) = state.reply.delay {
        tokio::time::sleep(delay).await;
    }
    (state.reply.status, state.reply.body.clone())
}

pub fn credentials() -> ClientCredentials {
    ClientCredentials {
        client_id: CLIENT_ID.to_string(),
        client_secret: SecretString::from(CLIENT_SECRET.to_string()),
    }
}

/// Mint a phantom token the way the authority would
pub fn mint(claims: serde_json::Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"authority-signing-key"),
    )
    .unwrap()
}
