//! HTTP surface for the authorizer
//!
//! `POST /authorize` takes a gateway authorizer event and answers with the
//! decision payload, or `401` for the hard-reject path.

use crate::authorizer::{Authorizer, AuthorizerOutcome, AuthorizerRequest};
use crate::introspection::Introspector;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

pub fn router<I>(authorizer: Arc<Authorizer<I>>) -> Router
where
    I: Introspector + 'static,
{
    Router::new()
        .route("/authorize", post(authorize::<I>))
        .route("/health", get(health))
        .with_state(authorizer)
}

/// Serve the authorizer until `shutdown` resolves
pub async fn serve<I, F>(
    listener: TcpListener,
    authorizer: Arc<Authorizer<I>>,
    shutdown: F,
) -> std::io::Result<()>
where
    I: Introspector + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Authorizer listening on {}", addr);
    }

    axum::serve(listener, router(authorizer))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn authorize<I>(
    State(authorizer): State<Arc<Authorizer<I>>>,
    Json(request): Json<AuthorizerRequest>,
) -> Response
where
    I: Introspector + 'static,
{
    match authorizer.authorize(&request).await {
        AuthorizerOutcome::Decision(decision) => Json(decision).into_response(),
        AuthorizerOutcome::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Unauthorized"})),
        )
            .into_response(),
    }
}

async fn health() -> StatusCode {
    StatusCode::OK
}
