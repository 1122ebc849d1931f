use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::error::RelayError;
use crate::relay::TutorRelay;

pub const CORS_ALLOW_METHODS: &str = "GET,OPTIONS,PATCH,DELETE,POST,PUT";
pub const CORS_ALLOW_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, \
Content-Length, Content-MD5, Content-Type, Date, X-Api-Version, Authorization";

/**
 * \brief Builds the relay router. Every response carries the CORS headers.
 */
pub fn router(relay: Arc<TutorRelay>) -> Router {
    // CorsLayer refuses a wildcard origin together with credentials, so the
    // headers are set directly.
    Router::new()
        .route("/api/chat", any(chat))
        .route("/api/health", get(health_check))
        .with_state(relay)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(CORS_ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
}

/**
 * \brief Starts the HTTP service and serves until Ctrl-C.
 * \param addr listen address, e.g. "0.0.0.0:3000"
 */
pub async fn run(addr: &str, relay: Arc<TutorRelay>) -> Result<()> {
    let app = router(relay);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {} failed", addr))?;
    tracing::info!("Tutor relay listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping");
}

/**
 * \brief Chat endpoint: all methods reach the relay, which owns the method gate.
 * A body the server refuses to buffer still gets the JSON error envelope.
 */
async fn chat(
    State(relay): State<Arc<TutorRelay>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> impl IntoResponse {
    if method != Method::POST {
        return relay.handle(&method, &[]).await;
    }
    match body {
        Ok(body) => relay.handle(&method, &body).await,
        Err(rejection) => relay.reject(&body_rejection(&rejection)),
    }
}

fn body_rejection(rejection: &BytesRejection) -> RelayError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RelayError::PayloadTooLarge
    } else {
        RelayError::InvalidRequestBody {
            reason: rejection.body_text(),
        }
    }
}

#[derive(Serialize, Debug)]
struct HealthStatus {
    ok: bool,
    provider: String,
    model: String,
    credential_configured: bool,
}

/**
 * \brief Health check. Reports whether the credential resolves, without contacting the upstream.
 */
async fn health_check(State(relay): State<Arc<TutorRelay>>) -> Json<HealthStatus> {
    let adapter = relay.adapter();
    let credential_configured = relay.credential_configured();
    Json(HealthStatus {
        ok: credential_configured,
        provider: adapter.name().to_string(),
        model: adapter.model().to_string(),
        credential_configured,
    })
}
