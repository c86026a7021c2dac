//! HTTP transport for Slack interaction callbacks.
//!
//! Mounts the interaction endpoint and a `/health` probe on an axum router.
//! The interaction endpoint accepts any method so that non-`POST` requests
//! are logged and answered with `405` by the same code path.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};

use crate::slack::events::{process_interaction, InteractionReply};
use crate::state::AppState;
use crate::{AppError, Result};

/// Handler for `GET /health`: returns 200 OK with a plain-text body.
async fn health() -> &'static str {
    "ok"
}

async fn interaction(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        let err = AppError::UnsupportedMethod(method.to_string());
        warn!(%err, "interaction endpoint rejected request");
        return err.status_code().into_response();
    }

    let reply = process_interaction(&state, &body)
        .instrument(info_span!("interaction"))
        .await;
    respond(reply, &state)
}

/// Build the HTTP response and start any after-response work.
fn respond(reply: InteractionReply, state: &Arc<AppState>) -> Response {
    let response = match reply.message {
        Some(message) => (reply.status, Json(message)).into_response(),
        None => reply.status.into_response(),
    };

    if let Some(deferred) = reply.after_response {
        let state = Arc::clone(state);
        tokio::spawn(async move { deferred.run(&state).await });
    }

    response
}

/// Router with the interaction endpoint mounted at `config.http.path`.
pub fn router(state: Arc<AppState>) -> Router {
    let path = state.config.http.path.clone();
    Router::new()
        .route("/health", get(health))
        .route(&path, any(interaction))
        .with_state(state)
}

/// Serve interaction callbacks on `listener` until `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Io` if the server fails while running.
pub async fn serve(listener: TcpListener, state: Arc<AppState>, ct: CancellationToken) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, path = %state.config.http.path, "interaction endpoint listening");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await
        .map_err(|err| AppError::Io(format!("http server failed: {err}")))
}
