//! Slack interaction dispatch.
//!
//! Turns one raw callback body into an [`InteractionReply`]: decode and
//! authenticate, pick a route, run the handler, and describe what the HTTP
//! layer must send back and do afterwards. Decoding, authentication, and
//! routing failures end the request before any Slack or Rancher call.

use axum::http::StatusCode;
use tracing::{error, info, warn};

use crate::models::callback::{InteractionCallback, OriginalMessage};
use crate::slack::decoder;
use crate::slack::handlers::{self, cancel, Outcome};
use crate::slack::router::{self, Route};
use crate::state::AppState;
use crate::{AppError, Result};

/// Deletion of the original message, run after the response is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredDelete {
    /// Channel of the original message.
    pub channel: String,
    /// Timestamp of the original message.
    pub ts: String,
}

impl DeferredDelete {
    /// Issue the delete within the configured call bound. Failures are logged only.
    pub async fn run(self, state: &AppState) {
        handlers::delete_original(state, &self.channel, &self.ts).await;
    }
}

/// What the HTTP layer sends back for one callback.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionReply {
    /// Response status.
    pub status: StatusCode,
    /// JSON body replacing the clicked message, if any.
    pub message: Option<OriginalMessage>,
    /// Work to run once the response exists.
    pub after_response: Option<DeferredDelete>,
}

impl InteractionReply {
    /// Empty-bodied reply with the given status.
    #[must_use]
    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            message: None,
            after_response: None,
        }
    }

    /// Replace the clicked message, then delete it.
    #[must_use]
    pub fn replace(message: OriginalMessage, callback: &InteractionCallback) -> Self {
        Self {
            status: StatusCode::OK,
            message: Some(message),
            after_response: Some(DeferredDelete {
                channel: callback.channel_id.clone(),
                ts: callback.message_ts.clone(),
            }),
        }
    }
}

/// Process a raw interaction body.
///
/// Never fails: every error is logged and mapped to its HTTP status.
pub async fn process_interaction(state: &AppState, body: &[u8]) -> InteractionReply {
    match handle(state, body).await {
        Ok(reply) => reply,
        Err(err) => {
            match &err {
                AppError::Unauthorized(_) => warn!(%err, "interaction rejected"),
                _ => error!(%err, "interaction failed"),
            }
            InteractionReply::status(err.status_code())
        }
    }
}

async fn handle(state: &AppState, body: &[u8]) -> Result<InteractionReply> {
    let callback = decoder::decode(body, &state.config.slack.verification_token)?;

    match router::route(&callback)? {
        Route::Ignored { .. } => Ok(InteractionReply::status(StatusCode::OK)),
        Route::Cancel => {
            info!(user = %callback.user.name, "request cancelled");
            let message = cancel::handle(&callback)?;
            Ok(InteractionReply::replace(message, &callback))
        }
        Route::Operation(operation) => {
            info!(
                %operation,
                user = %callback.user.name,
                value = callback.selected_value.as_deref().unwrap_or_default(),
                "dispatching operation"
            );
            Ok(match handlers::dispatch(operation, &callback, state).await? {
                Outcome::Posted => InteractionReply::status(StatusCode::OK),
                Outcome::Replace(message) => InteractionReply::replace(message, &callback),
                Outcome::Failed => InteractionReply::status(StatusCode::INTERNAL_SERVER_ERROR),
            })
        }
    }
}
