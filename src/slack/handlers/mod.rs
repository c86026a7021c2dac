//! Slack interaction handler sub-modules.
//!
//! Every operation handler follows the same shape: one bounded control-plane
//! call, one message posted to the bot channel (the result, or the failure),
//! then deletion of the message that carried the menu. The log handler is
//! the exception and hands back a rewritten message instead of posting.

pub mod canary;
pub mod cancel;
pub mod logs;
pub mod restart;
pub mod service;

use std::future::Future;

use tracing::{info, warn};

use crate::models::callback::{InteractionCallback, OriginalMessage};
use crate::models::operation::OperationId;
use crate::slack::ChatAttachment;
use crate::state::AppState;
use crate::{AppError, Result};

/// How a handled operation should be answered over HTTP.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Result posted and original deleted; acknowledge with an empty body.
    Posted,
    /// Respond with this message, then delete the original.
    Replace(OriginalMessage),
    /// Operation failed; the failure was posted and the original deleted.
    Failed,
}

/// Run the handler bound to `operation`.
///
/// # Errors
///
/// Returns `AppError::Malformed` when the callback lacks a selected value.
/// Adapter failures never surface here; they become [`Outcome::Failed`].
pub async fn dispatch(
    operation: OperationId,
    callback: &InteractionCallback,
    state: &AppState,
) -> Result<Outcome> {
    match operation {
        OperationId::RestartContainer => restart::handle(callback, state).await,
        OperationId::LogsContainer => logs::handle(callback, state).await,
        OperationId::GetServiceInfo => service::handle(callback, state).await,
        OperationId::CanaryActivate => canary::handle_enable(callback, state).await,
        OperationId::CanaryDisable => canary::handle_disable(callback, state).await,
        OperationId::CanaryInfo => canary::handle_info(callback, state).await,
    }
}

/// Await an outbound call within the configured bound.
pub(crate) async fn bounded<T>(
    state: &AppState,
    call: &str,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    let limit = state.config.call_timeout();
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| AppError::Timeout(format!("{call} exceeded {}s", limit.as_secs())))?
}

/// Post the outcome of a control-plane call, then delete the original message.
pub(crate) async fn finish(
    state: &AppState,
    callback: &InteractionCallback,
    operation: OperationId,
    value: &str,
    result: Result<String>,
) -> Outcome {
    let outcome = match result {
        Ok(text) => {
            info!(%operation, value, "operation completed");
            post_result(state, ChatAttachment::result(text)).await;
            Outcome::Posted
        }
        Err(err) => {
            report_failure(state, operation, value, &err).await;
            Outcome::Failed
        }
    };
    delete_original(state, &callback.channel_id, &callback.message_ts).await;
    outcome
}

/// Make a failed operation visible in the bot channel.
pub(crate) async fn report_failure(
    state: &AppState,
    operation: OperationId,
    value: &str,
    err: &AppError,
) {
    warn!(%operation, value, %err, "operation failed");
    post_result(state, ChatAttachment::failure(failure_text(operation, value, err))).await;
}

/// Text of the failure notice posted for `operation`.
#[must_use]
pub fn failure_text(operation: OperationId, value: &str, err: &AppError) -> String {
    format!(":warning: Falha ao executar `{operation}` para `{value}`: {err}")
}

async fn post_result(state: &AppState, attachment: ChatAttachment) {
    let channel = &state.config.slack.channel_id;
    if let Err(err) = bounded(
        state,
        "chat.postMessage",
        state.chat.post_message(channel, attachment),
    )
    .await
    {
        warn!(%err, channel, "failed to post result message");
    }
}

/// Delete the message that carried the interactive controls.
///
/// Failures are logged and otherwise ignored.
pub async fn delete_original(state: &AppState, channel: &str, ts: &str) {
    match bounded(state, "chat.delete", state.chat.delete_message(channel, ts)).await {
        Ok(()) => info!(channel, ts, "original message deleted"),
        Err(err) => warn!(%err, channel, ts, "failed to delete original message"),
    }
}
