//! Container log retrieval handler.
//!
//! Unlike the other operations, the result is not posted as a new message:
//! the log artifact is uploaded to the bot channel and the clicked message is
//! rewritten in the HTTP response to reference the uploaded file. The caller
//! deletes the original only after producing that response.

use std::path::Path;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::models::callback::{FileRef, InteractionCallback};
use crate::models::operation::OperationId;
use crate::slack::{lifecycle, FileUpload};
use crate::state::AppState;
use crate::{AppError, Result};

use super::{bounded, delete_original, report_failure, Outcome};

const MAX_POLL_DELAY: Duration = Duration::from_secs(5);

/// Fetch, upload, and attach the selected container's logs.
///
/// # Errors
///
/// Returns `AppError::Malformed` when no container was selected.
pub async fn handle(callback: &InteractionCallback, state: &AppState) -> Result<Outcome> {
    let container_id = callback.require_selected_value()?;

    match fetch_and_upload(state, container_id).await {
        Ok(file) => Ok(Outcome::Replace(lifecycle::attach_file(
            callback.original_message.clone(),
            file,
        ))),
        Err(err) => {
            report_failure(state, OperationId::LogsContainer, container_id, &err).await;
            delete_original(state, &callback.channel_id, &callback.message_ts).await;
            Ok(Outcome::Failed)
        }
    }
}

async fn fetch_and_upload(
    state: &AppState,
    container_id: &str,
) -> Result<FileRef> {
    let path = bounded(
        state,
        "fetch_logs",
        state.control_plane.fetch_logs(container_id),
    )
    .await?;

    wait_for_artifact(
        &path,
        state.config.artifact_poll_initial(),
        state.config.timeouts.artifact_poll_attempts,
    )
    .await?;

    let upload = FileUpload {
        path,
        title: logs_title(container_id),
        filetype: "text".into(),
        channel: state.config.slack.channel_id.clone(),
    };
    bounded(state, "files.upload", state.chat.upload_file(upload)).await
}

/// Title of the uploaded log file.
#[must_use]
pub fn logs_title(container_id: &str) -> String {
    format!("Logs do container: {container_id}")
}

/// Probe for `path` with exponential backoff, up to `attempts` probes.
///
/// # Errors
///
/// Returns `AppError::Io` if the artifact never appears or cannot be probed.
pub async fn wait_for_artifact(path: &Path, initial: Duration, attempts: u32) -> Result<()> {
    let mut delay = initial;
    for attempt in 1..=attempts {
        if tokio::fs::try_exists(path).await? {
            debug!(path = %path.display(), attempt, "log artifact available");
            return Ok(());
        }
        if attempt < attempts {
            sleep(delay).await;
            delay = (delay * 2).min(MAX_POLL_DELAY);
        }
    }
    Err(AppError::Io(format!(
        "log artifact {} not available after {attempts} probes",
        path.display()
    )))
}
