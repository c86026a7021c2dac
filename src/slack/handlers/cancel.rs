//! Cancellation of a pending request.

use crate::models::callback::{InteractionCallback, OriginalMessage};
use crate::slack::lifecycle;
use crate::Result;

/// Replace the controls of the original message with a cancellation notice.
///
/// The caller answers with the returned message and deletes the original
/// once the response has been produced.
///
/// # Errors
///
/// Returns `AppError::Malformed` if the original message has no attachments.
pub fn handle(callback: &InteractionCallback) -> Result<OriginalMessage> {
    lifecycle::respond_with_field(
        callback.original_message.clone(),
        &cancel_title(&callback.user.name),
        "",
    )
}

/// Field title shown after a user cancels.
#[must_use]
pub fn cancel_title(user: &str) -> String {
    format!(":x: @{user} cancelou a requisição")
}
