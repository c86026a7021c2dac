//! Original-message rewrites returned to Slack in the HTTP response.
//!
//! Slack replaces the clicked message with whatever JSON message the
//! callback response carries. Two end states are produced here: a
//! "responded" message whose controls are gone and whose first attachment
//! shows a single static field, and a "file attached" message whose
//! attachments are cleared in favour of an uploaded file.

use crate::models::callback::{AttachmentField, FileRef, OriginalMessage};
use crate::{AppError, Result};

/// Strip the controls from the first attachment and show `title`/`value` instead.
///
/// Applying the rewrite twice with the same arguments yields the same message.
///
/// # Errors
///
/// Returns `AppError::Malformed` if the message has no attachments.
pub fn respond_with_field(
    mut original: OriginalMessage,
    title: &str,
    value: &str,
) -> Result<OriginalMessage> {
    let first = original
        .attachments
        .first_mut()
        .ok_or_else(|| AppError::Malformed("original message has no attachments".into()))?;

    first.actions.clear();
    first.fields = vec![AttachmentField {
        title: title.to_owned(),
        value: value.to_owned(),
        short: false,
    }];

    Ok(original)
}

/// Replace every attachment with a single file reference.
#[must_use]
pub fn attach_file(mut original: OriginalMessage, file: FileRef) -> OriginalMessage {
    original.attachments.clear();
    original.files = vec![file];
    original
}
