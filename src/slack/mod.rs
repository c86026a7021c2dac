//! Slack bridge layer modules.
//!
//! [`ChatClient`] is the capability surface the interaction handlers use to
//! change the conversation. [`client::SlackService`] implements it over the
//! Slack Web API; tests substitute recording fakes.

pub mod client;
pub mod decoder;
pub mod events;
pub mod handlers;
pub mod lifecycle;
pub mod router;

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::models::callback::FileRef;
use crate::Result;

/// Attachment colour for operation results.
pub const RESULT_COLOR: &str = "#0C648A";
/// Attachment colour for surfaced failures.
pub const ERROR_COLOR: &str = "#D50200";

/// Single-attachment message posted by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAttachment {
    /// Markdown body.
    pub text: String,
    /// Sidebar colour.
    pub color: String,
}

impl ChatAttachment {
    /// Attachment reporting a successful operation.
    pub fn result(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: RESULT_COLOR.into(),
        }
    }

    /// Attachment reporting a failed operation.
    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: ERROR_COLOR.into(),
        }
    }
}

/// Parameters for sharing a local file into a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Local artifact path.
    pub path: PathBuf,
    /// Display title.
    pub title: String,
    /// Slack file type.
    pub filetype: String,
    /// Destination channel.
    pub channel: String,
}

/// Conversation operations required by the interaction handlers.
pub trait ChatClient: Send + Sync {
    /// Post a new single-attachment message.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) if the API call fails.
    fn post_message(
        &self,
        channel: &str,
        attachment: ChatAttachment,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Delete a message by channel and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) if the API call fails.
    fn delete_message(
        &self,
        channel: &str,
        ts: &str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Upload a local file and return the resulting file reference.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`](crate::AppError::Io) if the file cannot be read, or
    /// [`AppError::Slack`](crate::AppError::Slack) if the upload fails.
    fn upload_file(
        &self,
        upload: FileUpload,
    ) -> Pin<Box<dyn Future<Output = Result<FileRef>> + Send + '_>>;
}
