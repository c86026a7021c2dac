//! Interactive attachment callback model.
//!
//! Slack delivers legacy interactive-attachment clicks as a JSON document
//! (`AttachmentActionCallback`). The wire structs below mirror only the keys
//! the bot reads; [`OriginalMessage`] and [`Attachment`] additionally keep
//! every unknown key so the message can be re-emitted to Slack unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{AppError, Result};

/// Action name Slack reports for a menu selection.
pub const ACTION_SELECT: &str = "select";
/// Action name Slack reports for the cancel button.
pub const ACTION_CANCEL: &str = "cancel";

/// Kind of interaction, taken from the first action's `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// User picked an option from an operation menu.
    Select,
    /// User dismissed the request.
    Cancel,
    /// Any other action name; rejected by the router.
    Other(String),
}

impl ActionKind {
    /// Classify a raw action name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            ACTION_SELECT => Self::Select,
            ACTION_CANCEL => Self::Cancel,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// User who clicked the control.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallbackUser {
    /// Slack user ID.
    #[serde(default)]
    pub id: String,
    /// Slack handle, shown in result messages as `@name`.
    #[serde(default)]
    pub name: String,
}

/// Channel reference carried by the callback.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallbackChannel {
    /// Slack channel ID.
    #[serde(default)]
    pub id: String,
    /// Channel name.
    #[serde(default)]
    pub name: String,
}

/// One option of a select menu.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectedOption {
    /// Option value (a container, service, or load balancer ID).
    #[serde(default)]
    pub value: String,
}

/// A button or menu inside an attachment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AttachmentAction {
    /// Action name, `select` or `cancel` for this bot.
    #[serde(default)]
    pub name: String,
    /// Button value, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Options the user picked.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_options: Vec<SelectedOption>,
    /// Remaining action keys (`type`, `text`, `options`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Static title/value field of an attachment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachmentField {
    /// Bold field heading.
    pub title: String,
    /// Field body.
    pub value: String,
    /// Whether Slack may render the field side by side with another.
    #[serde(default)]
    pub short: bool,
}

/// Legacy message attachment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    /// Interactive controls.
    #[serde(default)]
    pub actions: Vec<AttachmentAction>,
    /// Static result fields.
    #[serde(default)]
    pub fields: Vec<AttachmentField>,
    /// Remaining attachment keys (`text`, `color`, `callback_id`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// File reference attached to a message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileRef {
    /// Slack file ID.
    pub id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Slack file type, e.g. `text`.
    #[serde(default)]
    pub filetype: String,
}

/// The message that carried the interactive controls.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OriginalMessage {
    /// Message attachments; the first one holds the controls.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Files shared in the message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileRef>,
    /// Remaining message keys (`text`, `ts`, `bot_id`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Raw callback document as posted by Slack.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CallbackPayload {
    /// Verification token shared between Slack and the bot.
    #[serde(default)]
    pub token: String,
    /// Operation identifier set when the interactive message was posted.
    #[serde(default)]
    pub callback_id: String,
    /// Actions the user triggered; Slack sends exactly one.
    #[serde(default)]
    pub actions: Vec<AttachmentAction>,
    /// Acting user.
    #[serde(default)]
    pub user: CallbackUser,
    /// Channel holding the original message.
    #[serde(default)]
    pub channel: CallbackChannel,
    /// Timestamp of the original message.
    #[serde(default)]
    pub message_ts: String,
    /// Snapshot of the original message.
    #[serde(default)]
    pub original_message: OriginalMessage,
}

/// A decoded, authenticated interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionCallback {
    /// Verification token the callback carried.
    pub verification_token: String,
    /// Interaction kind.
    pub action_kind: ActionKind,
    /// Operation identifier; meaningful only for [`ActionKind::Select`].
    pub operation_id: String,
    /// First selected option value, when the action was a menu selection.
    pub selected_value: Option<String>,
    /// Acting user.
    pub user: CallbackUser,
    /// Channel of the original message.
    pub channel_id: String,
    /// Timestamp of the original message.
    pub message_ts: String,
    /// Snapshot of the original message.
    pub original_message: OriginalMessage,
}

impl InteractionCallback {
    /// Selected option value, required by every operation handler.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Malformed` when the callback carries no selection.
    pub fn require_selected_value(&self) -> Result<&str> {
        self.selected_value
            .as_deref()
            .ok_or_else(|| AppError::Malformed("callback has no selected option".into()))
    }
}

impl TryFrom<CallbackPayload> for InteractionCallback {
    type Error = AppError;

    fn try_from(payload: CallbackPayload) -> Result<Self> {
        let action = payload
            .actions
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Malformed("callback has no actions".into()))?;

        let selected_value = action
            .selected_options
            .into_iter()
            .next()
            .map(|option| option.value);

        Ok(Self {
            verification_token: payload.token,
            action_kind: ActionKind::from_name(&action.name),
            operation_id: payload.callback_id,
            selected_value,
            user: payload.user,
            channel_id: payload.channel.id,
            message_ts: payload.message_ts,
            original_message: payload.original_message,
        })
    }
}
