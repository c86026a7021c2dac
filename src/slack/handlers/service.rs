//! Service description handler.

use crate::models::callback::InteractionCallback;
use crate::models::operation::OperationId;
use crate::rancher::OperationResult;
use crate::state::AppState;
use crate::Result;

use super::{bounded, finish, Outcome};

/// Describe the selected service in the bot channel.
///
/// # Errors
///
/// Returns `AppError::Malformed` when no service was selected.
pub async fn handle(callback: &InteractionCallback, state: &AppState) -> Result<Outcome> {
    let service_id = callback.require_selected_value()?;
    let result = bounded(
        state,
        "fetch_service_info",
        state.control_plane.fetch_service_info(service_id),
    )
    .await
    .map(|info| service_info_text(&info));

    Ok(finish(state, callback, OperationId::GetServiceInfo, service_id, result).await)
}

/// Five-line summary of a Rancher service.
#[must_use]
pub fn service_info_text(info: &OperationResult) -> String {
    format!(
        "*ID:* `{}`\n*Nome:* `{}`\n*Imagem:* `{}`\n*Status:* `{}`\n*Data de Criação:* `{}`",
        info.field("id"),
        info.field("name"),
        info.field("launchConfig.imageUuid"),
        info.field("state"),
        info.field("created"),
    )
}
