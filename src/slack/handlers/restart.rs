//! Container restart handler.

use crate::models::callback::InteractionCallback;
use crate::models::operation::OperationId;
use crate::state::AppState;
use crate::Result;

use super::{bounded, finish, Outcome};

/// Restart the selected container and announce who did it.
///
/// # Errors
///
/// Returns `AppError::Malformed` when no container was selected.
pub async fn handle(callback: &InteractionCallback, state: &AppState) -> Result<Outcome> {
    let container_id = callback.require_selected_value()?;
    let result = bounded(
        state,
        "restart_container",
        state.control_plane.restart_container(container_id),
    )
    .await
    .map(|_| restart_text(container_id, &callback.user.name));

    Ok(finish(
        state,
        callback,
        OperationId::RestartContainer,
        container_id,
        result,
    )
    .await)
}

/// Confirmation posted after a restart.
#[must_use]
pub fn restart_text(container_id: &str, user: &str) -> String {
    format!("Container de ID {container_id} restartado por @{user} com sucesso! :sunglasses:\n\n")
}
