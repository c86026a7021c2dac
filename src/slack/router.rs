//! Action routing: (action kind, operation id) to a handler route.

use tracing::warn;

use crate::models::callback::{ActionKind, InteractionCallback};
use crate::models::operation::OperationId;
use crate::{AppError, Result};

/// Handler selected for a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Run the handler bound to this operation.
    Operation(OperationId),
    /// Replace the controls with a cancellation notice and delete the message.
    Cancel,
    /// Menu selection bound to an operation this bot does not know.
    Ignored {
        /// Raw operation id from the callback.
        operation_id: String,
    },
}

/// Select the route for a callback.
///
/// Unknown operation ids under `select` are not an error: the callback is
/// acknowledged and nothing else happens.
///
/// # Errors
///
/// Returns `AppError::UnknownAction` for an action kind other than
/// `select` or `cancel`.
pub fn route(callback: &InteractionCallback) -> Result<Route> {
    match &callback.action_kind {
        ActionKind::Select => match callback.operation_id.parse::<OperationId>() {
            Ok(operation) => Ok(Route::Operation(operation)),
            Err(_) => {
                warn!(
                    operation_id = %callback.operation_id,
                    "select action bound to unknown operation; ignoring"
                );
                Ok(Route::Ignored {
                    operation_id: callback.operation_id.clone(),
                })
            }
        },
        ActionKind::Cancel => Ok(Route::Cancel),
        ActionKind::Other(name) => Err(AppError::UnknownAction(format!(
            "unsupported action: {name}"
        ))),
    }
}
