//! Canary routing handlers for load balancers.

use crate::models::callback::InteractionCallback;
use crate::models::operation::OperationId;
use crate::rancher::OperationResult;
use crate::state::AppState;
use crate::Result;

use super::{bounded, finish, Outcome};

/// Enable canary routing on the selected load balancer.
///
/// # Errors
///
/// Returns `AppError::Malformed` when no load balancer was selected.
pub async fn handle_enable(callback: &InteractionCallback, state: &AppState) -> Result<Outcome> {
    let lb_id = callback.require_selected_value()?;
    let result = bounded(state, "enable_canary", state.control_plane.enable_canary(lb_id))
        .await
        .map(|resp| canary_enabled_text(lb_id, &resp));

    Ok(finish(state, callback, OperationId::CanaryActivate, lb_id, result).await)
}

/// Disable canary routing on the selected load balancer.
///
/// # Errors
///
/// Returns `AppError::Malformed` when no load balancer was selected.
pub async fn handle_disable(callback: &InteractionCallback, state: &AppState) -> Result<Outcome> {
    let lb_id = callback.require_selected_value()?;
    let result = bounded(state, "disable_canary", state.control_plane.disable_canary(lb_id))
        .await
        .map(|resp| canary_disabled_text(lb_id, &resp));

    Ok(finish(state, callback, OperationId::CanaryDisable, lb_id, result).await)
}

/// Show the selected load balancer's `haproxy.cfg`.
///
/// # Errors
///
/// Returns `AppError::Malformed` when no load balancer was selected.
pub async fn handle_info(callback: &InteractionCallback, state: &AppState) -> Result<Outcome> {
    let lb_id = callback.require_selected_value()?;
    let result = bounded(
        state,
        "fetch_canary_config",
        state.control_plane.fetch_canary_config(lb_id),
    )
    .await
    .map(|resp| canary_info_text(lb_id, &resp));

    Ok(finish(state, callback, OperationId::CanaryInfo, lb_id, result).await)
}

/// Notice posted after enabling canary routing.
#[must_use]
pub fn canary_enabled_text(lb_id: &str, resp: &OperationResult) -> String {
    format!(
        "*Canary Deployment* do LB `{lb_id}` ativado.\n```{}```",
        resp.render()
    )
}

/// Notice posted after disabling canary routing.
#[must_use]
pub fn canary_disabled_text(lb_id: &str, resp: &OperationResult) -> String {
    format!(
        "*Canary Deployment* do LB `{lb_id}` desativado.\n```{}```",
        resp.render()
    )
}

/// Load balancer configuration dump.
#[must_use]
pub fn canary_info_text(lb_id: &str, resp: &OperationResult) -> String {
    format!(
        "Arquivo haproxy.cfg do LoadBalancer `{lb_id}`.\n```{}```",
        resp.field("lbConfig.config")
    )
}
