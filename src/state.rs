//! Shared application state injected into every request.

use std::sync::Arc;

use crate::config::GlobalConfig;
use crate::rancher::ControlPlane;
use crate::slack::ChatClient;

/// Long-lived collaborators shared by all interaction handlers.
///
/// Built once at startup; handlers only borrow it.
pub struct AppState {
    /// Global configuration.
    pub config: Arc<GlobalConfig>,
    /// Slack conversation operations.
    pub chat: Arc<dyn ChatClient>,
    /// Rancher control-plane operations.
    pub control_plane: Arc<dyn ControlPlane>,
}
