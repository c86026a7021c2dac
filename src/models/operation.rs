//! Closed set of operations an interactive menu can be bound to.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::AppError;

/// Control-plane operation selected through an interactive menu.
///
/// The string form is the `callback_id` the menu was posted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationId {
    /// Restart a container.
    RestartContainer,
    /// Fetch a container's logs and upload them as a file.
    LogsContainer,
    /// Describe a service.
    GetServiceInfo,
    /// Turn canary routing on for a load balancer.
    CanaryActivate,
    /// Turn canary routing off for a load balancer.
    CanaryDisable,
    /// Show a load balancer's `haproxy.cfg`.
    CanaryInfo,
}

impl OperationId {
    /// Every operation, in menu order.
    pub const ALL: [Self; 6] = [
        Self::RestartContainer,
        Self::LogsContainer,
        Self::GetServiceInfo,
        Self::CanaryActivate,
        Self::CanaryDisable,
        Self::CanaryInfo,
    ];

    /// Wire identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RestartContainer => "restartContainer",
            Self::LogsContainer => "logsContainer",
            Self::GetServiceInfo => "getServiceInfo",
            Self::CanaryActivate => "canaryActivate",
            Self::CanaryDisable => "canaryDisable",
            Self::CanaryInfo => "canaryInfo",
        }
    }
}

impl Display for OperationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| AppError::UnknownAction(format!("unknown operation id: {s}")))
    }
}
