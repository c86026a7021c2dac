//! Rancher control-plane abstraction.
//!
//! The [`ControlPlane`] trait decouples the interaction handlers from the
//! concrete Rancher HTTP API so handlers can be exercised against fakes.
//! Results come back as an opaque [`OperationResult`]; handlers read the
//! few dotted paths they display and treat anything missing as empty.

pub mod client;

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use serde_json::Value;

use crate::Result;

/// Opaque JSON payload returned by a control-plane call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationResult(Value);

impl OperationResult {
    /// Wrap a raw JSON document.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Read a dotted path such as `launchConfig.imageUuid`.
    ///
    /// Strings are returned verbatim, other scalars and objects in their
    /// compact JSON form. Absent paths and `null` read as `""`.
    #[must_use]
    pub fn field(&self, path: &str) -> String {
        path.split('.')
            .try_fold(&self.0, |node, key| node.get(key))
            .map(render_value)
            .unwrap_or_default()
    }

    /// Whole payload as display text.
    #[must_use]
    pub fn render(&self) -> String {
        render_value(&self.0)
    }
}

impl From<Value> for OperationResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Operations the bot relays to the container-orchestration control plane.
pub trait ControlPlane: Send + Sync {
    /// Restart a container by ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ControlPlane`](crate::AppError::ControlPlane) if the API call fails.
    fn restart_container(
        &self,
        container_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<OperationResult>> + Send + '_>>;

    /// Fetch a container's recent logs into a local artifact and return its path.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ControlPlane`](crate::AppError::ControlPlane) if the API call fails,
    /// or [`AppError::Io`](crate::AppError::Io) if the artifact cannot be written.
    fn fetch_logs(
        &self,
        container_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<PathBuf>> + Send + '_>>;

    /// Describe a service.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ControlPlane`](crate::AppError::ControlPlane) if the API call fails.
    fn fetch_service_info(
        &self,
        service_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<OperationResult>> + Send + '_>>;

    /// Turn canary routing on for a load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ControlPlane`](crate::AppError::ControlPlane) if the API call fails.
    fn enable_canary(
        &self,
        lb_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<OperationResult>> + Send + '_>>;

    /// Turn canary routing off for a load balancer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ControlPlane`](crate::AppError::ControlPlane) if the API call fails.
    fn disable_canary(
        &self,
        lb_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<OperationResult>> + Send + '_>>;

    /// Read a load balancer's current routing configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ControlPlane`](crate::AppError::ControlPlane) if the API call fails.
    fn fetch_canary_config(
        &self,
        lb_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<OperationResult>> + Send + '_>>;
}
