//! Rancher 1.x (`v2-beta`) API client.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use chrono::Utc;
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{ControlPlane, OperationResult};
use crate::{config::RancherConfig, AppError, Result};

/// HTTP client for a single Rancher project.
pub struct RancherClient {
    http: reqwest::Client,
    base_url: String,
    access_key: String,
    secret_key: String,
    log_lines: u32,
    log_dir: PathBuf,
    canary_config: String,
}

impl RancherClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the HTTP client cannot be constructed.
    pub fn new(config: &RancherConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| AppError::Config(format!("failed to init rancher client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_owned(),
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
            log_lines: config.log_lines,
            log_dir: config.log_dir.clone(),
            canary_config: config.canary_config.clone(),
        })
    }

    fn request(&self, method: Method, resource: &str, id: &str) -> RequestBuilder {
        let url = format!("{}/{resource}/{}", self.base_url, urlencoding::encode(id));
        self.http
            .request(method, url)
            .basic_auth(&self.access_key, Some(&self.secret_key))
    }

    async fn send_json(request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ControlPlane(format!(
                "rancher returned {status}: {body}"
            )));
        }
        Ok(response.json::<Value>().await?)
    }

    async fn set_lb_config(&self, lb_id: &str, haproxy_cfg: &str) -> Result<OperationResult> {
        let service =
            Self::send_json(self.request(Method::GET, "loadbalancerservices", lb_id)).await?;

        let mut lb_config = service
            .get("lbConfig")
            .cloned()
            .filter(Value::is_object)
            .unwrap_or_else(|| json!({}));
        lb_config["config"] = Value::String(haproxy_cfg.to_owned());

        let updated = Self::send_json(
            self.request(Method::PUT, "loadbalancerservices", lb_id)
                .json(&json!({ "lbConfig": lb_config })),
        )
        .await?;

        info!(lb_id, canary = !haproxy_cfg.is_empty(), "load balancer config updated");
        Ok(OperationResult::new(updated))
    }

    async fn write_log_artifact(&self, container_id: &str, content: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.log_dir).await?;
        let path = artifact_path(&self.log_dir, container_id);
        tokio::fs::write(&path, content).await?;
        debug!(path = %path.display(), bytes = content.len(), "log artifact written");
        Ok(path)
    }
}

/// File name for a container's log artifact, unique per second.
fn artifact_path(dir: &Path, container_id: &str) -> PathBuf {
    let safe_id: String = container_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let stamp = Utc::now().format("%Y%m%dT%H%M%S");
    dir.join(format!("{safe_id}-{stamp}.log"))
}

impl ControlPlane for RancherClient {
    fn restart_container(
        &self,
        container_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<OperationResult>> + Send + '_>> {
        let request = self
            .request(Method::POST, "containers", container_id)
            .query(&[("action", "restart")]);
        Box::pin(async move { Self::send_json(request).await.map(OperationResult::new) })
    }

    fn fetch_logs(
        &self,
        container_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<PathBuf>> + Send + '_>> {
        let container_id = container_id.to_owned();
        Box::pin(async move {
            let url = format!(
                "{}/containers/{}/logs",
                self.base_url,
                urlencoding::encode(&container_id)
            );
            let response = self
                .http
                .get(url)
                .basic_auth(&self.access_key, Some(&self.secret_key))
                .query(&[("lines", self.log_lines)])
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(AppError::ControlPlane(format!(
                    "rancher returned {status} for container logs"
                )));
            }
            let content = response.text().await?;
            self.write_log_artifact(&container_id, &content).await
        })
    }

    fn fetch_service_info(
        &self,
        service_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<OperationResult>> + Send + '_>> {
        let request = self.request(Method::GET, "services", service_id);
        Box::pin(async move { Self::send_json(request).await.map(OperationResult::new) })
    }

    fn enable_canary(
        &self,
        lb_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<OperationResult>> + Send + '_>> {
        let lb_id = lb_id.to_owned();
        Box::pin(async move { self.set_lb_config(&lb_id, &self.canary_config).await })
    }

    fn disable_canary(
        &self,
        lb_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<OperationResult>> + Send + '_>> {
        let lb_id = lb_id.to_owned();
        Box::pin(async move { self.set_lb_config(&lb_id, "").await })
    }

    fn fetch_canary_config(
        &self,
        lb_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<OperationResult>> + Send + '_>> {
        let request = self.request(Method::GET, "loadbalancerservices", lb_id);
        Box::pin(async move { Self::send_json(request).await.map(OperationResult::new) })
    }
}
