//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::{AppError, Result};

const KEYRING_SERVICE: &str = "rancher-chatops";

/// HTTP listener settings for the interaction endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct HttpConfig {
    /// TCP port for the interaction endpoint.
    #[serde(default = "default_http_port")]
    pub port: u16,
    /// Interface address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Route path that receives Slack interaction callbacks.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: default_http_port(),
            bind: default_bind(),
            path: default_path(),
        }
    }
}

fn default_http_port() -> u16 {
    8080
}

fn default_bind() -> String {
    "0.0.0.0".into()
}

fn default_path() -> String {
    "/".into()
}

/// Slack settings.
///
/// Tokens are loaded at runtime via OS keychain or environment variables,
/// not from the TOML config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SlackConfig {
    /// Channel where operation results and log uploads are posted.
    pub channel_id: String,
    /// Bot user identity.
    #[serde(default)]
    pub bot_id: String,
    /// Bot user token used for posting messages (populated at runtime).
    #[serde(skip)]
    pub bot_token: String,
    /// Shared secret every interaction callback must carry (populated at runtime).
    #[serde(skip)]
    pub verification_token: String,
}

/// Rancher control-plane settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct RancherConfig {
    /// Project-scoped API base, e.g. `https://rancher/v2-beta/projects/1a5`.
    pub url: String,
    /// Number of trailing log lines fetched per container.
    #[serde(default = "default_log_lines")]
    pub log_lines: u32,
    /// Directory where fetched log artifacts are written.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// `haproxy.cfg` snippet installed on a load balancer when canary is enabled.
    #[serde(default)]
    pub canary_config: String,
    /// API access key (populated at runtime).
    #[serde(skip)]
    pub access_key: String,
    /// API secret key (populated at runtime).
    #[serde(skip)]
    pub secret_key: String,
}

fn default_log_lines() -> u32 {
    500
}

fn default_log_dir() -> PathBuf {
    env::temp_dir().join("rancher-chatops")
}

/// Bounds for outbound calls and artifact polling.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TimeoutConfig {
    /// Upper bound for each control-plane or Slack call.
    #[serde(default = "default_call_seconds")]
    pub call_seconds: u64,
    /// First delay between log artifact availability probes; doubles per probe.
    #[serde(default = "default_artifact_poll_initial_ms")]
    pub artifact_poll_initial_ms: u64,
    /// Maximum number of log artifact availability probes.
    #[serde(default = "default_artifact_poll_attempts")]
    pub artifact_poll_attempts: u32,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            call_seconds: default_call_seconds(),
            artifact_poll_initial_ms: default_artifact_poll_initial_ms(),
            artifact_poll_attempts: default_artifact_poll_attempts(),
        }
    }
}

fn default_call_seconds() -> u64 {
    30
}

fn default_artifact_poll_initial_ms() -> u64 {
    250
}

fn default_artifact_poll_attempts() -> u32 {
    8
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Interaction endpoint listener.
    #[serde(default)]
    pub http: HttpConfig,
    /// Slack connectivity settings.
    pub slack: SlackConfig,
    /// Rancher API settings.
    pub rancher: RancherConfig,
    /// Outbound call bounds.
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load Slack and Rancher secrets from OS keychain with env-var fallback.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if neither keychain nor env vars provide
    /// a required secret.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.slack.bot_token = load_credential("slack_bot_token", "SLACK_BOT_TOKEN").await?;
        self.slack.verification_token =
            load_credential("slack_verification_token", "SLACK_VERIFICATION_TOKEN").await?;
        self.rancher.access_key =
            load_credential("rancher_access_key", "RANCHER_ACCESS_KEY").await?;
        self.rancher.secret_key =
            load_credential("rancher_secret_key", "RANCHER_SECRET_KEY").await?;
        Ok(())
    }

    /// Bound applied to every outbound call.
    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.call_seconds)
    }

    /// First backoff step of the log artifact poll.
    #[must_use]
    pub fn artifact_poll_initial(&self) -> Duration {
        Duration::from_millis(self.timeouts.artifact_poll_initial_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.slack.channel_id.trim().is_empty() {
            return Err(AppError::Config("slack.channel_id must not be empty".into()));
        }

        reqwest::Url::parse(&self.rancher.url)
            .map_err(|err| AppError::Config(format!("rancher.url invalid: {err}")))?;

        if !self.http.path.starts_with('/') {
            return Err(AppError::Config("http.path must start with '/'".into()));
        }

        if self.http.path == "/health" {
            return Err(AppError::Config(
                "http.path must not shadow the /health probe".into(),
            ));
        }

        if self.timeouts.call_seconds == 0 {
            return Err(AppError::Config(
                "timeouts.call_seconds must be greater than zero".into(),
            ));
        }

        if self.timeouts.artifact_poll_attempts == 0 {
            return Err(AppError::Config(
                "timeouts.artifact_poll_attempts must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<String> {
    let key = keyring_key.to_owned();

    // keyring is synchronous I/O.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    env::var(env_key).map_err(|_| {
        AppError::Config(format!(
            "credential {keyring_key} not found in keychain or {env_key} env var"
        ))
    })
}
