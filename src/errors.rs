//! Error types shared across the application.

use std::fmt::{Display, Formatter};

use axum::http::StatusCode;

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Inbound callback body could not be unwrapped, unescaped, or parsed.
    Decode(String),
    /// Callback verification token did not match the configured secret.
    Unauthorized(String),
    /// HTTP method other than `POST` on the interaction endpoint.
    UnsupportedMethod(String),
    /// Action kind other than `select` or `cancel`.
    UnknownAction(String),
    /// Callback is well-formed JSON but lacks a value a handler requires.
    Malformed(String),
    /// Rancher control-plane call failure.
    ControlPlane(String),
    /// Slack API failure.
    Slack(String),
    /// Outbound call exceeded its configured bound.
    Timeout(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl AppError {
    /// HTTP status returned to the chat platform when a request ends with this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Decode(msg) => write!(f, "decode: {msg}"),
            Self::Unauthorized(msg) => write!(f, "unauthorized: {msg}"),
            Self::UnsupportedMethod(msg) => write!(f, "unsupported method: {msg}"),
            Self::UnknownAction(msg) => write!(f, "unknown action: {msg}"),
            Self::Malformed(msg) => write!(f, "malformed callback: {msg}"),
            Self::ControlPlane(msg) => write!(f, "control plane: {msg}"),
            Self::Slack(msg) => write!(f, "slack: {msg}"),
            Self::Timeout(msg) => write!(f, "timeout: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::ControlPlane(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
