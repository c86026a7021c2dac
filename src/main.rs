#![forbid(unsafe_code)]

//! `rancher-chatops`: Slack interaction relay for Rancher operations.
//!
//! Bootstraps configuration and credentials, builds the shared Slack and
//! Rancher clients, and serves the interaction endpoint until shutdown.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use rancher_chatops::config::GlobalConfig;
use rancher_chatops::rancher::client::RancherClient;
use rancher_chatops::server;
use rancher_chatops::slack::client::SlackService;
use rancher_chatops::state::AppState;
use rancher_chatops::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "rancher-chatops", about = "Slack interaction relay for Rancher", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("rancher-chatops bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = GlobalConfig::load_from_path(&args.config)?;
    config.load_credentials().await?;
    let config = Arc::new(config);
    info!("configuration loaded");

    // ── Build shared clients ────────────────────────────
    let slack = SlackService::new(&config.slack).map_err(|err| {
        error!(%err, "slack service start failed");
        err
    })?;
    let rancher = RancherClient::new(&config.rancher)?;

    let state = Arc::new(AppState {
        config: Arc::clone(&config),
        chat: Arc::new(slack),
        control_plane: Arc::new(rancher),
    });

    // ── Start HTTP transport ────────────────────────────
    let addr = format!("{}:{}", config.http.bind, config.http.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|err| AppError::Config(format!("failed to bind {addr}: {err}")))?;

    let ct = CancellationToken::new();
    let server_ct = ct.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(err) = server::serve(listener, state, server_ct).await {
            error!(%err, "http transport failed");
        }
    });

    // ── Wait for shutdown signal ────────────────────────
    shutdown_signal().await;
    info!("shutdown signal received");
    ct.cancel();

    if let Err(err) = server_handle.await {
        error!(%err, "http transport task panicked");
    }
    info!("rancher-chatops shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
