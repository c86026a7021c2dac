#![forbid(unsafe_code)]

pub mod config;
pub mod errors;
pub mod models;
pub mod rancher;
pub mod server;
pub mod slack;
pub mod state;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
