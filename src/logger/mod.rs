//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Subscriber setup (stdout or file)
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use crate::error::ServerError;
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`. When `logging.file` is
/// set, the returned guard must be held until exit so buffered lines are
/// flushed.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>, ServerError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ServerError::Logging(e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.file.as_deref() {
        Some(path) => {
            let directory = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| ServerError::Logging(format!("invalid log file '{}'", path.display())))?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| ServerError::Logging(e.to_string()))?;
            Ok(Some(guard))
        }
        None => {
            builder
                .try_init()
                .map_err(|e| ServerError::Logging(e.to_string()))?;
            Ok(None)
        }
    }
}

pub fn log_server_start(addr: &SocketAddr, root: &Path, config: &Config) {
    tracing::info!("======================================");
    tracing::info!("Static file server with Range support started");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Serving root: {}", root.display());
    tracing::info!("Log level: {}", config.logging.level);
    if let Some(max) = config.performance.max_connections {
        tracing::info!("Max connections: {max}");
    }
    tracing::info!("Range requests: enabled (single byte range)");
    tracing::info!("======================================");
}

pub fn log_shutdown(active_connections: usize) {
    tracing::info!(active_connections, "Shutdown requested, no longer accepting connections");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(%peer_addr, "Connection accepted");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    tracing::debug!(%method, %uri, ?version, "Request");
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        tracing::info!("[Headers] Count: {count}");
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}
