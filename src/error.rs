//! Startup errors
//!
//! Request handling never fails outward; only bringing the server up can.

use std::net::AddrParseError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to load configuration")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address '{addr}'")]
    InvalidAddress {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("serving root '{}' is not accessible", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serving root '{}' is not a directory", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("failed to bind {addr}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to initialize logging: {0}")]
    Logging(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
