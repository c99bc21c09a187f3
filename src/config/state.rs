// Application state module
// Shared, read-only state handed to every connection

use std::sync::atomic::AtomicUsize;

use super::types::Config;
use crate::error::ServerError;
use crate::handler::DirectoryServer;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Static file collaborator bound to the canonical serving root
    pub files: DirectoryServer,
    /// Currently open client connections
    pub active_connections: AtomicUsize,
}

impl AppState {
    /// Build state from configuration, canonicalizing the serving root.
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let files = DirectoryServer::from_config(&config)?;
        Ok(Self {
            config,
            files,
            active_connections: AtomicUsize::new(0),
        })
    }
}
