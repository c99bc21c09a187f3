// Configuration module entry point
// Loads configuration from file, environment and command line

mod state;
mod types;

use std::net::{IpAddr, SocketAddr};

use crate::cli::Cli;
use crate::error::ServerError;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServeConfig, ServerConfig};

/// Environment variable prefix, e.g. `RANGE_SERVER__SERVER__PORT=9000`
const ENV_PREFIX: &str = "RANGE_SERVER";

impl Config {
    /// Load configuration from specified file path (extension optional)
    /// A missing file is not an error; defaults apply.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let settings = config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", 8000)?
            .set_default("serve.root", defaults.serve.root.to_string_lossy().into_owned())?
            .set_default("serve.index_files", defaults.serve.index_files)?
            .set_default("serve.directory_listing", defaults.serve.directory_listing)?
            .set_default("http.cors_allow_origin", defaults.http.cors_allow_origin)?
            .set_default("http.server_name", defaults.http.server_name)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.access_log", defaults.logging.access_log)?
            .set_default("logging.access_log_format", defaults.logging.access_log_format)?
            .set_default("logging.show_headers", defaults.logging.show_headers)?
            .set_default("performance.keep_alive", defaults.performance.keep_alive)?
            .set_default("performance.header_read_timeout", 30)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration and apply command line overrides on top
    pub fn load(cli: &Cli) -> Result<Self, ServerError> {
        let mut cfg = Self::load_from(&cli.config)?;
        cfg.apply_cli(cli);
        Ok(cfg)
    }

    /// Command line flags win over file and environment
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(ref bind) = cli.bind {
            self.server.host.clone_from(bind);
        }
        if let Some(ref directory) = cli.directory {
            self.serve.root.clone_from(directory);
        }
    }

    /// Accepts bare IPv4 and IPv6 hosts, e.g. `0.0.0.0` or `::`
    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|source| ServerError::InvalidAddress {
                addr: self.server.host.clone(),
                source,
            })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}
