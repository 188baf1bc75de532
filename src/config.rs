//! Configuration loading and precedence.
//!
//! Settings are resolved in order: built-in defaults, then the JSON config
//! file (if any), then environment variables, then command-line arguments.
//! Later sources win.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::ServerConfig;
use crate::cli::Args;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSection,
    pub logging: LoggingSection,
}

/// Server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    pub graceful_shutdown: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            graceful_shutdown: true,
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Overlay settings from environment variables.
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("SSH_RELAY_HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }
        if let Ok(port) = std::env::var("SSH_RELAY_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(level) = std::env::var("SSH_RELAY_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Overlay settings from parsed command-line arguments.
    pub fn apply_args(&mut self, args: &Args) {
        let defaults = Args::default();
        if args.host != defaults.host {
            self.server.host = args.host.to_string();
        }
        if args.port != defaults.port {
            self.server.port = args.port;
        }
        if let Some(level) = &args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Resolve the full precedence chain for the given arguments.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.parse::<std::net::IpAddr>().is_err() {
            return Err(ConfigError::InvalidHost(self.server.host.clone()));
        }
        Ok(())
    }

    /// Server settings in the form the API layer consumes.
    pub fn to_server_config(&self) -> ServerConfig {
        let config = ServerConfig::new(self.server.host.clone(), self.server.port);
        if self.server.graceful_shutdown {
            config
        } else {
            config.without_graceful_shutdown()
        }
    }

    /// Tracing filter directive derived from the configured level.
    pub fn log_filter(&self) -> String {
        self.logging.level.clone()
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    Io(std::io::Error),
    /// Config file is not valid JSON.
    Json(serde_json::Error),
    /// Host is not a valid IP address.
    InvalidHost(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "invalid config file: {}", e),
            Self::InvalidHost(host) => write!(f, "invalid host address: '{}'", host),
        }
    }
}

impl std::error::Error for ConfigError {}
