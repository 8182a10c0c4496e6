//! HTTP server and logging settings.

use std::env;

/// Server settings loaded from environment variables.
///
/// # Environment Variables
///
/// - `SERVER_ADDR`: bind address (default: `0.0.0.0:3000`)
/// - `LOG_LEVEL`: default level for the application's own targets (default: `info`)
/// - `LOG_DIR`: directory for rolling log files (default: `storage/logs`)
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: String,
    pub log_level: String,
    pub log_dir: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            addr: env::var("SERVER_ADDR").unwrap_or(defaults.addr),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:3000".into(),
            log_level: "info".into(),
            log_dir: "storage/logs".into(),
        }
    }
}
