// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "localhost:8080";
pub const DEFAULT_URL_PATH: &str = "/";
pub const DEFAULT_SEPARATOR: &str = "&";
pub const DEFAULT_MAX_FILES: usize = 50;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub combo: ComboConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Listen address, `host:port`
    pub addr: String,
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            workers: None,
        }
    }
}

/// Combined file serving configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ComboConfig {
    /// Directory files are served from
    pub root: PathBuf,
    /// Exact URL path combo requests must use, unrestricted if empty
    pub url_path: String,
    /// Separator between file names in the query string
    pub separator: String,
    /// Maximum number of files in one request
    pub max_files: usize,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            url_path: DEFAULT_URL_PATH.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            access_log: true,
            access_log_format: default_access_log_format(),
            access_log_file: None,
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive: true,
            read_timeout: DEFAULT_TIMEOUT_SECS,
            write_timeout: DEFAULT_TIMEOUT_SECS,
            max_connections: None,
        }
    }
}
