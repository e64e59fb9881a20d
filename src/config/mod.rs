// Configuration module entry point
// Loads layered configuration and holds per-process runtime state

mod state;
mod types;

use crate::cli::Cli;
use config::ConfigError;
use std::net::{SocketAddr, ToSocketAddrs};

// Re-export public types
pub use state::AppState;
pub use types::{
    ComboConfig, Config, LoggingConfig, PerformanceConfig, ServerConfig, DEFAULT_ADDR,
    DEFAULT_LOG_LEVEL, DEFAULT_MAX_FILES, DEFAULT_SEPARATOR, DEFAULT_TIMEOUT_SECS,
    DEFAULT_URL_PATH,
};

/// Default config file name (without extension), optional
const DEFAULT_CONFIG_FILE: &str = "comboserver";

/// Environment variable prefix
const ENV_PREFIX: &str = "COMBO";

impl Config {
    /// Load configuration: defaults, config file, `COMBO_*` environment, then CLI flags
    ///
    /// An explicit `--config` file must exist; the default `comboserver.*` file is
    /// optional.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        Self::load_with_env(cli, None)
    }

    /// Like [`Config::load`], reading `COMBO_*` variables from `env` instead
    /// of the process environment when given
    pub fn load_with_env(
        cli: &Cli,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let file = match cli.config.as_deref() {
            Some(path) => config::File::with_name(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .set_default("server.addr", DEFAULT_ADDR)?
            .set_default("combo.url_path", DEFAULT_URL_PATH)?
            .set_default("combo.separator", DEFAULT_SEPARATOR)?
            .set_default("combo.max_files", DEFAULT_MAX_FILES as u64)?
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", DEFAULT_TIMEOUT_SECS)?
            .set_default("performance.write_timeout", DEFAULT_TIMEOUT_SECS)?
            .add_source(file)
            .add_source(environment().source(env))
            .set_override_option("server.addr", cli.addr.clone())?
            .set_override_option("server.workers", cli.workers)?
            .set_override_option(
                "combo.root",
                cli.directory
                    .as_ref()
                    .map(|dir| dir.to_string_lossy().into_owned()),
            )?
            .set_override_option("combo.url_path", cli.url_path.clone())?
            .set_override_option("combo.separator", cli.separator.clone())?
            .set_override_option("combo.max_files", cli.max_files)?
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the request pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.combo.root.is_dir() {
            return Err(ConfigError::Message(format!(
                "combo.root is not a directory: {}",
                self.combo.root.display()
            )));
        }
        if self.combo.separator.is_empty() {
            return Err(ConfigError::Message(
                "combo.separator must not be empty".to_string(),
            ));
        }
        if self.combo.max_files == 0 {
            return Err(ConfigError::Message(
                "combo.max_files must be at least 1".to_string(),
            ));
        }
        if self.server.workers == Some(0) {
            return Err(ConfigError::Message(
                "server.workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the listen address
    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        self.server
            .addr
            .to_socket_addrs()
            .map_err(|e| format!("Invalid address '{}': {e}", self.server.addr))?
            .next()
            .ok_or_else(|| format!("Address '{}' resolved to nothing", self.server.addr))
    }
}

/// `COMBO_` prefix, `__` between section and key: `COMBO_COMBO__MAX_FILES`
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
