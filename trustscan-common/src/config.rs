//! Configuration file model and location rules
//!
//! The TOML file is the lowest-priority configuration tier; command line and
//! environment values override it (see `trustscan::config`).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file path
pub const CONFIG_PATH_ENV_VAR: &str = "TRUSTSCAN_CONFIG";

/// Contents of `trustscan/config.toml`
///
/// Every field is optional; absent fields fall through to compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Generative Language API key
    pub api_key: Option<String>,
    /// HTTP listen address, e.g. "127.0.0.1:5731"
    pub bind_address: Option<String>,
    /// Generative Language API base URL (no trailing slash required)
    pub api_base_url: Option<String>,
    /// Model used for candidate discovery
    pub discovery_model: Option<String>,
    /// Model used for the authenticity audit
    pub audit_model: Option<String>,
    /// Progress label advance period in milliseconds
    pub progress_interval_ms: Option<u64>,
    /// Per-request timeout for oracle calls in seconds
    pub request_timeout_secs: Option<u64>,
    /// Logging section
    pub logging: LoggingConfig,
}

/// `[logging]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing level ("trace", "debug", "info", "warn", "error")
    pub level: Option<String>,
}

/// Resolve which config file to read
///
/// Priority order:
/// 1. Command-line argument
/// 2. `TRUSTSCAN_CONFIG` environment variable
/// 3. `<platform config dir>/trustscan/config.toml`
///
/// Returns `None` only when no platform config directory can be determined.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_PATH_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path()
}

/// Platform default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("trustscan").join("config.toml"))
}

/// Load the TOML config file
///
/// A missing file yields the empty default config. A file that exists but
/// cannot be read is an [`Error::Io`]; one that cannot be parsed is an
/// [`Error::Config`].
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        debug!("Config file not found, using defaults: {}", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;

    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded config file: {}", path.display());
    Ok(config)
}
