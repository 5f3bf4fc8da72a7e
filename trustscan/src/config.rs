//! Configuration resolution for trustscan
//!
//! Provides multi-tier configuration resolution with CLI → ENV → TOML →
//! default priority.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::{info, warn};
use trustscan_common::config::TomlConfig;
use trustscan_common::{Error, Result};

use crate::services::authenticity_auditor::DEFAULT_AUDIT_MODEL;
use crate::services::candidate_finder::DEFAULT_DISCOVERY_MODEL;
use crate::services::gemini_client::DEFAULT_BASE_URL;
use crate::services::GeminiConfig;
use crate::workflow::DEFAULT_PROGRESS_INTERVAL;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5731";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Primary API key variable
pub const API_KEY_ENV_VAR: &str = "TRUSTSCAN_API_KEY";
/// Fallback API key variable shared with other Gemini tooling
pub const GEMINI_API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Values given on the command line (highest priority)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_key: Option<String>,
    pub bind_address: Option<String>,
    pub api_base_url: Option<String>,
    pub discovery_model: Option<String>,
    pub audit_model: Option<String>,
    pub log_level: Option<String>,
}

/// Fully resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// `None` when no tier supplied a usable key
    pub api_key: Option<String>,
    pub bind_address: SocketAddr,
    pub api_base_url: String,
    pub discovery_model: String,
    pub audit_model: String,
    pub progress_interval: Duration,
    pub request_timeout: Duration,
    pub log_level: String,
}

impl Settings {
    /// Merge command line, environment and TOML values over the defaults
    ///
    /// Fails only on an unparseable bind address. A missing API key is
    /// reported with a warning and left as `None`.
    pub fn resolve(cli: &CliOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let api_key = resolve_api_key(cli.api_key.as_deref(), toml_config);
        if api_key.is_none() {
            warn!(
                "Gemini API key not configured; searches and audits will fail. Configure using one of:\n\
                 1. Command line: --api-key your-key-here\n\
                 2. Environment: {}=your-key-here (or {})\n\
                 3. TOML config: api_key = \"your-key\"",
                API_KEY_ENV_VAR, GEMINI_API_KEY_ENV_VAR
            );
        }

        let bind = first_of(&cli.bind_address, &toml_config.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address: SocketAddr = bind
            .parse()
            .map_err(|e| Error::Config(format!("Invalid bind address '{}': {}", bind, e)))?;

        let progress_interval = toml_config
            .progress_interval_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_PROGRESS_INTERVAL);

        let request_timeout = toml_config
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Ok(Self {
            api_key,
            bind_address,
            api_base_url: first_of(&cli.api_base_url, &toml_config.api_base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            discovery_model: first_of(&cli.discovery_model, &toml_config.discovery_model)
                .unwrap_or_else(|| DEFAULT_DISCOVERY_MODEL.to_string()),
            audit_model: first_of(&cli.audit_model, &toml_config.audit_model)
                .unwrap_or_else(|| DEFAULT_AUDIT_MODEL.to_string()),
            progress_interval,
            request_timeout,
            log_level: resolve_log_level(cli, toml_config),
        })
    }

    /// Oracle client settings
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key.clone(),
            base_url: self.api_base_url.clone(),
            timeout: self.request_timeout,
        }
    }
}

/// Resolve the Gemini API key
///
/// **Priority:** CLI → `TRUSTSCAN_API_KEY` → `GEMINI_API_KEY` → TOML
pub fn resolve_api_key(cli_key: Option<&str>, toml_config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(API_KEY_ENV_VAR).ok();
    let gemini_env_key = std::env::var(GEMINI_API_KEY_ENV_VAR).ok();

    let tiers: [(&str, Option<&str>); 4] = [
        ("command line", cli_key),
        (API_KEY_ENV_VAR, env_key.as_deref()),
        (GEMINI_API_KEY_ENV_VAR, gemini_env_key.as_deref()),
        ("TOML", toml_config.api_key.as_deref()),
    ];

    let sources: Vec<&str> = tiers
        .iter()
        .filter(|(_, key)| key.is_some_and(is_valid_key))
        .map(|(source, _)| *source)
        .collect();

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "Gemini API key found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    let (source, key) = tiers
        .into_iter()
        .find_map(|(source, key)| key.filter(|k| is_valid_key(k)).map(|k| (source, k)))?;

    info!("Gemini API key loaded from {}", source);
    Some(key.trim().to_string())
}

/// Default tracing filter when `RUST_LOG` is unset
///
/// **Priority:** CLI → TOML `[logging] level` → `info`
pub fn resolve_log_level(cli: &CliOverrides, toml_config: &TomlConfig) -> String {
    first_of(&cli.log_level, &toml_config.logging.level)
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

fn first_of(cli: &Option<String>, toml_value: &Option<String>) -> Option<String> {
    cli.iter()
        .chain(toml_value.iter())
        .find(|v| !v.trim().is_empty())
        .map(|v| v.trim().to_string())
}
