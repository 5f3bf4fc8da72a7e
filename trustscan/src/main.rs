//! trustscan - review authenticity audit service
//!
//! Serves the search-then-audit web UI and drives the Generative Language API
//! on the user's behalf.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use trustscan::config::{resolve_log_level, CliOverrides, Settings};
use trustscan::services::{GeminiClient, GenerativeOracle};
use trustscan::{build_router, AppState};
use trustscan_common::config::{load_toml_config, resolve_config_path, TomlConfig};

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "trustscan", version, about = "Review authenticity audit service")]
struct Cli {
    /// Generative Language API key
    #[arg(long)]
    api_key: Option<String>,

    /// HTTP listen address
    #[arg(long)]
    bind: Option<String>,

    /// Config file path
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Model used to find candidate businesses
    #[arg(long)]
    discovery_model: Option<String>,

    /// Model used for the authenticity audit
    #[arg(long)]
    audit_model: Option<String>,

    /// Generative Language API base URL
    #[arg(long)]
    api_base_url: Option<String>,

    /// Default log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            api_key: self.api_key.clone(),
            bind_address: self.bind.clone(),
            api_base_url: self.api_base_url.clone(),
            discovery_model: self.discovery_model.clone(),
            audit_model: self.audit_model.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = resolve_config_path(cli.config.as_deref());
    let toml_config = match &config_path {
        Some(path) => load_toml_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => TomlConfig::default(),
    };

    let overrides = cli.overrides();

    // Initialize tracing subscriber
    let default_level = resolve_log_level(&overrides, &toml_config);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_level)),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting TrustScan v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => warn!("No platform config directory; using command line and environment only"),
    }

    let settings = Settings::resolve(&overrides, &toml_config)?;
    info!(
        discovery_model = %settings.discovery_model,
        audit_model = %settings.audit_model,
        api_base_url = %settings.api_base_url,
        log_level = %settings.log_level,
        "Oracle configuration resolved"
    );

    let client = GeminiClient::new(settings.gemini_config())
        .context("Failed to build Generative Language API client")?;
    let oracle: Arc<dyn GenerativeOracle> = Arc::new(client);

    let state = AppState::with_oracle(
        oracle,
        &settings.discovery_model,
        &settings.audit_model,
        settings.progress_interval,
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_address))?;
    info!("trustscan listening on http://{}", settings.bind_address);
    info!("Health check: http://{}/health", settings.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
