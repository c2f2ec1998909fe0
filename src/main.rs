//! # Market Info Storage
//!
//! Main entry point for the market info storage service.

use market_info_storage::app::AppContext;
use market_info_storage::config::{AppConfig, LogFormat};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config);

    info!(
        environment = ?config.environment,
        "Starting market info storage v{}",
        env!("CARGO_PKG_VERSION")
    );

    let context = AppContext::connect(config).await?;
    context.serve().await?;

    Ok(())
}

/// Installs the global subscriber; `RUST_LOG` overrides the configured level.
fn init_tracing(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}
