//! Wayfarer - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the travel agent API.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wayfarer::{api, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfarer=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    info!(
        "Loaded configuration: provider={} model={}",
        config.provider.as_str(),
        config.model_name
    );

    // Start HTTP server
    api::serve(config).await?;

    Ok(())
}
