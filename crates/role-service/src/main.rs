//! Role Service - resume role prediction over HTTP
//!
//! Loads the trained artifacts once at startup and serves health and
//! predict requests until interrupted.

use anyhow::{Context, Result};
use role_core::{
    artifacts::resolve_artifacts_dir, ArtifactStore, ServiceMetrics, StructuredLogger,
};
use role_service::{api, LogFormat, ServiceConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_NAME: &str = "role-service";
const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::load()?;
    init_tracing(config.log_format);

    info!(
        port = config.port,
        fallback_policy = ?config.fallback_policy,
        "Service configured"
    );

    let artifacts_dir = resolve_artifacts_dir(config.artifacts_dir.as_deref());
    let logger = StructuredLogger::new(SERVICE_NAME);
    logger.log_startup(SERVICE_VERSION, &artifacts_dir);

    // A corrupt artifact aborts startup instead of silently degrading
    let artifacts = ArtifactStore::new(&artifacts_dir)
        .load()
        .with_context(|| format!("Failed to load artifacts from {}", artifacts_dir.display()))?;
    logger.log_artifacts(&artifacts);

    let metrics = ServiceMetrics::new();
    metrics.set_artifacts(&artifacts);

    let app_state = Arc::new(api::AppState::new(
        Arc::new(artifacts),
        artifacts_dir,
        config.fallback_policy,
        metrics,
        logger.clone(),
    ));

    api::serve(&config.bind_addr(), app_state).await?;

    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    Ok(())
}

/// Initialize tracing with an env filter and the configured output format
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init(),
    }
}
