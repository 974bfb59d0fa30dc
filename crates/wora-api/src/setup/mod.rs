//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use wora_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())?;

    tracing::info!(
        environment = %config.environment(),
        api_version = %config.api_version(),
        "Configuration loaded and validated successfully"
    );

    let store = storage::setup_storage(&config).await?;

    let state = services::initialize_services(config, store);

    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}
