//! Storage setup and initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use wora_core::Config;
use wora_services::{create_storage, ObjectStore};

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn ObjectStore>> {
    tracing::info!(backend = %config.storage.backend, "Initializing object store");

    let store = create_storage(&config.storage)
        .await
        .context("Failed to initialize object store")?;

    tracing::info!(
        backend = %store.backend_type(),
        public_url = %store.public_base_url(),
        "Object store initialized"
    );
    Ok(store)
}
