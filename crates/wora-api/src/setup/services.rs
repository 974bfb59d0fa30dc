//! Service initialization and application state setup

use crate::auth::AuthState;
use crate::state::AppState;
use std::sync::Arc;
use wora_core::Config;
use wora_services::{
    AssetCleanup, ImageCodec, ObjectStore, QuotaTracker, UploadPipeline, UploadValidator,
};

/// Wire the quota tracker, upload pipeline and cleanup around one object store
pub fn initialize_services(config: Config, store: Arc<dyn ObjectStore>) -> Arc<AppState> {
    let quota = Arc::new(QuotaTracker::from_store(
        store.clone(),
        config.storage_limit_bytes(),
    ));

    let uploads = Arc::new(UploadPipeline::new(
        store.clone(),
        quota.clone(),
        ImageCodec::new(config.max_image_dimension()),
        UploadValidator::new(config.max_file_size_bytes()),
    ));

    let cleanup = Arc::new(AssetCleanup::new(store.clone()));
    let auth = Arc::new(AuthState::from_config(&config));

    tracing::info!(
        storage_limit_bytes = config.storage_limit_bytes(),
        max_file_size_bytes = config.max_file_size_bytes(),
        max_image_dimension = config.max_image_dimension(),
        "Services initialized"
    );

    Arc::new(AppState {
        config: Arc::new(config),
        auth,
        store,
        uploads,
        quota,
        cleanup,
    })
}
