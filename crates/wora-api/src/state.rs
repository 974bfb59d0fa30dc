//! Application state shared by handlers.

use crate::auth::AuthState;
use std::sync::Arc;
use wora_core::Config;
use wora_services::{AssetCleanup, ObjectStore, QuotaTracker, UploadPipeline};

/// Services built once at startup and handed to every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<AuthState>,
    pub store: Arc<dyn ObjectStore>,
    pub uploads: Arc<UploadPipeline>,
    pub quota: Arc<QuotaTracker>,
    pub cleanup: Arc<AssetCleanup>,
}
