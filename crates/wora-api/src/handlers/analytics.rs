use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;
use wora_core::models::StorageAnalytics;

#[derive(Debug, Serialize)]
pub struct StorageAnalyticsResponse {
    pub success: bool,
    pub data: StorageAnalytics,
}

/// Current bucket usage against the storage limit
#[tracing::instrument(skip(state))]
pub async fn get_storage_analytics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StorageAnalyticsResponse>, HttpAppError> {
    let data = state.quota.analytics().await?;
    Ok(Json(StorageAnalyticsResponse {
        success: true,
        data,
    }))
}
