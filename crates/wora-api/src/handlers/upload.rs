use crate::auth::AdminIdentity;
use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::extract_multipart_upload;
use axum::{
    extract::{Multipart, State},
    http::{header::CONTENT_LENGTH, HeaderMap},
    response::Json,
};
use std::sync::Arc;
use wora_core::models::StoredAsset;
use wora_services::UploadRequest;

/// Upload an image
///
/// Accepts a multipart form with a `file` field and an optional `folder`
/// (default `uploads`). Raster images are converted to WebP where applicable
/// and stored with a thumbnail; SVGs are stored as sent.
///
/// The quota is checked against `Content-Length` before the body is read, so a
/// full bucket rejects the request without receiving the file. Without the
/// header only an already-full bucket is caught at this point.
///
/// # Errors
/// - `FileTooLarge` - body exceeds the configured maximum
/// - `QuotaExceeded` - the bucket would pass its storage limit
/// - `Decode` - the file is not a supported image
/// - `StorageWrite` - the object store rejected a write
#[tracing::instrument(
    skip(state, headers, multipart),
    fields(admin = %admin.username, operation = "upload_content")
)]
pub async fn upload_content(
    State(state): State<Arc<AppState>>,
    admin: AdminIdentity,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<StoredAsset>, HttpAppError> {
    let content_length = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);
    state.uploads.check_quota(content_length).await?;

    let max_file_size = state.uploads.max_file_size();
    let upload = extract_multipart_upload(multipart, max_file_size).await?;

    let asset = state
        .uploads
        .upload(UploadRequest {
            declared_size: upload.data.len() as u64,
            data: upload.data,
            filename: upload.filename,
            folder: upload.folder,
        })
        .await?;

    Ok(Json(asset))
}
