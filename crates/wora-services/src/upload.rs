//! Upload pipeline: validate, quota-check, convert, then write thumbnail and canonical artifact.

use crate::quota::QuotaTracker;
use crate::storage_errors;
use std::sync::Arc;
use wora_core::models::StoredAsset;
use wora_core::AppError;
use wora_processing::{ImageCodec, UploadValidator};
use wora_storage::{keys, ObjectStore};

/// One image upload as received from a client
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub data: Vec<u8>,
    /// Original client filename; only its base name and extension are used
    pub filename: String,
    /// Logical folder, e.g. `gallery` or `content/news`
    pub folder: String,
    /// Size reported by the client before the body was read
    pub declared_size: u64,
}

pub struct UploadPipeline {
    store: Arc<dyn ObjectStore>,
    quota: Arc<QuotaTracker>,
    codec: ImageCodec,
    validator: UploadValidator,
}

impl UploadPipeline {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        quota: Arc<QuotaTracker>,
        codec: ImageCodec,
        validator: UploadValidator,
    ) -> Self {
        Self {
            store,
            quota,
            codec,
            validator,
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.validator.max_file_size()
    }

    /// Size and quota checks that need no body. Runs first in [`Self::upload`] and
    /// can be called early by transports that learn the size before reading.
    pub async fn admit(&self, declared_size: u64) -> Result<(), AppError> {
        self.validator.validate_declared_size(declared_size)?;
        self.quota.check_before_upload(declared_size).await?;
        Ok(())
    }

    /// Quota check alone, for transports that know the request size before the
    /// file size. Multipart framing counts against the quota here.
    pub async fn check_quota(&self, request_size: u64) -> Result<(), AppError> {
        self.quota.check_before_upload(request_size).await?;
        Ok(())
    }

    /// Store an image and its thumbnail.
    ///
    /// The thumbnail is written before the canonical artifact. If the canonical
    /// write fails the thumbnail stays in the bucket unreferenced; nothing
    /// removes it.
    #[tracing::instrument(
        skip(self, request),
        fields(
            upload.folder = %request.folder,
            upload.filename = %request.filename,
            upload.declared_size = request.declared_size,
        )
    )]
    pub async fn upload(&self, request: UploadRequest) -> Result<StoredAsset, AppError> {
        self.admit(request.declared_size).await?;

        self.validator.validate_filename(&request.filename)?;
        self.validator.validate_body(&request.data)?;
        let folder = keys::normalize_folder(&request.folder)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;

        let (base, extension) = keys::split_extension(&request.filename);
        let base = keys::sanitize_base_name(base);
        let extension = extension.to_string();

        let codec = self.codec;
        let data = request.data;
        let start = std::time::Instant::now();
        let processed = tokio::task::spawn_blocking(move || codec.process(data, &extension))
            .await
            .map_err(|e| AppError::Internal(format!("Image processing task failed: {}", e)))??;

        tracing::debug!(
            source_format = ?processed.source_format,
            resized = processed.resized,
            artifact_bytes = processed.artifact.data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image processed"
        );

        let key = keys::object_key(
            &folder,
            &base,
            &keys::unique_suffix(),
            processed.artifact.extension,
        );

        let thumbnail_url = match processed.thumbnail {
            Some(thumbnail) => {
                let thumbnail_key = keys::derive_thumbnail_key(&key);
                let url = self
                    .store
                    .put_object(&thumbnail_key, thumbnail.data, thumbnail.content_type)
                    .await
                    .map_err(storage_errors::write_error)?;
                Some(url)
            }
            None => None,
        };

        let file_size = processed.artifact.data.len() as i64;
        let file_url = self
            .store
            .put_object(&key, processed.artifact.data, processed.artifact.content_type)
            .await
            .map_err(|e| {
                if thumbnail_url.is_some() {
                    tracing::warn!(
                        key = %key,
                        thumbnail_key = %keys::derive_thumbnail_key(&key),
                        "Canonical upload failed after thumbnail was written; thumbnail left orphaned"
                    );
                }
                storage_errors::write_error(e)
            })?;

        tracing::info!(
            key = %key,
            size_bytes = file_size,
            has_thumbnail = thumbnail_url.is_some(),
            "Image uploaded"
        );

        Ok(StoredAsset {
            success: true,
            file_url,
            thumbnail_url,
            file_size,
            dimensions: processed.dimensions,
        })
    }
}
