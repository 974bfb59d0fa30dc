use crate::keys;
use crate::traits::{ObjectStore, ObjectSummary, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use aws_config::retry::{RetryConfig, RetryMode};
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use bytes::Bytes;
use wora_core::StorageConfig;

/// S3-compatible storage implementation (Cloudflare R2, AWS S3, MinIO)
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// Static credentials are used when both `access_key` and `secret_key` are set,
    /// otherwise the default AWS provider chain applies. A custom `endpoint`
    /// switches the client to path-style addressing.
    pub async fn new(config: &StorageConfig) -> StorageResult<Self> {
        if config.bucket.is_empty() {
            return Err(StorageError::ConfigError(
                "R2_BUCKET_NAME not configured".to_string(),
            ));
        }
        if config.public_url.is_empty() {
            return Err(StorageError::ConfigError(
                "R2_PUBLIC_URL not configured".to_string(),
            ));
        }

        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_retry_mode(RetryMode::Standard);

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .retry_config(retry_config)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);

        if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
            let credentials = Credentials::new(access_key, secret_key, None, None, "static");
            builder = builder.credentials_provider(credentials);
        }

        if let Some(ref endpoint) = config.endpoint {
            // Required for R2 and MinIO
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        tracing::info!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = ?config.endpoint,
            "S3 storage initialized"
        );

        Ok(S3Storage {
            client,
            bucket: config.bucket.clone(),
            public_base_url: config.public_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3Storage {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        keys::validate_key(key)?;
        let size = data.len() as u64;
        let body = ByteStream::from(Bytes::from(data));
        let start = std::time::Instant::now();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            content_type = %content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(self.public_url(key))
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        keys::validate_key(key)?;
        let start = std::time::Instant::now();

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                StorageError::DeleteFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn list_objects(&self) -> StorageResult<Vec<ObjectSummary>> {
        let start = std::time::Instant::now();
        let mut objects = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    listed = objects.len(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 list failed"
                );
                StorageError::ListFailed(e.to_string())
            })?;

            for object in page.contents() {
                let Some(key) = object.key() else {
                    continue;
                };
                objects.push(ObjectSummary {
                    key: key.to_string(),
                    size: object.size().unwrap_or(0).max(0) as u64,
                });
            }
        }

        tracing::debug!(
            bucket = %self.bucket,
            object_count = objects.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 list successful"
        );

        Ok(objects)
    }

    fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_config() -> StorageConfig {
        StorageConfig {
            backend: StorageBackend::S3,
            bucket: "yaro-wora-images".to_string(),
            region: "auto".to_string(),
            endpoint: Some("https://account.r2.cloudflarestorage.com".to_string()),
            access_key: Some("key".to_string()),
            secret_key: Some("secret".to_string()),
            public_url: "https://cdn.example.com/".to_string(),
            local_storage_path: None,
        }
    }

    #[tokio::test]
    async fn test_public_url_uses_configured_base() {
        let storage = S3Storage::new(&storage_config()).await.unwrap();

        assert_eq!(storage.bucket(), "yaro-wora-images");
        assert_eq!(storage.backend_type(), StorageBackend::S3);
        assert_eq!(
            storage.public_url("gallery/photo_1a2b3c4d.webp"),
            "https://cdn.example.com/gallery/photo_1a2b3c4d.webp"
        );
    }

    #[tokio::test]
    async fn test_missing_public_url_rejected() {
        let mut config = storage_config();
        config.public_url = String::new();
        let result = S3Storage::new(&config).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }
}
