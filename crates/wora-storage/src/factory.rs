#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{ObjectStore, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use wora_core::StorageConfig;

/// Create the object store selected by configuration
pub async fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn ObjectStore>> {
    match config.backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let storage = S3Storage::new(config).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            if config.public_url.is_empty() {
                return Err(StorageError::ConfigError(
                    "LOCAL_STORAGE_BASE_URL not configured".to_string(),
                ));
            }

            let storage = LocalStorage::new(base_path, config.public_url.clone()).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;

    fn local_config(path: Option<String>) -> StorageConfig {
        StorageConfig {
            backend: StorageBackend::Local,
            bucket: "unused".to_string(),
            region: "auto".to_string(),
            endpoint: None,
            access_key: None,
            secret_key: None,
            public_url: "http://localhost:3000/media".to_string(),
            local_storage_path: path,
        }
    }

    #[tokio::test]
    async fn test_create_local_storage() {
        let dir = tempfile::tempdir().unwrap();
        let config = local_config(Some(dir.path().to_string_lossy().into_owned()));

        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
        assert_eq!(storage.public_base_url(), "http://localhost:3000/media");
    }

    #[tokio::test]
    async fn test_local_storage_requires_path() {
        let result = create_storage(&local_config(None)).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }
}
