use crate::keys;
use crate::traits::{ObjectStore, ObjectSummary, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Objects are plain files under `base_path`; the key is the relative path.
/// Content types are not persisted, the serving layer infers them from the extension.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/wora/media")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Convert storage key to filesystem path with security validation
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        keys::validate_key(storage_key)?;
        Ok(self.base_path.join(storage_key))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Relative key of `path` with `/` separators.
    fn path_to_key(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.base_path).ok()?;
        let parts: Vec<&str> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;
        Some(parts.join("/"))
    }
}

#[async_trait]
impl ObjectStore for LocalStorage {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(self.public_url(key))
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(StorageError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                )))
            }
        }

        tracing::info!(
            path = %path.display(),
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn list_objects(&self) -> StorageResult<Vec<ObjectSummary>> {
        let mut objects = Vec::new();
        let mut pending = vec![self.base_path.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await.map_err(|e| {
                StorageError::ListFailed(format!("Failed to read {}: {}", dir.display(), e))
            })?;

            while let Some(entry) = entries.next_entry().await? {
                let metadata = entry.metadata().await?;
                let path = entry.path();
                if metadata.is_dir() {
                    pending.push(path);
                } else if let Some(key) = self.path_to_key(&path) {
                    objects.push(ObjectSummary {
                        key,
                        size: metadata.len(),
                    });
                }
            }
        }

        Ok(objects)
    }

    fn public_base_url(&self) -> &str {
        &self.base_url
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir, "http://localhost:3000/media/".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_put_returns_public_url() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let url = storage
            .put_object("gallery/photo_1a2b3c4d.webp", b"webp".to_vec(), "image/webp")
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:3000/media/gallery/photo_1a2b3c4d.webp");
        let written = std::fs::read(dir.path().join("gallery/photo_1a2b3c4d.webp")).unwrap();
        assert_eq!(written, b"webp");
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_key() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        storage
            .put_object("a/b.gif", b"first".to_vec(), "image/gif")
            .await
            .unwrap();
        storage
            .put_object("a/b.gif", b"second".to_vec(), "image/gif")
            .await
            .unwrap();

        let objects = storage.list_objects().await.unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].size, 6);
    }

    #[tokio::test]
    async fn test_list_walks_nested_folders() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        storage
            .put_object("gallery/one.webp", vec![0; 10], "image/webp")
            .await
            .unwrap();
        storage
            .put_object("content/news/two.webp", vec![0; 20], "image/webp")
            .await
            .unwrap();
        storage
            .put_object("root.svg", vec![0; 5], "image/svg+xml")
            .await
            .unwrap();

        let mut objects = storage.list_objects().await.unwrap();
        objects.sort_by(|a, b| a.key.cmp(&b.key));

        let keys: Vec<&str> = objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["content/news/two.webp", "gallery/one.webp", "root.svg"]);
        assert_eq!(objects.iter().map(|o| o.size).sum::<u64>(), 35);
    }

    #[tokio::test]
    async fn test_delete_nonexistent_is_ok() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        assert!(storage.delete_object("nonexistent/file.webp").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        storage
            .put_object("gallery/x.webp", vec![1, 2, 3], "image/webp")
            .await
            .unwrap();
        storage.delete_object("gallery/x.webp").await.unwrap();

        assert!(storage.list_objects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage
            .put_object("../../../etc/passwd", vec![], "text/plain")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete_object("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
