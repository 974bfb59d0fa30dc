//! Object store abstraction trait
//!
//! This module defines the `ObjectStore` trait that all storage backends must implement.

use crate::keys;
use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One entry of a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
}

/// Object store abstraction
///
/// Every object is written publicly readable and served at `{public_base_url}/{key}`.
/// The store is constructed once at startup and shared as `Arc<dyn ObjectStore>`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `data` under `key` with the given content type and return its public URL.
    /// An existing object with the same key is overwritten.
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Delete the object stored under `key`. Deleting a missing key succeeds.
    async fn delete_object(&self, key: &str) -> StorageResult<()>;

    /// Enumerate every object in the store, following pagination to the end.
    async fn list_objects(&self) -> StorageResult<Vec<ObjectSummary>>;

    /// Base URL under which objects are publicly served, without trailing slash.
    fn public_base_url(&self) -> &str;

    /// Public URL of `key`.
    fn public_url(&self, key: &str) -> String {
        keys::public_url(self.public_base_url(), key)
    }

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
