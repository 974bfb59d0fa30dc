//! Wora Storage Library
//!
//! This crate provides the object store abstraction used by the media pipeline.
//! It includes the `ObjectStore` trait and implementations for S3-compatible
//! buckets (Cloudflare R2, AWS, MinIO) and the local filesystem.
//!
//! # Storage key format
//!
//! Keys are `{folder}/{sanitized_base}_{suffix}{ext}` where `suffix` is the first
//! eight hex characters of a v4 UUID. A thumbnail lives next to its canonical
//! object with `_thumb` inserted before the extension. Every object is served at
//! `{public_base}/{key}`.
//!
//! Keys must not contain `..` or a leading `/`. Key and URL conventions are
//! centralized in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectStore, ObjectSummary, StorageError, StorageResult};
pub use wora_core::StorageBackend;
