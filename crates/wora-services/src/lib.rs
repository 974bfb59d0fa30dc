//! Wora Services Layer
//!
//! This crate is the business service layer: the storage quota tracker, the
//! upload pipeline and the cleanup collaborator. It re-exports the storage and
//! processing APIs so that the API crate depends on a single service facade.
//! Keep business logic and coordination here; keep thin HTTP handling in wora-api.

pub mod cleanup;
pub mod quota;
pub mod upload;

mod storage_errors;

pub use cleanup::AssetCleanup;
pub use quota::{BucketScanQuotaSource, QuotaSnapshot, QuotaSource, QuotaTracker, StorageUsage};
pub use upload::{UploadPipeline, UploadRequest};
pub use wora_processing::{CodecError, ImageCodec, UploadValidator, ValidationError};
pub use wora_storage::{
    create_storage, ObjectStore, ObjectSummary, StorageBackend, StorageError, StorageResult,
};
