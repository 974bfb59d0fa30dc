//! Storage quota tracker
//!
//! Usage is derived on demand, never persisted: every snapshot asks a
//! [`QuotaSource`] for the current totals. The default source enumerates the
//! whole bucket, so each check costs one paginated listing. The limit is
//! advisory: concurrent uploads can each pass the check and overshoot it.

use crate::storage_errors;
use async_trait::async_trait;
use std::sync::Arc;
use wora_core::models::StorageAnalytics;
use wora_core::AppError;
use wora_storage::ObjectStore;

/// Current bucket totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StorageUsage {
    pub total_bytes: u64,
    pub object_count: u64,
}

/// Where usage totals come from
#[async_trait]
pub trait QuotaSource: Send + Sync {
    async fn usage(&self) -> Result<StorageUsage, AppError>;
}

/// Sums object sizes over a full listing of the store
pub struct BucketScanQuotaSource {
    store: Arc<dyn ObjectStore>,
}

impl BucketScanQuotaSource {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl QuotaSource for BucketScanQuotaSource {
    async fn usage(&self) -> Result<StorageUsage, AppError> {
        let objects = self
            .store
            .list_objects()
            .await
            .map_err(storage_errors::read_error)?;

        Ok(objects
            .iter()
            .fold(StorageUsage::default(), |usage, object| StorageUsage {
                total_bytes: usage.total_bytes.saturating_add(object.size),
                object_count: usage.object_count + 1,
            }))
    }
}

/// Usage against the ceiling at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSnapshot {
    pub total_bytes: u64,
    pub object_count: u64,
    pub limit_bytes: u64,
}

impl QuotaSnapshot {
    pub fn can_upload(&self) -> bool {
        self.total_bytes < self.limit_bytes
    }

    /// Negative when usage is already over the ceiling.
    pub fn remaining_bytes(&self) -> i64 {
        self.limit_bytes as i64 - self.total_bytes as i64
    }

    pub fn would_exceed(&self, candidate_bytes: u64) -> bool {
        self.total_bytes.saturating_add(candidate_bytes) > self.limit_bytes
    }

    pub fn to_analytics(&self) -> StorageAnalytics {
        StorageAnalytics::new(self.total_bytes, self.object_count, self.limit_bytes)
    }
}

pub struct QuotaTracker {
    source: Arc<dyn QuotaSource>,
    limit_bytes: u64,
}

impl QuotaTracker {
    pub fn new(source: Arc<dyn QuotaSource>, limit_bytes: u64) -> Self {
        Self {
            source,
            limit_bytes,
        }
    }

    /// Tracker backed by a full scan of `store`
    pub fn from_store(store: Arc<dyn ObjectStore>, limit_bytes: u64) -> Self {
        Self::new(Arc::new(BucketScanQuotaSource::new(store)), limit_bytes)
    }

    pub fn limit_bytes(&self) -> u64 {
        self.limit_bytes
    }

    #[tracing::instrument(skip(self), fields(quota.limit_bytes = self.limit_bytes))]
    pub async fn snapshot(&self) -> Result<QuotaSnapshot, AppError> {
        let start = std::time::Instant::now();
        let usage = self.source.usage().await?;

        tracing::debug!(
            total_bytes = usage.total_bytes,
            object_count = usage.object_count,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Computed storage usage"
        );

        Ok(QuotaSnapshot {
            total_bytes: usage.total_bytes,
            object_count: usage.object_count,
            limit_bytes: self.limit_bytes,
        })
    }

    /// Fail with `QuotaExceeded` if adding `candidate_bytes` would pass the ceiling.
    ///
    /// Read-only: nothing is reserved, so the result can be stale by the time
    /// the caller writes.
    pub async fn check_before_upload(&self, candidate_bytes: u64) -> Result<QuotaSnapshot, AppError> {
        let snapshot = self.snapshot().await?;

        if snapshot.would_exceed(candidate_bytes) {
            tracing::warn!(
                total_bytes = snapshot.total_bytes,
                candidate_bytes,
                limit_bytes = snapshot.limit_bytes,
                "Upload rejected by storage quota"
            );
            return Err(AppError::QuotaExceeded {
                current_bytes: snapshot.total_bytes,
                candidate_bytes,
                limit_bytes: snapshot.limit_bytes,
            });
        }

        Ok(snapshot)
    }

    pub async fn analytics(&self) -> Result<StorageAnalytics, AppError> {
        Ok(self.snapshot().await?.to_analytics())
    }
}
