//! Bucket usage analytics as rendered to admins.

use serde::{Deserialize, Serialize};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Storage usage against the configured ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageAnalytics {
    pub total_size_bytes: u64,
    pub total_size_mb: f64,
    pub total_size_gb: f64,
    pub object_count: u64,
    pub storage_limit_bytes: u64,
    pub storage_limit_gb: f64,
    pub usage_percent: f64,
    pub can_upload: bool,
    /// Negative when usage is already over the ceiling.
    pub remaining_bytes: i64,
    pub remaining_mb: f64,
}

impl StorageAnalytics {
    pub fn new(total_size_bytes: u64, object_count: u64, storage_limit_bytes: u64) -> Self {
        let remaining_bytes = storage_limit_bytes as i64 - total_size_bytes as i64;
        let usage_percent = if storage_limit_bytes == 0 {
            0.0
        } else {
            total_size_bytes as f64 / storage_limit_bytes as f64 * 100.0
        };

        Self {
            total_size_bytes,
            total_size_mb: total_size_bytes as f64 / BYTES_PER_MB,
            total_size_gb: total_size_bytes as f64 / BYTES_PER_GB,
            object_count,
            storage_limit_bytes,
            storage_limit_gb: storage_limit_bytes as f64 / BYTES_PER_GB,
            usage_percent,
            can_upload: total_size_bytes < storage_limit_bytes,
            remaining_bytes,
            remaining_mb: remaining_bytes as f64 / BYTES_PER_MB,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn test_half_full_bucket() {
        let analytics = StorageAnalytics::new(GIB / 2, 42, GIB);
        assert_eq!(analytics.object_count, 42);
        assert_eq!(analytics.total_size_mb, 512.0);
        assert_eq!(analytics.storage_limit_gb, 1.0);
        assert_eq!(analytics.usage_percent, 50.0);
        assert!(analytics.can_upload);
        assert_eq!(analytics.remaining_bytes, (GIB / 2) as i64);
        assert_eq!(analytics.remaining_mb, 512.0);
    }

    #[test]
    fn test_exactly_full_bucket_cannot_upload() {
        let analytics = StorageAnalytics::new(GIB, 10, GIB);
        assert!(!analytics.can_upload);
        assert_eq!(analytics.remaining_bytes, 0);
    }

    #[test]
    fn test_over_limit_has_negative_remaining() {
        let analytics = StorageAnalytics::new(GIB + 1024 * 1024, 10, GIB);
        assert!(!analytics.can_upload);
        assert_eq!(analytics.remaining_bytes, -(1024 * 1024));
        assert_eq!(analytics.remaining_mb, -1.0);
        assert!(analytics.usage_percent > 100.0);
    }
}
