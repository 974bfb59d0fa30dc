//! Error types module
//!
//! This module provides the core error types used throughout the Wora media backend.
//! All errors are unified under the `AppError` enum which can represent upload limits,
//! image codec failures, object storage failures and authentication errors.

use std::io;

const BYTES_PER_MB: u64 = 1024 * 1024;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_LIMIT_EXCEEDED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("File too large: {size} bytes exceeds maximum of {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Storage quota exceeded: {current_bytes} bytes used, {candidate_bytes} bytes requested, limit {limit_bytes} bytes")]
    QuotaExceeded {
        current_bytes: u64,
        candidate_bytes: u64,
        limit_bytes: u64,
    },

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Image encode error: {0}")]
    Encode(String),

    #[error("Storage write error: {0}")]
    StorageWrite(String),

    #[error("Storage read error: {0}")]
    StorageRead(String),

    #[error("Storage delete error: {0}")]
    StorageDelete(String),

    #[error("Invalid image URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
/// client_message stays per-variant for dynamic content.
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::FileTooLarge { .. } => (
            413,
            "FILE_TOO_LARGE",
            false,
            Some("Reduce file size and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::QuotaExceeded { .. } => (
            413,
            "STORAGE_LIMIT_EXCEEDED",
            false,
            Some("Delete unused images to free storage"),
            false,
            LogLevel::Warn,
        ),
        AppError::Decode(_) => (
            400,
            "DECODE_ERROR",
            false,
            Some("Check image format and try a different file"),
            false,
            LogLevel::Debug,
        ),
        AppError::Encode(_) => (
            500,
            "ENCODE_ERROR",
            false,
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
        AppError::StorageWrite(_) => (
            500,
            "STORAGE_WRITE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::StorageRead(_) => (
            500,
            "STORAGE_READ_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::StorageDelete(_) => (
            500,
            "STORAGE_DELETE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InvalidUrl(_) => (
            400,
            "INVALID_URL",
            false,
            Some("Use the URL returned by the upload endpoint"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            401,
            "UNAUTHORIZED",
            false,
            Some("Check credentials or authentication token"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::FileTooLarge { .. } => "FileTooLarge",
            AppError::QuotaExceeded { .. } => "QuotaExceeded",
            AppError::Decode(_) => "Decode",
            AppError::Encode(_) => "Encode",
            AppError::StorageWrite(_) => "StorageWrite",
            AppError::StorageRead(_) => "StorageRead",
            AppError::StorageDelete(_) => "StorageDelete",
            AppError::InvalidUrl(_) => "InvalidUrl",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::FileTooLarge { max, .. } => format!(
                "File size exceeds maximum limit of {} MB",
                max / BYTES_PER_MB
            ),
            AppError::QuotaExceeded {
                current_bytes,
                limit_bytes,
                ..
            } => format!(
                "upload would exceed storage limit. Current usage: {:.2} GB, Limit: {:.2} GB",
                *current_bytes as f64 / BYTES_PER_GB,
                *limit_bytes as f64 / BYTES_PER_GB
            ),
            AppError::Decode(_) => "Unsupported or corrupt image".to_string(),
            AppError::Encode(_) => "Failed to process image".to_string(),
            AppError::StorageWrite(_) => "Failed to upload file".to_string(),
            AppError::StorageRead(_) => "Failed to read storage".to_string(),
            AppError::StorageDelete(_) => "Failed to delete file".to_string(),
            AppError::InvalidUrl(ref msg) => format!("invalid image URL: {}", msg),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_file_too_large() {
        let err = AppError::FileTooLarge {
            size: 5_000_000,
            max: 4_194_304,
        };
        assert_eq!(err.http_status_code(), 413);
        assert_eq!(err.error_code(), "FILE_TOO_LARGE");
        assert!(!err.is_recoverable());
        assert_eq!(
            err.client_message(),
            "File size exceeds maximum limit of 4 MB"
        );
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_quota_exceeded() {
        let err = AppError::QuotaExceeded {
            current_bytes: 1_070_000_000,
            candidate_bytes: 5_000_000,
            limit_bytes: 1_073_741_824,
        };
        assert_eq!(err.http_status_code(), 413);
        assert_eq!(err.error_code(), "STORAGE_LIMIT_EXCEEDED");
        assert_eq!(
            err.client_message(),
            "upload would exceed storage limit. Current usage: 1.00 GB, Limit: 1.00 GB"
        );
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_storage_errors_are_sensitive() {
        for err in [
            AppError::StorageWrite("PutObject: access denied".to_string()),
            AppError::StorageRead("ListObjectsV2: timeout".to_string()),
            AppError::StorageDelete("DeleteObject: timeout".to_string()),
        ] {
            assert_eq!(err.http_status_code(), 500);
            assert!(err.is_sensitive());
            assert!(err.is_recoverable());
            assert!(!err.client_message().contains("access denied"));
        }
    }

    #[test]
    fn test_codec_error_statuses() {
        let decode = AppError::Decode("unknown format".to_string());
        assert_eq!(decode.http_status_code(), 400);
        assert_eq!(decode.error_code(), "DECODE_ERROR");

        let encode = AppError::Encode("webp".to_string());
        assert_eq!(encode.http_status_code(), 500);
        assert_eq!(encode.error_code(), "ENCODE_ERROR");
    }

    #[test]
    fn test_invalid_url_message() {
        let err = AppError::InvalidUrl("https://cdn.example.com/".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_URL");
        assert!(err.client_message().starts_with("invalid image URL"));
    }

    #[test]
    fn test_from_anyhow_keeps_source_chain() {
        let err: AppError = anyhow::anyhow!("bucket unreachable").into();
        assert_eq!(err.error_type(), "Internal");
        assert_eq!(err.client_message(), "Internal server error");
        assert!(err.detailed_message().contains("bucket unreachable"));
    }

    #[test]
    fn test_from_serde_json() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: AppError = parse.unwrap_err().into();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
