//! Wora Core Library
//!
//! This crate provides the configuration, error types and shared models used by
//! every Wora component (storage, processing, services and the HTTP API).

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, StorageConfig, UploadConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
