//! Mapping of object store failures onto the application error taxonomy.
//!
//! The same `StorageError` means different things depending on which side of the
//! pipeline hit it, so the conversion takes the operation into account.

use wora_core::AppError;
use wora_storage::StorageError;

pub(crate) fn write_error(err: StorageError) -> AppError {
    match err {
        StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
        other => AppError::StorageWrite(other.to_string()),
    }
}

pub(crate) fn read_error(err: StorageError) -> AppError {
    AppError::StorageRead(err.to_string())
}

pub(crate) fn delete_error(err: StorageError, url: &str) -> AppError {
    match err {
        StorageError::InvalidKey(_) => AppError::InvalidUrl(url.to_string()),
        other => AppError::StorageDelete(other.to_string()),
    }
}
