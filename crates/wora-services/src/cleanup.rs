//! Removal of stored images when the content that references them goes away.
//!
//! Only URLs under the store's public base are touched. Anything else, such as
//! an image hot-linked from another site, is left alone.

use crate::storage_errors;
use serde_json::{Map, Value};
use std::sync::Arc;
use wora_core::AppError;
use wora_storage::{keys, ObjectStore};

/// Field holding an image URL inside an embedded content section
const SECTION_IMAGE_FIELD: &str = "image_url";

pub struct AssetCleanup {
    store: Arc<dyn ObjectStore>,
}

impl AssetCleanup {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Whether `url` points into this store.
    ///
    /// The base must be followed by `/` or nothing, so a host that merely
    /// starts with the same text is foreign.
    pub fn is_owned(&self, url: &str) -> bool {
        !url.is_empty() && keys::key_from_url(self.store.public_base_url(), url).is_some()
    }

    fn key_for<'a>(&self, url: &'a str) -> Result<&'a str, AppError> {
        match keys::key_from_url(self.store.public_base_url(), url) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(AppError::InvalidUrl(url.to_string())),
        }
    }

    /// Delete an uploaded image and its thumbnail.
    ///
    /// Returns `Ok(false)` without touching the store for empty or foreign URLs.
    /// A failed thumbnail delete is logged and ignored.
    #[tracing::instrument(skip(self))]
    pub async fn delete_if_owned(&self, url: &str) -> Result<bool, AppError> {
        if !self.is_owned(url) {
            return Ok(false);
        }

        let key = self.key_for(url)?;
        self.store
            .delete_object(key)
            .await
            .map_err(|e| storage_errors::delete_error(e, url))?;

        if !keys::is_svg(key) {
            let thumbnail_key = keys::derive_thumbnail_key(key);
            if let Err(e) = self.store.delete_object(&thumbnail_key).await {
                tracing::warn!(
                    key = %key,
                    thumbnail_key = %thumbnail_key,
                    error = %e,
                    "Failed to delete thumbnail"
                );
            }
        }

        tracing::info!(key = %key, "Deleted image");
        Ok(true)
    }

    /// Delete a single owned object, without looking for a thumbnail
    #[tracing::instrument(skip(self))]
    pub async fn delete_original_if_owned(&self, url: &str) -> Result<bool, AppError> {
        if !self.is_owned(url) {
            return Ok(false);
        }

        let key = self.key_for(url)?;
        self.store
            .delete_object(key)
            .await
            .map_err(|e| storage_errors::delete_error(e, url))?;

        tracing::info!(key = %key, "Deleted image");
        Ok(true)
    }

    /// Delete every owned `image_url` found in a JSON array of section objects.
    ///
    /// Malformed JSON means there is nothing to clean. Items that fail are logged
    /// and skipped. Returns how many images were deleted.
    pub async fn delete_from_embedded_sections(&self, sections_json: &str) -> usize {
        let sections: Vec<Map<String, Value>> = match serde_json::from_str(sections_json) {
            Ok(sections) => sections,
            Err(e) => {
                tracing::debug!(error = %e, "Embedded sections are not a JSON array of objects");
                return 0;
            }
        };

        let mut deleted = 0;
        for url in sections
            .iter()
            .filter_map(|section| section.get(SECTION_IMAGE_FIELD))
            .filter_map(Value::as_str)
        {
            match self.delete_if_owned(url).await {
                Ok(true) => deleted += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Failed to delete section image");
                }
            }
        }
        deleted
    }
}
