//! Shared key and URL conventions for storage backends.
//!
//! Canonical key: `{folder}/{sanitized_base}_{suffix}{ext}`.
//! Thumbnail key: the canonical key with `_thumb` inserted before the extension.

use crate::{StorageError, StorageResult};
use uuid::Uuid;

const MAX_BASE_LEN: usize = 100;
const THUMBNAIL_MARKER: &str = "_thumb";

/// Split a filename into `(base, extension)` where the extension keeps its dot.
///
/// Only the last path segment is considered, so `a.b/c` has no extension.
pub fn split_extension(filename: &str) -> (&str, &str) {
    let segment_start = filename.rfind('/').map(|i| i + 1).unwrap_or(0);
    match filename[segment_start..].rfind('.') {
        Some(dot) => filename.split_at(segment_start + dot),
        None => (filename, ""),
    }
}

/// Reduce a client-supplied base name to `[A-Za-z0-9_-]`.
///
/// Directory components are dropped; anything else becomes `_`.
pub fn sanitize_base_name(base: &str) -> String {
    let name = base.rsplit(['/', '\\']).next().unwrap_or(base);
    let s: String = name
        .chars()
        .take(MAX_BASE_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.trim_matches('_').is_empty() {
        "image".to_string()
    } else {
        s
    }
}

/// Validate a logical folder such as `gallery` or `content/news`.
///
/// Surrounding slashes are trimmed. Every segment must be non-empty and made of
/// `[A-Za-z0-9_-]`, which also rules out `.` and `..`.
pub fn normalize_folder(folder: &str) -> StorageResult<String> {
    let trimmed = folder.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(StorageError::InvalidKey("folder must not be empty".to_string()));
    }

    let valid = trimmed.split('/').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    });
    if !valid {
        return Err(StorageError::InvalidKey(format!(
            "invalid folder: {}",
            folder
        )));
    }

    Ok(trimmed.to_string())
}

/// First eight hex characters of a fresh v4 UUID.
pub fn unique_suffix() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Build a canonical object key. `ext` includes its leading dot, or is empty.
pub fn object_key(folder: &str, base: &str, suffix: &str, ext: &str) -> String {
    format!("{}/{}_{}{}", folder, base, suffix, ext)
}

/// Derive the thumbnail key of a canonical key.
///
/// `gallery/photo_1a2b3c4d.webp` becomes `gallery/photo_1a2b3c4d_thumb.webp`.
pub fn derive_thumbnail_key(canonical_key: &str) -> String {
    let (stem, ext) = split_extension(canonical_key);
    format!("{}{}{}", stem, THUMBNAIL_MARKER, ext)
}

/// Whether `key` names an SVG object (case-insensitive).
pub fn is_svg(key: &str) -> bool {
    split_extension(key).1.eq_ignore_ascii_case(".svg")
}

/// Public URL of `key` under `base_url`.
pub fn public_url(base_url: &str, key: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), key)
}

/// Recover the object key from a public URL.
///
/// Returns `None` for URLs outside `base_url`. A URL equal to the base (or the
/// base plus a slash) yields `Some("")`.
pub fn key_from_url<'a>(base_url: &str, url: &'a str) -> Option<&'a str> {
    let base = base_url.trim_end_matches('/');
    let rest = url.strip_prefix(base)?;
    if rest.is_empty() {
        return Some("");
    }
    rest.strip_prefix('/')
}

/// Reject keys that could escape the bucket root or a local base directory.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("empty key".to_string()));
    }
    if key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
