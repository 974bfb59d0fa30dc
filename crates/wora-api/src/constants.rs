//! API constants

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

/// Multipart field carrying the image
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying the target folder
pub const FOLDER_FIELD: &str = "folder";

/// Folder used when the client sends none
pub const DEFAULT_UPLOAD_FOLDER: &str = "uploads";

/// The single configured administrator
pub const ADMIN_USER_ID: u64 = 1;
pub const ADMIN_ROLE: &str = "admin";

/// Versioned API prefix, e.g. `/api/v1`
pub fn api_prefix(version: &str) -> String {
    format!("{}/{}", API_BASE, version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_prefix() {
        assert_eq!(api_prefix("v1"), "/api/v1");
    }
}
