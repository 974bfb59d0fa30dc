//! Stored image asset returned by the upload pipeline.

use serde::{Deserialize, Serialize};

/// Pixel dimensions of a processed raster image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Outcome of a successful upload: where the canonical artifact lives and,
/// for raster images, its thumbnail and final dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAsset {
    pub success: bool,
    pub file_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Byte size of the canonical artifact as written, not of the original upload.
    pub file_size: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<ImageDimensions>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_asset_omits_optional_fields() {
        let asset = StoredAsset {
            success: true,
            file_url: "https://cdn.example.com/icons/logo_1a2b3c4d.svg".to_string(),
            thumbnail_url: None,
            file_size: 512,
            dimensions: None,
        };

        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["file_size"], 512);
        assert!(json.get("thumbnail_url").is_none());
        assert!(json.get("dimensions").is_none());
    }

    #[test]
    fn test_raster_asset_serializes_dimensions() {
        let asset = StoredAsset {
            success: true,
            file_url: "https://cdn.example.com/gallery/photo_1a2b3c4d.webp".to_string(),
            thumbnail_url: Some(
                "https://cdn.example.com/gallery/photo_1a2b3c4d_thumb.webp".to_string(),
            ),
            file_size: 20_480,
            dimensions: Some(ImageDimensions::new(100, 100)),
        };

        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["dimensions"]["width"], 100);
        assert_eq!(json["dimensions"]["height"], 100);
        assert!(json["thumbnail_url"]
            .as_str()
            .unwrap()
            .ends_with("_thumb.webp"));
    }
}
