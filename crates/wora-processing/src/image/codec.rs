//! Image codec - decode, bound-resize, format conversion and thumbnail generation

use super::encoder::{encode_gif, encode_webp, WebpMode};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::io::Cursor;
use wora_core::models::ImageDimensions;
use wora_core::AppError;

pub const DEFAULT_MAX_DIMENSION: u32 = 2048;

const JPEG_WEBP_QUALITY: f32 = 85.0;
const PNG_WEBP_EFFORT: f32 = 90.0;
const RESIZED_WEBP_QUALITY: f32 = 85.0;
const THUMBNAIL_QUALITY: f32 = 80.0;
const THUMBNAIL_DIVISOR: u32 = 10;

const SVG_CONTENT_TYPE: &str = "image/svg+xml";
const WEBP_CONTENT_TYPE: &str = "image/webp";
const GIF_CONTENT_TYPE: &str = "image/gif";

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),
}

impl From<CodecError> for AppError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Decode(msg) => AppError::Decode(msg),
            CodecError::Encode(msg) => AppError::Encode(msg),
        }
    }
}

/// Format of the uploaded file as detected from its content (or `.svg` extension)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Svg,
    Jpeg,
    Png,
    WebP,
    Gif,
}

/// Decodable subset of `SourceFormat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RasterFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
}

impl RasterFormat {
    fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(RasterFormat::Jpeg),
            ImageFormat::Png => Some(RasterFormat::Png),
            ImageFormat::WebP => Some(RasterFormat::WebP),
            ImageFormat::Gif => Some(RasterFormat::Gif),
            _ => None,
        }
    }
}

impl From<RasterFormat> for SourceFormat {
    fn from(format: RasterFormat) -> Self {
        match format {
            RasterFormat::Jpeg => SourceFormat::Jpeg,
            RasterFormat::Png => SourceFormat::Png,
            RasterFormat::WebP => SourceFormat::WebP,
            RasterFormat::Gif => SourceFormat::Gif,
        }
    }
}

/// Bytes ready to be written to the object store
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub content_type: &'static str,
    /// Extension including the leading dot
    pub extension: &'static str,
}

impl EncodedImage {
    fn webp(data: Vec<u8>) -> Self {
        Self {
            data,
            content_type: WEBP_CONTENT_TYPE,
            extension: ".webp",
        }
    }

    fn gif(data: Vec<u8>) -> Self {
        Self {
            data,
            content_type: GIF_CONTENT_TYPE,
            extension: ".gif",
        }
    }
}

/// Result of processing one upload
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub source_format: SourceFormat,
    /// Canonical artifact
    pub artifact: EncodedImage,
    /// `None` for SVG
    pub thumbnail: Option<EncodedImage>,
    /// Final dimensions of the canonical artifact, `None` for SVG
    pub dimensions: Option<ImageDimensions>,
    /// Whether the source exceeded the maximum dimension and was downscaled
    pub resized: bool,
}

/// Converts uploads into a canonical artifact plus thumbnail.
///
/// JPEG becomes lossy WebP and PNG lossless WebP. WebP and GIF keep their family
/// and are only re-encoded when downscaled. SVG passes through untouched.
#[derive(Debug, Clone, Copy)]
pub struct ImageCodec {
    max_dimension: u32,
}

impl Default for ImageCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DIMENSION)
    }
}

impl ImageCodec {
    pub fn new(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
        }
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Process raw upload bytes. `extension` is the client filename's extension
    /// (with or without a dot) and only matters for SVG detection.
    pub fn process(&self, data: Vec<u8>, extension: &str) -> Result<ProcessedImage, CodecError> {
        if extension.trim_start_matches('.').eq_ignore_ascii_case("svg") {
            return Ok(ProcessedImage {
                source_format: SourceFormat::Svg,
                artifact: EncodedImage {
                    data,
                    content_type: SVG_CONTENT_TYPE,
                    extension: ".svg",
                },
                thumbnail: None,
                dimensions: None,
                resized: false,
            });
        }

        let (raster_format, img) = decode(&data)?;
        let (width, height) = img.dimensions();

        let (img, resized) = if width > self.max_dimension || height > self.max_dimension {
            let fitted = img.resize(self.max_dimension, self.max_dimension, FilterType::Lanczos3);
            tracing::debug!(
                from_width = width,
                from_height = height,
                to_width = fitted.width(),
                to_height = fitted.height(),
                "Downscaled image to maximum dimension"
            );
            (fitted, true)
        } else {
            (img, false)
        };

        let (final_width, final_height) = img.dimensions();

        let artifact = match raster_format {
            RasterFormat::Jpeg => {
                EncodedImage::webp(encode_webp(&img, WebpMode::Lossy(JPEG_WEBP_QUALITY))?)
            }
            RasterFormat::Png => {
                EncodedImage::webp(encode_webp(&img, WebpMode::Lossless(PNG_WEBP_EFFORT))?)
            }
            RasterFormat::WebP if resized => {
                EncodedImage::webp(encode_webp(&img, WebpMode::Lossy(RESIZED_WEBP_QUALITY))?)
            }
            RasterFormat::WebP => EncodedImage::webp(data),
            RasterFormat::Gif if resized => EncodedImage::gif(encode_gif(&img)?),
            RasterFormat::Gif => EncodedImage::gif(data),
        };

        let thumbnail = self.thumbnail(&img, raster_format)?;

        Ok(ProcessedImage {
            source_format: raster_format.into(),
            artifact,
            thumbnail: Some(thumbnail),
            dimensions: Some(ImageDimensions::new(final_width, final_height)),
            resized,
        })
    }

    /// One tenth of each side, floored, never below one pixel.
    pub fn thumbnail_dimensions(width: u32, height: u32) -> (u32, u32) {
        (
            (width / THUMBNAIL_DIVISOR).max(1),
            (height / THUMBNAIL_DIVISOR).max(1),
        )
    }

    fn thumbnail(
        &self,
        img: &DynamicImage,
        raster_format: RasterFormat,
    ) -> Result<EncodedImage, CodecError> {
        let (width, height) = img.dimensions();
        let (thumb_width, thumb_height) = Self::thumbnail_dimensions(width, height);
        let thumb = img.resize_exact(thumb_width, thumb_height, FilterType::Lanczos3);

        match raster_format {
            RasterFormat::Gif => Ok(EncodedImage::gif(encode_gif(&thumb)?)),
            _ => Ok(EncodedImage::webp(encode_webp(
                &thumb,
                WebpMode::Lossy(THUMBNAIL_QUALITY),
            )?)),
        }
    }
}

fn decode(data: &[u8]) -> Result<(RasterFormat, DynamicImage), CodecError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| CodecError::Decode(e.to_string()))?;

    let format = reader
        .format()
        .and_then(RasterFormat::from_image_format)
        .ok_or_else(|| CodecError::Decode("unsupported image format".to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| CodecError::Decode(e.to_string()))?;

    Ok((format, img))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::encoder::is_lossless_webp;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, format).unwrap();
        cursor.into_inner()
    }

    fn jpeg(width: u32, height: u32) -> Vec<u8> {
        encode(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 80, 40]))),
            ImageFormat::Jpeg,
        )
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        encode(
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 90, 255, 255]))),
            ImageFormat::Png,
        )
    }

    fn gif(width: u32, height: u32) -> Vec<u8> {
        encode_gif(&DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            Rgb([0, 255, 0]),
        )))
        .unwrap()
    }

    fn webp(width: u32, height: u32) -> Vec<u8> {
        encode_webp(
            &DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([50, 50, 50]))),
            WebpMode::Lossy(75.0),
        )
        .unwrap()
    }

    fn decoded_dimensions(data: &[u8]) -> (u32, u32) {
        image::load_from_memory(data).unwrap().dimensions()
    }

    #[test]
    fn test_small_png_becomes_lossless_webp() {
        let codec = ImageCodec::default();
        let out = codec.process(png(100, 100), ".png").unwrap();

        assert_eq!(out.source_format, SourceFormat::Png);
        assert!(!out.resized);
        assert_eq!(out.artifact.content_type, "image/webp");
        assert_eq!(out.artifact.extension, ".webp");
        assert!(is_lossless_webp(&out.artifact.data));
        assert_eq!(out.dimensions, Some(ImageDimensions::new(100, 100)));

        let thumb = out.thumbnail.unwrap();
        assert_eq!(thumb.content_type, "image/webp");
        assert!(!is_lossless_webp(&thumb.data));
        assert_eq!(decoded_dimensions(&thumb.data), (10, 10));
    }

    #[test]
    fn test_jpeg_becomes_lossy_webp() {
        let codec = ImageCodec::default();
        let out = codec.process(jpeg(640, 480), "jpg").unwrap();

        assert_eq!(out.source_format, SourceFormat::Jpeg);
        assert_eq!(out.artifact.extension, ".webp");
        assert!(!is_lossless_webp(&out.artifact.data));
        assert_eq!(decoded_dimensions(&out.artifact.data), (640, 480));
        assert_eq!(decoded_dimensions(&out.thumbnail.unwrap().data), (64, 48));
    }

    #[test]
    fn test_large_jpeg_is_fit_within_max_dimension() {
        let codec = ImageCodec::new(2048);
        let out = codec.process(jpeg(4000, 3000), ".jpeg").unwrap();

        assert!(out.resized);
        assert_eq!(out.dimensions, Some(ImageDimensions::new(2048, 1536)));
        assert_eq!(decoded_dimensions(&out.artifact.data), (2048, 1536));
        assert_eq!(decoded_dimensions(&out.thumbnail.unwrap().data), (204, 153));
    }

    #[test]
    fn test_portrait_fit_uses_height() {
        let codec = ImageCodec::new(100);
        let out = codec.process(png(150, 300), ".png").unwrap();

        assert_eq!(out.dimensions, Some(ImageDimensions::new(50, 100)));
    }

    #[test]
    fn test_image_at_exact_max_is_not_resized() {
        let codec = ImageCodec::new(64);
        let out = codec.process(png(64, 10), ".png").unwrap();

        assert!(!out.resized);
        assert_eq!(out.dimensions, Some(ImageDimensions::new(64, 10)));
    }

    #[test]
    fn test_tiny_image_gets_one_pixel_thumbnail() {
        let codec = ImageCodec::default();
        let out = codec.process(png(5, 3), ".png").unwrap();

        assert_eq!(decoded_dimensions(&out.thumbnail.unwrap().data), (1, 1));
    }

    #[test]
    fn test_thumbnail_dimensions_floor_rule() {
        assert_eq!(ImageCodec::thumbnail_dimensions(2048, 1536), (204, 153));
        assert_eq!(ImageCodec::thumbnail_dimensions(100, 100), (10, 10));
        assert_eq!(ImageCodec::thumbnail_dimensions(19, 9), (1, 1));
        assert_eq!(ImageCodec::thumbnail_dimensions(1, 1), (1, 1));
    }

    #[test]
    fn test_svg_passthrough() {
        let codec = ImageCodec::default();
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"/>"#.to_vec();
        let out = codec.process(svg.clone(), ".SVG").unwrap();

        assert_eq!(out.source_format, SourceFormat::Svg);
        assert_eq!(out.artifact.data, svg);
        assert_eq!(out.artifact.content_type, "image/svg+xml");
        assert_eq!(out.artifact.extension, ".svg");
        assert!(out.thumbnail.is_none());
        assert!(out.dimensions.is_none());
    }

    #[test]
    fn test_small_gif_preserved_byte_for_byte() {
        let codec = ImageCodec::default();
        let original = gif(40, 20);
        let out = codec.process(original.clone(), ".gif").unwrap();

        assert_eq!(out.source_format, SourceFormat::Gif);
        assert_eq!(out.artifact.data, original);
        assert_eq!(out.artifact.content_type, "image/gif");

        let thumb = out.thumbnail.unwrap();
        assert_eq!(thumb.content_type, "image/gif");
        assert_eq!(thumb.extension, ".gif");
        assert_eq!(decoded_dimensions(&thumb.data), (4, 2));
    }

    #[test]
    fn test_large_gif_reencoded_as_gif() {
        let codec = ImageCodec::new(50);
        let original = gif(200, 100);
        let out = codec.process(original.clone(), ".gif").unwrap();

        assert!(out.resized);
        assert_ne!(out.artifact.data, original);
        assert_eq!(out.artifact.content_type, "image/gif");
        assert_eq!(decoded_dimensions(&out.artifact.data), (50, 25));
    }

    #[test]
    fn test_small_webp_preserved_byte_for_byte() {
        let codec = ImageCodec::default();
        let original = webp(30, 30);
        let out = codec.process(original.clone(), ".webp").unwrap();

        assert_eq!(out.source_format, SourceFormat::WebP);
        assert_eq!(out.artifact.data, original);
        assert_eq!(out.thumbnail.unwrap().content_type, "image/webp");
    }

    #[test]
    fn test_large_webp_reencoded_lossy() {
        let codec = ImageCodec::new(32);
        let out = codec.process(webp(64, 64), ".webp").unwrap();

        assert!(out.resized);
        assert!(!is_lossless_webp(&out.artifact.data));
        assert_eq!(decoded_dimensions(&out.artifact.data), (32, 32));
    }

    #[test]
    fn test_format_detected_from_content_not_extension() {
        let codec = ImageCodec::default();
        let out = codec.process(png(20, 20), ".jpg").unwrap();

        assert_eq!(out.source_format, SourceFormat::Png);
        assert!(is_lossless_webp(&out.artifact.data));
    }

    #[test]
    fn test_corrupt_data_is_decode_error() {
        let codec = ImageCodec::default();
        let result = codec.process(b"definitely not an image".to_vec(), ".png");
        assert!(matches!(result, Err(CodecError::Decode(_))));

        let mut truncated = png(50, 50);
        truncated.truncate(40);
        let result = codec.process(truncated, ".png");
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[test]
    fn test_codec_error_maps_to_app_error() {
        let err: AppError = CodecError::Decode("bad".to_string()).into();
        assert_eq!(err.error_type(), "Decode");
        let err: AppError = CodecError::Encode("bad".to_string()).into();
        assert_eq!(err.error_type(), "Encode");
    }
}
