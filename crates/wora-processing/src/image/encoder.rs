//! WebP and GIF encoders

use super::codec::CodecError;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

/// WebP encoding mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WebpMode {
    /// Lossy, `quality` in 0-100
    Lossy(f32),
    /// Lossless, the value is the compression effort in 0-100 and does not affect pixels
    Lossless(f32),
}

/// Encode to WebP with libwebp
pub fn encode_webp(img: &DynamicImage, mode: WebpMode) -> Result<Vec<u8>, CodecError> {
    let (width, height) = img.dimensions();
    let (lossless, quality) = match mode {
        WebpMode::Lossy(q) => (false, q),
        WebpMode::Lossless(q) => (true, q),
    };

    let encoded = if img.color().has_alpha() {
        let rgba_img = img.to_rgba8();
        webp::Encoder::from_rgba(&rgba_img, width, height).encode_simple(lossless, quality)
    } else {
        let rgb_img = img.to_rgb8();
        webp::Encoder::from_rgb(&rgb_img, width, height).encode_simple(lossless, quality)
    };

    let webp_data =
        encoded.map_err(|e| CodecError::Encode(format!("WebP encoding failed: {:?}", e)))?;

    Ok(webp_data.to_vec())
}

/// Encode a single-frame GIF
pub fn encode_gif(img: &DynamicImage) -> Result<Vec<u8>, CodecError> {
    let mut cursor = Cursor::new(Vec::new());

    DynamicImage::ImageRgba8(img.to_rgba8())
        .write_to(&mut cursor, ImageFormat::Gif)
        .map_err(|e| CodecError::Encode(format!("GIF encoding failed: {}", e)))?;

    Ok(cursor.into_inner())
}

/// Whether a WebP file uses the lossless bitstream, read from the first chunk FourCC
#[cfg(test)]
pub(crate) fn is_lossless_webp(data: &[u8]) -> bool {
    data.get(12..16) == Some(b"VP8L".as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_lossy_and_lossless_bitstreams() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 16, Rgb([10, 120, 200])));

        let lossy = encode_webp(&img, WebpMode::Lossy(85.0)).unwrap();
        let lossless = encode_webp(&img, WebpMode::Lossless(90.0)).unwrap();

        assert_eq!(&lossy[0..4], b"RIFF");
        assert_eq!(&lossy[8..12], b"WEBP");
        assert!(!is_lossless_webp(&lossy));
        assert!(is_lossless_webp(&lossless));
    }

    #[test]
    fn test_lossless_check_reads_first_chunk_only() {
        let mut lossy = b"RIFF\x00\x00\x00\x00WEBPVP8 ".to_vec();
        lossy.extend_from_slice(b"payload with VP8L inside");

        assert!(!is_lossless_webp(&lossy));
        assert!(!is_lossless_webp(b"RIFF"));
    }

    #[test]
    fn test_webp_keeps_dimensions() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 30, Rgba([0, 0, 0, 128])));
        let data = encode_webp(&img, WebpMode::Lossless(90.0)).unwrap();

        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!(decoded.dimensions(), (40, 30));
    }

    #[test]
    fn test_gif_roundtrip_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(12, 7, Rgb([255, 0, 0])));
        let data = encode_gif(&img).unwrap();

        assert_eq!(&data[0..3], b"GIF");
        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!(decoded.dimensions(), (12, 7));
    }
}
