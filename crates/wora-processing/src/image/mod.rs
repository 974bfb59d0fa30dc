//! Image processing module
//!
//! - Decode, bound-resize, format policy and thumbnails (codec)
//! - WebP and GIF encoders (encoder)

pub mod codec;
pub mod encoder;

pub use codec::{CodecError, EncodedImage, ImageCodec, ProcessedImage, SourceFormat};
