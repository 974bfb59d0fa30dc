//! Wora Processing Library
//!
//! Image decoding, bound-resizing, format conversion and thumbnail generation,
//! plus validation of upload requests before any bytes are processed.

#[cfg(feature = "image")]
pub mod image;
pub mod validator;

#[cfg(feature = "image")]
pub use crate::image::{CodecError, EncodedImage, ImageCodec, ProcessedImage, SourceFormat};
pub use validator::{UploadValidator, ValidationError};
