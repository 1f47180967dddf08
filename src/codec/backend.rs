//! Codec trait and shared error type.
//!
//! The [`TextureCodec`] trait is the only way the conversion pipeline touches
//! an on-disk texture format: bytes in, [`RasterImage`] out, and back again.
//! Reading and writing the bytes is the caller's job, so codecs stay pure and
//! the batch driver controls where (and how atomically) output lands.
//!
//! Production implementations are [`DdsCodec`](super::dds::DdsCodec) and
//! [`ImageCodec`](super::image_codec::ImageCodec).

use crate::raster::{RasterError, RasterImage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Unsupported format: {0}")]
    Unsupported(String),
    #[error("Malformed image: {0}")]
    Raster(#[from] RasterError),
}

/// Trait for texture container codecs.
///
/// Implementations must round-trip channel count and bit depth: decoding the
/// output of `encode` yields the same planes.
pub trait TextureCodec: Sync {
    /// File extension this codec handles, without the dot.
    fn extension(&self) -> &str;

    /// Parse container bytes into planes.
    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, CodecError>;

    /// Serialize an image into container bytes.
    fn encode(&self, image: &RasterImage) -> Result<Vec<u8>, CodecError>;
}
