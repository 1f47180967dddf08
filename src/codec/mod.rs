//! Texture container codecs.
//!
//! | Extension | Codec | Backing |
//! |---|---|---|
//! | `dds` | [`DdsCodec`] | legacy DDS: uncompressed and BC1-BC5 read (via `bcdec_rs`), uncompressed write |
//! | `png` | [`ImageCodec::png`] | `image` crate |
//! | `tga` | [`ImageCodec::tga`] | `image` crate |
//!
//! The module is split into:
//! - **Backend**: [`TextureCodec`] trait + [`CodecError`]
//! - **DDS**: header parsing and pixel packing for `.dds`
//! - **Image codec**: adapters over the `image` crate

pub mod backend;
pub mod dds;
pub mod image_codec;

pub use backend::{CodecError, TextureCodec};
pub use dds::DdsCodec;
pub use image_codec::ImageCodec;

/// Extensions with a codec compiled in.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["dds", "png", "tga"];

/// Codec for a source extension. Matching is case-sensitive, like the
/// directory filter that uses it.
pub fn for_extension(extension: &str) -> Option<Box<dyn TextureCodec>> {
    match extension {
        "dds" => Some(Box::new(DdsCodec::new())),
        "png" => Some(Box::new(ImageCodec::png())),
        "tga" => Some(Box::new(ImageCodec::tga())),
        _ => None,
    }
}
