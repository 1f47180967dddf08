//! PNG and TGA textures through the `image` crate.
//!
//! | Decoded as | Planes |
//! |---|---|
//! | `Rgba8` | R, G, B, A |
//! | `Rgb8` | R, G, B |
//! | `LumaA8` | L, A |
//! | `Luma8` | L |
//!
//! Deeper sample types (16-bit, float) are rejected rather than quantized,
//! since the codec contract is to round-trip bit depth. The `image` crate
//! expands palettes on decode, so palette images arrive as RGB(A).

use super::backend::{CodecError, TextureCodec};
use crate::raster::{Channel, ChannelLayout, RasterImage};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Codec backed by one `image` crate format.
#[derive(Debug, Clone, Copy)]
pub struct ImageCodec {
    format: ImageFormat,
    extension: &'static str,
}

impl ImageCodec {
    pub fn png() -> Self {
        Self {
            format: ImageFormat::Png,
            extension: "png",
        }
    }

    pub fn tga() -> Self {
        Self {
            format: ImageFormat::Tga,
            extension: "tga",
        }
    }
}

fn planes_of(img: DynamicImage) -> Result<RasterImage, CodecError> {
    use Channel::*;
    let (width, height) = (img.width(), img.height());
    let image = match img {
        DynamicImage::ImageRgba8(buf) => {
            RasterImage::from_interleaved(width, height, &[Red, Green, Blue, Alpha], buf.as_raw())
        }
        DynamicImage::ImageRgb8(buf) => {
            RasterImage::from_interleaved(width, height, &[Red, Green, Blue], buf.as_raw())
        }
        DynamicImage::ImageLumaA8(buf) => {
            RasterImage::from_interleaved(width, height, &[Luma, Alpha], buf.as_raw())
        }
        DynamicImage::ImageLuma8(buf) => {
            RasterImage::from_interleaved(width, height, &[Luma], buf.as_raw())
        }
        other => {
            return Err(CodecError::Unsupported(format!(
                "{:?} samples",
                other.color()
            )));
        }
    };
    Ok(image?)
}

fn dynamic_of(image: &RasterImage) -> Result<DynamicImage, CodecError> {
    let (w, h) = (image.width(), image.height());
    let raw = image.to_interleaved();
    let built = match image.layout() {
        ChannelLayout::Rgba => image::RgbaImage::from_raw(w, h, raw).map(DynamicImage::ImageRgba8),
        ChannelLayout::Rgb => image::RgbImage::from_raw(w, h, raw).map(DynamicImage::ImageRgb8),
        ChannelLayout::LumaAlpha => {
            image::GrayAlphaImage::from_raw(w, h, raw).map(DynamicImage::ImageLumaA8)
        }
        ChannelLayout::Luma => image::GrayImage::from_raw(w, h, raw).map(DynamicImage::ImageLuma8),
        ChannelLayout::Indexed | ChannelLayout::Other => {
            return Err(CodecError::Unsupported(format!(
                "cannot write planes {:?}",
                image.channels()
            )));
        }
    };
    built.ok_or_else(|| CodecError::Encode(format!("buffer does not fit {w}x{h}")))
}

impl TextureCodec for ImageCodec {
    fn extension(&self) -> &str {
        self.extension
    }

    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, CodecError> {
        let img = image::load_from_memory_with_format(bytes, self.format)
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        planes_of(img)
    }

    fn encode(&self, image: &RasterImage) -> Result<Vec<u8>, CodecError> {
        let dynamic = dynamic_of(image)?;
        let mut out = Vec::new();
        dynamic
            .write_to(&mut Cursor::new(&mut out), self.format)
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        Ok(out)
    }
}
