//! Shared test utilities for the normal-remap test suite.
//!
//! Builders for in-memory images and helpers that put real DDS textures on
//! disk, so driver tests can assert on exactly which bytes changed.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_dds(&tmp.path().join("wall_normal.dds"), &rgba_image(2, 2, |_, _| [0, 50, 0, 100]));
//! let before = snapshot_dir(tmp.path());
//! ```

use crate::codec::{DdsCodec, TextureCodec};
use crate::raster::{Channel, RasterImage};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// =========================================================================
// Image builders
// =========================================================================

/// RGBA image whose pixel at column `x`, row `y` is `f(x, y)`.
pub fn rgba_image(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 4]) -> RasterImage {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&f(x, y));
        }
    }
    RasterImage::from_interleaved(
        width,
        height,
        &[Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha],
        &data,
    )
    .unwrap()
}

/// Small RGBA texture with partially transparent alpha, i.e. an eligible one.
pub fn eligible_texture() -> RasterImage {
    rgba_image(3, 2, |x, y| [7, (x * 50) as u8, 7, (100 + y * 20) as u8])
}

/// RGBA texture whose alpha is 255 everywhere.
pub fn opaque_texture() -> RasterImage {
    rgba_image(3, 2, |x, _| [7, (x * 50) as u8, 7, 255])
}

// =========================================================================
// Filesystem fixtures
// =========================================================================

/// Encode `image` as DDS and write it to `path`.
pub fn write_dds(path: &Path, image: &RasterImage) {
    let bytes = DdsCodec::new().encode(image).unwrap();
    fs::write(path, bytes).unwrap();
}

/// DXT5 (BC3) surface with every 4x4 block set to `block`.
pub fn bc3_dds(width: u32, height: u32, block: [u8; 16]) -> Vec<u8> {
    let blocks = width.div_ceil(4) * height.div_ceil(4);
    let mut data = vec![0u8; 128];
    let mut put = |offset: usize, value: u32| {
        data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    };
    put(0x00, u32::from_le_bytes(*b"DDS "));
    put(0x04, 124);
    // caps | height | width | pixel format | linear size
    put(0x08, 0x1 | 0x2 | 0x4 | 0x1000 | 0x8_0000);
    put(0x0C, height);
    put(0x10, width);
    put(0x14, blocks * 16);
    put(0x4C, 32);
    put(0x50, 0x4);
    put(0x54, u32::from_le_bytes(*b"DXT5"));
    put(0x6C, 0x1000);
    for _ in 0..blocks {
        data.extend_from_slice(&block);
    }
    data
}

/// Read and decode a DDS file.
pub fn read_dds(path: &Path) -> RasterImage {
    DdsCodec::new().decode(&fs::read(path).unwrap()).unwrap()
}

/// File name → contents for every regular file directly in `dir`.
pub fn snapshot_dir(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().unwrap().is_file())
        .map(|e| {
            (
                e.file_name().to_string_lossy().into_owned(),
                fs::read(e.path()).unwrap(),
            )
        })
        .collect()
}
