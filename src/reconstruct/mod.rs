//! Channel remap and blue-channel reconstruction.
//!
//! Input textures store the X direction component in **alpha** and Y in
//! **green**; red and blue carry nothing useful. The output is a plain RGB
//! image:
//!
//! | Output | Source |
//! |---|---|
//! | R | input A |
//! | G | input G |
//! | B | computed from (A, G), see [`ReconstructionMode`] |
//!
//! The precondition (exactly R, G, B, A planes) is checked once, when an
//! [`EligibleImage`] is built. [`reconstruct`] itself cannot fail.
//!
//! Blue is computed per pixel with no cross-pixel dependency, so rows are
//! spread over the rayon pool.

mod calculations;

pub use calculations::{literal_blue, narrow_to_u8, normalized_blue, round_to_tenth};

use crate::raster::{Channel, ChannelLayout, ChannelPlane, RasterImage};
use rayon::prelude::*;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// The image does not have the four planes reconstruction needs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected R, G, B, A planes, found [{}]", join_channels(.found))]
pub struct PreconditionError {
    pub found: Vec<Channel>,
}

fn join_channels(channels: &[Channel]) -> String {
    channels
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// How the missing blue component is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReconstructionMode {
    /// `round(sqrt(|1 − (x² + y²)|), 1)` on raw byte values, narrowed to 8 bits.
    ///
    /// This is the established output of the conversion and stays the default
    /// even though it does not produce unit vectors for typical inputs.
    #[default]
    Literal,
    /// Bytes treated as `2v/255 − 1` components of a unit vector.
    Normalized,
}

impl ReconstructionMode {
    fn blue_fn(self) -> fn(u8, u8) -> u8 {
        match self {
            ReconstructionMode::Literal => literal_blue,
            ReconstructionMode::Normalized => normalized_blue,
        }
    }
}

impl fmt::Display for ReconstructionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconstructionMode::Literal => f.write_str("literal"),
            ReconstructionMode::Normalized => f.write_str("normalized"),
        }
    }
}

/// An RGBA image that passed the plane-layout check.
///
/// Only the planes reconstruction reads are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleImage {
    width: u32,
    height: u32,
    green: ChannelPlane,
    alpha: ChannelPlane,
}

impl EligibleImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl TryFrom<RasterImage> for EligibleImage {
    type Error = PreconditionError;

    fn try_from(image: RasterImage) -> Result<Self, Self::Error> {
        if image.layout() != ChannelLayout::Rgba {
            return Err(PreconditionError {
                found: image.channels(),
            });
        }
        let (width, height) = (image.width(), image.height());
        let planes: [ChannelPlane; 4] = image.into_planes().try_into().map_err(
            |planes: Vec<ChannelPlane>| PreconditionError {
                found: planes.iter().map(ChannelPlane::channel).collect(),
            },
        )?;
        let [_red, green, _blue, alpha] = planes;
        Ok(Self {
            width,
            height,
            green,
            alpha,
        })
    }
}

/// Remap alpha into red, keep green, and compute blue.
///
/// The result always has exactly three planes (R, G, B) and the input's
/// dimensions. Output is a pure function of the input samples and `mode`.
pub fn reconstruct(image: EligibleImage, mode: ReconstructionMode) -> RasterImage {
    let blue = blue_plane(&image.alpha, &image.green, mode);
    let red = image.alpha.retag(Channel::Red);
    RasterImage::from_trusted_planes(image.width, image.height, vec![red, image.green, blue])
}

fn blue_plane(x: &ChannelPlane, y: &ChannelPlane, mode: ReconstructionMode) -> ChannelPlane {
    let width = x.width() as usize;
    let blue_of = mode.blue_fn();
    let mut samples = vec![0u8; x.samples().len()];

    if width > 0 {
        samples
            .par_chunks_mut(width)
            .zip(x.samples().par_chunks(width))
            .zip(y.samples().par_chunks(width))
            .for_each(|((out, xs), ys)| {
                for ((z, &x), &y) in out.iter_mut().zip(xs).zip(ys) {
                    *z = blue_of(x, y);
                }
            });
    }

    ChannelPlane::from_trusted(Channel::Blue, x.width(), x.height(), samples)
}
