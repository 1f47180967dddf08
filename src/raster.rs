//! In-memory image model shared by codecs, detection and reconstruction.
//!
//! A [`RasterImage`] is a set of equally sized 8-bit [`ChannelPlane`]s, each
//! tagged with the [`Channel`] it carries. Planes are stored separately rather
//! than interleaved because every consumer in this crate works per channel:
//! the detector scans the alpha plane, the reconstructor reads alpha and
//! green and writes a new blue plane.
//!
//! Palette-based images carry a single [`Channel::Index`] plane plus a
//! [`Palette`]. Containers that declare keyed transparency set a
//! [`TransparencyMarker`] on the image.

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RasterError {
    #[error("plane {channel} is {actual_width}x{actual_height}, expected {width}x{height}")]
    PlaneSize {
        channel: Channel,
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    #[error("plane buffer holds {actual} samples, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
    #[error("image dimensions {0}x{1} overflow the address space")]
    TooLarge(u32, u32),
}

/// Semantic meaning of one plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
    Luma,
    /// Palette index (see [`Palette`]).
    Index,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Red => "R",
            Channel::Green => "G",
            Channel::Blue => "B",
            Channel::Alpha => "A",
            Channel::Luma => "L",
            Channel::Index => "P",
        };
        f.write_str(name)
    }
}

/// Classification of an image by its ordered plane tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Rgba,
    Rgb,
    LumaAlpha,
    Luma,
    Indexed,
    Other,
}

/// One single-channel grid of 8-bit samples, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPlane {
    channel: Channel,
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

fn sample_count(width: u32, height: u32) -> Result<usize, RasterError> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(RasterError::TooLarge(width, height))
}

impl ChannelPlane {
    pub fn new(
        channel: Channel,
        width: u32,
        height: u32,
        samples: Vec<u8>,
    ) -> Result<Self, RasterError> {
        let expected = sample_count(width, height)?;
        if samples.len() != expected {
            return Err(RasterError::BufferLength {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            channel,
            width,
            height,
            samples,
        })
    }

    /// Caller guarantees `samples.len() == width * height`.
    pub(crate) fn from_trusted(channel: Channel, width: u32, height: u32, samples: Vec<u8>) -> Self {
        debug_assert_eq!(samples.len(), width as usize * height as usize);
        Self {
            channel,
            width,
            height,
            samples,
        }
    }

    /// A plane with every sample set to `value`.
    pub fn filled(channel: Channel, width: u32, height: u32, value: u8) -> Result<Self, RasterError> {
        let len = sample_count(width, height)?;
        Self::new(channel, width, height, vec![value; len])
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Sample at (row, column). Panics when out of range.
    pub fn get(&self, row: u32, col: u32) -> u8 {
        assert!(row < self.height && col < self.width, "sample out of range");
        self.samples[row as usize * self.width as usize + col as usize]
    }

    /// Same samples, different channel tag.
    pub fn retag(self, channel: Channel) -> Self {
        Self { channel, ..self }
    }

    pub fn min_sample(&self) -> Option<u8> {
        self.samples.iter().copied().min()
    }
}

/// Colour table of a palette-based image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    /// RGBA entries, indexed by the samples of the index plane.
    pub entries: Vec<[u8; 4]>,
    /// Entry the container designates as fully transparent, if any.
    pub transparent_index: Option<u8>,
}

/// Image-level keyed transparency declared by the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransparencyMarker {
    /// RGB colour that reads as fully transparent.
    ColorKey([u8; 3]),
}

/// A decoded bitmap with an explicit channel layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    planes: Vec<ChannelPlane>,
    palette: Option<Palette>,
    transparency: Option<TransparencyMarker>,
}

impl RasterImage {
    /// Build an image from planes; every plane must be `width`x`height`.
    pub fn new(width: u32, height: u32, planes: Vec<ChannelPlane>) -> Result<Self, RasterError> {
        for plane in &planes {
            if plane.width != width || plane.height != height {
                return Err(RasterError::PlaneSize {
                    channel: plane.channel,
                    width,
                    height,
                    actual_width: plane.width,
                    actual_height: plane.height,
                });
            }
        }
        Ok(Self {
            width,
            height,
            planes,
            palette: None,
            transparency: None,
        })
    }

    /// Caller guarantees every plane is `width`x`height`.
    pub(crate) fn from_trusted_planes(width: u32, height: u32, planes: Vec<ChannelPlane>) -> Self {
        debug_assert!(planes.iter().all(|p| p.width == width && p.height == height));
        Self {
            width,
            height,
            planes,
            palette: None,
            transparency: None,
        }
    }

    /// Split an interleaved buffer (`channels.len()` samples per pixel) into planes.
    pub fn from_interleaved(
        width: u32,
        height: u32,
        channels: &[Channel],
        data: &[u8],
    ) -> Result<Self, RasterError> {
        let pixels = sample_count(width, height)?;
        let stride = channels.len();
        let expected = pixels
            .checked_mul(stride)
            .ok_or(RasterError::TooLarge(width, height))?;
        if data.len() != expected {
            return Err(RasterError::BufferLength {
                expected,
                actual: data.len(),
            });
        }

        let planes = channels
            .iter()
            .enumerate()
            .map(|(offset, &channel)| {
                let samples = data.iter().skip(offset).step_by(stride).copied().collect();
                ChannelPlane::new(channel, width, height, samples)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(width, height, planes)
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn with_transparency(mut self, marker: TransparencyMarker) -> Self {
        self.transparency = Some(marker);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn planes(&self) -> &[ChannelPlane] {
        &self.planes
    }

    pub fn into_planes(self) -> Vec<ChannelPlane> {
        self.planes
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    pub fn transparency(&self) -> Option<TransparencyMarker> {
        self.transparency
    }

    pub fn plane(&self, channel: Channel) -> Option<&ChannelPlane> {
        self.planes.iter().find(|p| p.channel == channel)
    }

    pub fn channels(&self) -> Vec<Channel> {
        self.planes.iter().map(|p| p.channel).collect()
    }

    pub fn layout(&self) -> ChannelLayout {
        use Channel::*;
        match self.channels().as_slice() {
            [Red, Green, Blue, Alpha] => ChannelLayout::Rgba,
            [Red, Green, Blue] => ChannelLayout::Rgb,
            [Luma, Alpha] => ChannelLayout::LumaAlpha,
            [Luma] => ChannelLayout::Luma,
            [Index] => ChannelLayout::Indexed,
            _ => ChannelLayout::Other,
        }
    }

    /// Interleave the planes back into one buffer, plane order preserved.
    pub fn to_interleaved(&self) -> Vec<u8> {
        let stride = self.planes.len();
        let pixels = self.width as usize * self.height as usize;
        let mut out = vec![0u8; pixels * stride];
        for (offset, plane) in self.planes.iter().enumerate() {
            for (i, &sample) in plane.samples.iter().enumerate() {
                out[i * stride + offset] = sample;
            }
        }
        out
    }
}
