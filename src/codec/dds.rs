//! DirectDraw Surface (DDS) codec.
//!
//! Only the legacy 128-byte header is understood, and only the top mip level
//! is read. Supported pixel formats:
//!
//! | Pixel format flags | Bits | Layout |
//! |---|---|---|
//! | `DDPF_RGB` (+ `DDPF_ALPHAPIXELS`) | 24 / 32 | byte-aligned channel masks, any order |
//! | `DDPF_LUMINANCE` (+ `DDPF_ALPHAPIXELS`) | 8 / 16 | L or LA |
//! | `DDPF_PALETTEINDEXED8` | 8 | 256-entry RGBA palette after the header |
//! | `DDPF_FOURCC` `DXT1`..`DXT5` | BC1-BC3 | decoded to RGBA |
//! | `DDPF_FOURCC` `ATI1`/`BC4U`, `ATI2`/`BC5U` | BC4, BC5 | decoded to R or RG |
//!
//! Other FourCC codes (including the `DX10` extended header) are unsupported.
//! Encoding is always uncompressed and writes a single mip level: RGB as
//! 24-bit B8G8R8, RGBA as 32-bit B8G8R8A8.
//!
//! For palette surfaces with `DDPF_ALPHAPIXELS` set, the first palette entry
//! with zero alpha is the designated transparent index.

use super::backend::{CodecError, TextureCodec};
use crate::raster::{Channel, ChannelLayout, ChannelPlane, Palette, RasterImage};

/// `"DDS "` read as a little-endian u32.
const DDS_MAGIC: u32 = 0x2053_4444;
const HEADER_SIZE: usize = 0x80;
/// `dwSize` of the header structure that follows the magic.
const HEADER_STRUCT_SIZE: u32 = 124;
const PIXELFORMAT_STRUCT_SIZE: u32 = 32;
const PALETTE_ENTRIES: usize = 256;
const PALETTE_SIZE: usize = PALETTE_ENTRIES * 4;
/// Bytes per row of a decoded 4x4 RGBA block.
const BLOCK_PITCH: usize = 4 * 4;

const FLAGS_OFFSET: usize = 0x08;
const HEIGHT_OFFSET: usize = 0x0C;
const WIDTH_OFFSET: usize = 0x10;
const PITCH_OFFSET: usize = 0x14;
const PIXELFORMAT_OFFSET: usize = 0x4C;
const PF_FLAGS_OFFSET: usize = 0x50;
const PF_FOURCC_OFFSET: usize = 0x54;
const PF_BITCOUNT_OFFSET: usize = 0x58;
const PF_RMASK_OFFSET: usize = 0x5C;
const PF_GMASK_OFFSET: usize = 0x60;
const PF_BMASK_OFFSET: usize = 0x64;
const PF_AMASK_OFFSET: usize = 0x68;
const CAPS_OFFSET: usize = 0x6C;

const DDSD_CAPS: u32 = 0x1;
const DDSD_HEIGHT: u32 = 0x2;
const DDSD_WIDTH: u32 = 0x4;
const DDSD_PITCH: u32 = 0x8;
const DDSD_PIXELFORMAT: u32 = 0x1000;
const DDSCAPS_TEXTURE: u32 = 0x1000;

const DDPF_ALPHAPIXELS: u32 = 0x1;
const DDPF_FOURCC: u32 = 0x4;
const DDPF_PALETTEINDEXED8: u32 = 0x20;
const DDPF_RGB: u32 = 0x40;
const DDPF_LUMINANCE: u32 = 0x20000;

/// Pixel format block of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PixelFormat {
    flags: u32,
    fourcc: u32,
    bit_count: u32,
    /// R (or luminance), G, B, A.
    masks: [u32; 4],
}

impl PixelFormat {
    fn has(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}

/// How pixels of a non-palette surface map to planes.
#[derive(Debug)]
struct MaskedLayout {
    bytes_per_pixel: usize,
    /// Plane channel and its byte offset within a pixel.
    channels: Vec<(Channel, usize)>,
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

fn write_u32(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Byte position of a full-byte channel mask.
fn mask_byte(mask: u32) -> Option<usize> {
    match mask {
        0x0000_00FF => Some(0),
        0x0000_FF00 => Some(1),
        0x00FF_0000 => Some(2),
        0xFF00_0000 => Some(3),
        _ => None,
    }
}

fn fourcc_name(fourcc: u32) -> String {
    fourcc
        .to_le_bytes()
        .iter()
        .map(|&b| if b.is_ascii_graphic() { b as char } else { '?' })
        .collect()
}

/// Block compression schemes that decode through `bcdec_rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockFormat {
    Bc1,
    Bc2,
    Bc3,
    Bc4,
    Bc5,
}

impl BlockFormat {
    fn from_fourcc(fourcc: u32) -> Option<Self> {
        match &fourcc.to_le_bytes() {
            b"DXT1" => Some(BlockFormat::Bc1),
            b"DXT2" | b"DXT3" => Some(BlockFormat::Bc2),
            b"DXT4" | b"DXT5" => Some(BlockFormat::Bc3),
            b"ATI1" | b"BC4U" => Some(BlockFormat::Bc4),
            b"ATI2" | b"BC5U" => Some(BlockFormat::Bc5),
            _ => None,
        }
    }

    fn block_bytes(self) -> usize {
        match self {
            BlockFormat::Bc1 | BlockFormat::Bc4 => 8,
            BlockFormat::Bc2 | BlockFormat::Bc3 | BlockFormat::Bc5 => 16,
        }
    }

    /// Planes produced, each read from the same byte of a decoded RGBA texel.
    fn channels(self) -> &'static [Channel] {
        match self {
            BlockFormat::Bc1 | BlockFormat::Bc2 | BlockFormat::Bc3 => {
                &[Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha]
            }
            BlockFormat::Bc4 => &[Channel::Red],
            BlockFormat::Bc5 => &[Channel::Red, Channel::Green],
        }
    }

    /// Decode one block into 16 RGBA texels, row-major.
    fn decode_block(self, block: &[u8]) -> [u8; 64] {
        let mut texels = [0u8; 64];
        match self {
            BlockFormat::Bc1 => bcdec_rs::bc1(block, &mut texels, BLOCK_PITCH),
            BlockFormat::Bc2 => bcdec_rs::bc2(block, &mut texels, BLOCK_PITCH),
            BlockFormat::Bc3 => bcdec_rs::bc3(block, &mut texels, BLOCK_PITCH),
            BlockFormat::Bc4 => decode_unorm_channel(block, &mut texels, 0),
            BlockFormat::Bc5 => {
                decode_unorm_channel(&block[..8], &mut texels, 0);
                decode_unorm_channel(&block[8..], &mut texels, 1);
            }
        }
        texels
    }
}

/// An unsigned BC4 block is bit-identical to the alpha half of a BC3 block.
fn decode_unorm_channel(block: &[u8], texels: &mut [u8; 64], offset: usize) {
    let mut bc3 = [0u8; 16];
    bc3[..8].copy_from_slice(block);
    let mut decoded = [0u8; 64];
    bcdec_rs::bc3(&bc3, &mut decoded, BLOCK_PITCH);
    for (texel, source) in texels.chunks_exact_mut(4).zip(decoded.chunks_exact(4)) {
        texel[offset] = source[3];
    }
}

/// Codec for `.dds` textures.
#[derive(Debug, Default, Clone, Copy)]
pub struct DdsCodec;

impl DdsCodec {
    pub fn new() -> Self {
        Self
    }
}

fn masked_layout(pf: &PixelFormat) -> Result<MaskedLayout, CodecError> {
    if pf.bit_count == 0 || pf.bit_count % 8 != 0 || pf.bit_count > 32 {
        return Err(CodecError::Unsupported(format!(
            "{}-bit pixels",
            pf.bit_count
        )));
    }
    let bytes_per_pixel = (pf.bit_count / 8) as usize;
    let [r, g, b, a] = pf.masks;

    let mut wanted = if pf.has(DDPF_RGB) {
        vec![(Channel::Red, r), (Channel::Green, g), (Channel::Blue, b)]
    } else if pf.has(DDPF_LUMINANCE) {
        vec![(Channel::Luma, r)]
    } else {
        return Err(CodecError::Unsupported(format!(
            "pixel format flags {:#x}",
            pf.flags
        )));
    };
    if pf.has(DDPF_ALPHAPIXELS) && a != 0 {
        wanted.push((Channel::Alpha, a));
    }

    let channels = wanted
        .into_iter()
        .map(|(channel, mask)| match mask_byte(mask) {
            Some(offset) if offset < bytes_per_pixel => Ok((channel, offset)),
            _ => Err(CodecError::Unsupported(format!(
                "{channel} mask {mask:#010x} in {}-bit pixels",
                pf.bit_count
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MaskedLayout {
        bytes_per_pixel,
        channels,
    })
}

fn pixel_bytes<'a>(data: &'a [u8], offset: usize, len: usize) -> Result<&'a [u8], CodecError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| {
            CodecError::Decode(format!(
                "truncated pixel data: need {} bytes after offset {}, have {}",
                len,
                offset,
                data.len().saturating_sub(offset)
            ))
        })
}

fn decode_masked(
    data: &[u8],
    width: u32,
    height: u32,
    pf: &PixelFormat,
) -> Result<RasterImage, CodecError> {
    let layout = masked_layout(pf)?;
    let pixels = width as usize * height as usize;
    let len = pixels
        .checked_mul(layout.bytes_per_pixel)
        .ok_or_else(|| CodecError::Decode(format!("{width}x{height} surface too large")))?;
    let bytes = pixel_bytes(data, HEADER_SIZE, len)?;

    let planes = layout
        .channels
        .iter()
        .map(|&(channel, offset)| {
            let samples = bytes
                .chunks_exact(layout.bytes_per_pixel)
                .map(|px| px[offset])
                .collect();
            ChannelPlane::new(channel, width, height, samples)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RasterImage::new(width, height, planes)?)
}

fn decode_block_compressed(
    data: &[u8],
    width: u32,
    height: u32,
    format: BlockFormat,
) -> Result<RasterImage, CodecError> {
    let blocks_x = width.div_ceil(4) as usize;
    let blocks_y = height.div_ceil(4) as usize;
    let len = blocks_x
        .checked_mul(blocks_y)
        .and_then(|blocks| blocks.checked_mul(format.block_bytes()))
        .ok_or_else(|| CodecError::Decode(format!("{width}x{height} surface too large")))?;
    let bytes = pixel_bytes(data, HEADER_SIZE, len)?;

    let (w, h) = (width as usize, height as usize);
    let channels = format.channels();
    let mut samples = vec![vec![0u8; w * h]; channels.len()];

    for (index, block) in bytes.chunks_exact(format.block_bytes()).enumerate() {
        let texels = format.decode_block(block);
        let (origin_x, origin_y) = ((index % blocks_x) * 4, (index / blocks_x) * 4);
        for (i, texel) in texels.chunks_exact(4).enumerate() {
            let (x, y) = (origin_x + i % 4, origin_y + i / 4);
            // Edge blocks of non-multiple-of-4 surfaces carry padding texels.
            if x >= w || y >= h {
                continue;
            }
            for (offset, plane) in samples.iter_mut().enumerate() {
                plane[y * w + x] = texel[offset];
            }
        }
    }

    let planes = channels
        .iter()
        .zip(samples)
        .map(|(&channel, samples)| ChannelPlane::new(channel, width, height, samples))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RasterImage::new(width, height, planes)?)
}

fn decode_indexed(
    data: &[u8],
    width: u32,
    height: u32,
    pf: &PixelFormat,
) -> Result<RasterImage, CodecError> {
    if pf.bit_count != 8 {
        return Err(CodecError::Unsupported(format!(
            "{}-bit palette indices",
            pf.bit_count
        )));
    }
    let palette_bytes = pixel_bytes(data, HEADER_SIZE, PALETTE_SIZE)?;
    let entries: Vec<[u8; 4]> = palette_bytes
        .chunks_exact(4)
        .map(|e| [e[0], e[1], e[2], e[3]])
        .collect();
    let transparent_index = if pf.has(DDPF_ALPHAPIXELS) {
        entries.iter().position(|e| e[3] == 0).map(|i| i as u8)
    } else {
        None
    };

    let pixels = width as usize * height as usize;
    let indices = pixel_bytes(data, HEADER_SIZE + PALETTE_SIZE, pixels)?;
    let plane = ChannelPlane::new(Channel::Index, width, height, indices.to_vec())?;

    Ok(RasterImage::new(width, height, vec![plane])?.with_palette(Palette {
        entries,
        transparent_index,
    }))
}

/// Pixel format and per-plane byte offsets used when writing `image`.
fn encode_layout(image: &RasterImage) -> Result<(PixelFormat, Vec<usize>), CodecError> {
    let (pf, offsets) = match image.layout() {
        ChannelLayout::Rgb => (
            PixelFormat {
                flags: DDPF_RGB,
                fourcc: 0,
                bit_count: 24,
                masks: [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0],
            },
            vec![2, 1, 0],
        ),
        ChannelLayout::Rgba => (
            PixelFormat {
                flags: DDPF_RGB | DDPF_ALPHAPIXELS,
                fourcc: 0,
                bit_count: 32,
                masks: [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000],
            },
            vec![2, 1, 0, 3],
        ),
        ChannelLayout::Luma => (
            PixelFormat {
                flags: DDPF_LUMINANCE,
                fourcc: 0,
                bit_count: 8,
                masks: [0x0000_00FF, 0, 0, 0],
            },
            vec![0],
        ),
        ChannelLayout::LumaAlpha => (
            PixelFormat {
                flags: DDPF_LUMINANCE | DDPF_ALPHAPIXELS,
                fourcc: 0,
                bit_count: 16,
                masks: [0x0000_00FF, 0, 0, 0x0000_FF00],
            },
            vec![0, 1],
        ),
        ChannelLayout::Indexed => {
            let alpha = image
                .palette()
                .is_some_and(|p| p.transparent_index.is_some());
            (
                PixelFormat {
                    flags: DDPF_PALETTEINDEXED8 | if alpha { DDPF_ALPHAPIXELS } else { 0 },
                    fourcc: 0,
                    bit_count: 8,
                    masks: [0; 4],
                },
                vec![0],
            )
        }
        ChannelLayout::Other => {
            return Err(CodecError::Unsupported(format!(
                "cannot write planes {:?} to DDS",
                image.channels()
            )));
        }
    };
    Ok((pf, offsets))
}

fn write_header(width: u32, height: u32, pf: &PixelFormat) -> Vec<u8> {
    let mut header = vec![0u8; HEADER_SIZE];
    let pitch = width.saturating_mul(pf.bit_count).div_ceil(8);
    write_u32(&mut header, 0, DDS_MAGIC);
    write_u32(&mut header, 0x04, HEADER_STRUCT_SIZE);
    write_u32(
        &mut header,
        FLAGS_OFFSET,
        DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PITCH | DDSD_PIXELFORMAT,
    );
    write_u32(&mut header, HEIGHT_OFFSET, height);
    write_u32(&mut header, WIDTH_OFFSET, width);
    write_u32(&mut header, PITCH_OFFSET, pitch);
    write_u32(&mut header, PIXELFORMAT_OFFSET, PIXELFORMAT_STRUCT_SIZE);
    write_u32(&mut header, PF_FLAGS_OFFSET, pf.flags);
    write_u32(&mut header, PF_FOURCC_OFFSET, pf.fourcc);
    write_u32(&mut header, PF_BITCOUNT_OFFSET, pf.bit_count);
    write_u32(&mut header, PF_RMASK_OFFSET, pf.masks[0]);
    write_u32(&mut header, PF_GMASK_OFFSET, pf.masks[1]);
    write_u32(&mut header, PF_BMASK_OFFSET, pf.masks[2]);
    write_u32(&mut header, PF_AMASK_OFFSET, pf.masks[3]);
    write_u32(&mut header, CAPS_OFFSET, DDSCAPS_TEXTURE);
    header
}

impl TextureCodec for DdsCodec {
    fn extension(&self) -> &str {
        "dds"
    }

    fn decode(&self, data: &[u8]) -> Result<RasterImage, CodecError> {
        if data.len() < HEADER_SIZE {
            return Err(CodecError::Decode(format!(
                "{} bytes is too short for a DDS header",
                data.len()
            )));
        }
        if read_u32(data, 0) != DDS_MAGIC {
            return Err(CodecError::Decode("missing DDS magic".to_string()));
        }
        let header_size = read_u32(data, 0x04);
        if header_size != HEADER_STRUCT_SIZE {
            return Err(CodecError::Decode(format!(
                "header size {header_size}, expected {HEADER_STRUCT_SIZE}"
            )));
        }

        let width = read_u32(data, WIDTH_OFFSET);
        let height = read_u32(data, HEIGHT_OFFSET);
        if width == 0 || height == 0 {
            return Err(CodecError::Decode(format!(
                "empty surface {width}x{height}"
            )));
        }

        let pf = PixelFormat {
            flags: read_u32(data, PF_FLAGS_OFFSET),
            fourcc: read_u32(data, PF_FOURCC_OFFSET),
            bit_count: read_u32(data, PF_BITCOUNT_OFFSET),
            masks: [
                read_u32(data, PF_RMASK_OFFSET),
                read_u32(data, PF_GMASK_OFFSET),
                read_u32(data, PF_BMASK_OFFSET),
                read_u32(data, PF_AMASK_OFFSET),
            ],
        };

        if pf.has(DDPF_FOURCC) {
            let format = BlockFormat::from_fourcc(pf.fourcc).ok_or_else(|| {
                CodecError::Unsupported(format!(
                    "block-compressed surface ({})",
                    fourcc_name(pf.fourcc)
                ))
            })?;
            return decode_block_compressed(data, width, height, format);
        }
        if pf.has(DDPF_PALETTEINDEXED8) {
            return decode_indexed(data, width, height, &pf);
        }
        decode_masked(data, width, height, &pf)
    }

    fn encode(&self, image: &RasterImage) -> Result<Vec<u8>, CodecError> {
        let (pf, offsets) = encode_layout(image)?;
        let mut out = write_header(image.width(), image.height(), &pf);

        if pf.has(DDPF_PALETTEINDEXED8) {
            let palette = image.palette().cloned().unwrap_or_default();
            if palette.entries.len() > PALETTE_ENTRIES {
                return Err(CodecError::Encode(format!(
                    "palette has {} entries, DDS holds {PALETTE_ENTRIES}",
                    palette.entries.len()
                )));
            }
            // Unused slots are opaque so only the designated entry reads as transparent.
            let mut table = [0u8, 0, 0, 255].repeat(PALETTE_ENTRIES);
            for (slot, entry) in table.chunks_exact_mut(4).zip(&palette.entries) {
                slot.copy_from_slice(entry);
            }
            if let Some(index) = palette.transparent_index {
                table[index as usize * 4 + 3] = 0;
            }
            out.extend_from_slice(&table);
        }

        let bytes_per_pixel = (pf.bit_count / 8) as usize;
        let pixels = image.width() as usize * image.height() as usize;
        let mut body = vec![0u8; pixels * bytes_per_pixel];
        for (plane, &offset) in image.planes().iter().zip(&offsets) {
            for (px, &sample) in body
                .chunks_exact_mut(bytes_per_pixel)
                .zip(plane.samples())
            {
                px[offset] = sample;
            }
        }
        out.extend_from_slice(&body);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{bc3_dds, rgba_image};

    fn header_with(width: u32, height: u32, pf: PixelFormat) -> Vec<u8> {
        write_header(width, height, &pf)
    }

    // =========================================================================
    // Round trips
    // =========================================================================

    #[test]
    fn rgba_round_trip() {
        let img = rgba_image(5, 3, |x, y| [x as u8, y as u8, (x * y) as u8, 200 + x as u8]);
        let codec = DdsCodec::new();
        let bytes = codec.encode(&img).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 5 * 3 * 4);
        assert_eq!(codec.decode(&bytes).unwrap(), img);
    }

    #[test]
    fn rgb_round_trip_is_24_bit() {
        let img = RasterImage::from_interleaved(
            2,
            2,
            &[Channel::Red, Channel::Green, Channel::Blue],
            &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
        )
        .unwrap();
        let codec = DdsCodec::new();
        let bytes = codec.encode(&img).unwrap();
        assert_eq!(read_u32(&bytes, PF_BITCOUNT_OFFSET), 24);
        // B8G8R8 byte order on disk
        assert_eq!(&bytes[HEADER_SIZE..HEADER_SIZE + 3], &[3, 2, 1]);
        assert_eq!(codec.decode(&bytes).unwrap(), img);
    }

    #[test]
    fn luma_alpha_round_trip() {
        let img = RasterImage::from_interleaved(
            2,
            1,
            &[Channel::Luma, Channel::Alpha],
            &[10, 20, 30, 40],
        )
        .unwrap();
        let codec = DdsCodec::new();
        let decoded = codec.decode(&codec.encode(&img).unwrap()).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn indexed_round_trip_keeps_transparent_index() {
        let mut entries = vec![[255, 255, 255, 255]; 4];
        entries[2] = [0, 0, 0, 0];
        let plane = ChannelPlane::new(Channel::Index, 3, 1, vec![0, 2, 1]).unwrap();
        let img = RasterImage::new(3, 1, vec![plane]).unwrap().with_palette(Palette {
            entries,
            transparent_index: Some(2),
        });

        let codec = DdsCodec::new();
        let decoded = codec.decode(&codec.encode(&img).unwrap()).unwrap();
        assert_eq!(decoded.layout(), ChannelLayout::Indexed);
        assert_eq!(decoded.palette().unwrap().transparent_index, Some(2));
        assert_eq!(decoded.palette().unwrap().entries.len(), PALETTE_ENTRIES);
        assert_eq!(decoded.plane(Channel::Index).unwrap().samples(), &[0, 2, 1]);
    }

    #[test]
    fn indexed_padding_is_not_transparent() {
        let plane = ChannelPlane::new(Channel::Index, 2, 1, vec![0, 1]).unwrap();
        let img = RasterImage::new(2, 1, vec![plane]).unwrap().with_palette(Palette {
            entries: vec![[10, 10, 10, 255]; 8],
            transparent_index: Some(5),
        });

        let codec = DdsCodec::new();
        let decoded = codec.decode(&codec.encode(&img).unwrap()).unwrap();
        let palette = decoded.palette().unwrap();
        assert_eq!(palette.transparent_index, Some(5));
        assert_eq!(palette.entries[5][3], 0);
        assert_eq!(palette.entries[200], [0, 0, 0, 255]);
    }

    // =========================================================================
    // Decoding foreign layouts
    // =========================================================================

    #[test]
    fn decodes_r8g8b8a8_mask_order() {
        let pf = PixelFormat {
            flags: DDPF_RGB | DDPF_ALPHAPIXELS,
            fourcc: 0,
            bit_count: 32,
            masks: [0x0000_00FF, 0x0000_FF00, 0x00FF_0000, 0xFF00_0000],
        };
        let mut data = header_with(1, 1, pf);
        data.extend_from_slice(&[11, 22, 33, 44]);

        let img = DdsCodec::new().decode(&data).unwrap();
        assert_eq!(img.layout(), ChannelLayout::Rgba);
        assert_eq!(img.to_interleaved(), vec![11, 22, 33, 44]);
    }

    #[test]
    fn x8r8g8b8_decodes_as_rgb() {
        let pf = PixelFormat {
            flags: DDPF_RGB,
            fourcc: 0,
            bit_count: 32,
            masks: [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0],
        };
        let mut data = header_with(1, 1, pf);
        data.extend_from_slice(&[3, 2, 1, 0xEE]);

        let img = DdsCodec::new().decode(&data).unwrap();
        assert_eq!(img.layout(), ChannelLayout::Rgb);
        assert_eq!(img.to_interleaved(), vec![1, 2, 3]);
    }

    // =========================================================================
    // Block-compressed surfaces
    // =========================================================================

    /// BC3 block: constant alpha `alpha`, colour 565 endpoint `color`.
    fn bc3_block(alpha: u8, color: u16) -> [u8; 16] {
        let [lo, hi] = color.to_le_bytes();
        [alpha, alpha, 0, 0, 0, 0, 0, 0, lo, hi, lo, hi, 0, 0, 0, 0]
    }

    #[test]
    fn decodes_dxt5_to_rgba() {
        // Pure red 565 endpoint, alpha 100 everywhere.
        let data = bc3_dds(4, 4, bc3_block(100, 0xF800));
        let img = DdsCodec::new().decode(&data).unwrap();

        assert_eq!(img.layout(), ChannelLayout::Rgba);
        assert_eq!((img.width(), img.height()), (4, 4));
        assert!(img.plane(Channel::Alpha).unwrap().samples().iter().all(|&a| a == 100));
        assert!(img.plane(Channel::Red).unwrap().samples().iter().all(|&r| r == 255));
        assert!(img.plane(Channel::Green).unwrap().samples().iter().all(|&g| g == 0));
    }

    #[test]
    fn dxt5_edge_blocks_are_cropped() {
        let data = bc3_dds(5, 3, bc3_block(7, 0));
        let img = DdsCodec::new().decode(&data).unwrap();
        assert_eq!((img.width(), img.height()), (5, 3));
        assert_eq!(img.plane(Channel::Alpha).unwrap().samples(), &[7; 15]);
    }

    #[test]
    fn decodes_dxt1_as_opaque() {
        let pf = PixelFormat {
            flags: DDPF_FOURCC,
            fourcc: u32::from_le_bytes(*b"DXT1"),
            bit_count: 0,
            masks: [0; 4],
        };
        let mut data = header_with(4, 4, pf);
        // Green endpoints (c0 > c1), all texels index 0.
        data.extend_from_slice(&[0xE0, 0x07, 0x00, 0x00, 0, 0, 0, 0]);

        let img = DdsCodec::new().decode(&data).unwrap();
        assert_eq!(img.layout(), ChannelLayout::Rgba);
        assert!(img.plane(Channel::Alpha).unwrap().samples().iter().all(|&a| a == 255));
        assert!(img.plane(Channel::Green).unwrap().samples().iter().all(|&g| g == 255));
    }

    #[test]
    fn decodes_bc5_to_red_green() {
        let pf = PixelFormat {
            flags: DDPF_FOURCC,
            fourcc: u32::from_le_bytes(*b"ATI2"),
            bit_count: 0,
            masks: [0; 4],
        };
        let mut data = header_with(4, 4, pf);
        data.extend_from_slice(&[30, 30, 0, 0, 0, 0, 0, 0, 200, 200, 0, 0, 0, 0, 0, 0]);

        let img = DdsCodec::new().decode(&data).unwrap();
        assert_eq!(img.channels(), vec![Channel::Red, Channel::Green]);
        assert_eq!(img.plane(Channel::Red).unwrap().samples(), &[30; 16]);
        assert_eq!(img.plane(Channel::Green).unwrap().samples(), &[200; 16]);
    }

    // =========================================================================
    // Rejections
    // =========================================================================

    #[test]
    fn rejects_short_input() {
        let err = DdsCodec::new().decode(b"DDS ").unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut data = DdsCodec::new()
            .encode(&rgba_image(1, 1, |_, _| [0; 4]))
            .unwrap();
        data[0] = b'X';
        let err = DdsCodec::new().decode(&data).unwrap_err();
        assert!(err.to_string().contains("magic"));
    }

    #[test]
    fn rejects_unknown_fourcc() {
        let pf = PixelFormat {
            flags: DDPF_FOURCC,
            fourcc: u32::from_le_bytes(*b"DX10"),
            bit_count: 0,
            masks: [0; 4],
        };
        let mut data = header_with(4, 4, pf);
        data.extend_from_slice(&[0; 16]);
        let err = DdsCodec::new().decode(&data).unwrap_err();
        assert!(matches!(err, CodecError::Unsupported(ref m) if m.contains("DX10")));
    }

    #[test]
    fn rejects_truncated_blocks() {
        let mut data = bc3_dds(8, 4, [0; 16]);
        data.truncate(data.len() - 1);
        let err = DdsCodec::new().decode(&data).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn rejects_truncated_pixels() {
        let mut data = DdsCodec::new()
            .encode(&rgba_image(4, 4, |_, _| [1; 4]))
            .unwrap();
        data.truncate(data.len() - 1);
        let err = DdsCodec::new().decode(&data).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn rejects_empty_surface() {
        let data = header_with(0, 4, PixelFormat::default());
        assert!(DdsCodec::new().decode(&data).is_err());
    }

    #[test]
    fn rejects_unaligned_masks() {
        let pf = PixelFormat {
            flags: DDPF_RGB,
            fourcc: 0,
            bit_count: 16,
            masks: [0xF800, 0x07E0, 0x001F, 0],
        };
        let mut data = header_with(1, 1, pf);
        data.extend_from_slice(&[0, 0]);
        let err = DdsCodec::new().decode(&data).unwrap_err();
        assert!(matches!(err, CodecError::Unsupported(_)));
    }

    #[test]
    fn encode_rejects_unknown_plane_order() {
        let planes = [Channel::Alpha, Channel::Red]
            .into_iter()
            .map(|c| ChannelPlane::filled(c, 1, 1, 0).unwrap())
            .collect();
        let img = RasterImage::new(1, 1, planes).unwrap();
        assert!(matches!(
            DdsCodec::new().encode(&img),
            Err(CodecError::Unsupported(_))
        ));
    }
}
