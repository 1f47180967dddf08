//! # normal-remap
//!
//! Batch conversion of two-channel normal-map textures into plain RGB.
//!
//! Source textures store the X component of the surface direction in the
//! **alpha** channel and Y in **green**; the Z component is absent. Target
//! pipelines expect X, Y and Z in red, green and blue. This crate finds the
//! eligible textures in a directory and rewrites them.
//!
//! # Pipeline
//!
//! ```text
//! directory ─► *.dds ─► name ends in "normal"? ─► decode ─► has transparency?
//!                                                               │
//!        write (temp + rename) ◄─ encode ◄─ reconstruct ◄───────┘
//! ```
//!
//! Every file is independent. A file that cannot be read, decoded, converted
//! or written is reported and left byte-identical; the rest of the batch
//! carries on.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`raster`] | In-memory image model: tagged channel planes, palette, transparency marker |
//! | [`detect`] | Eligibility predicates: filename suffix and usable transparency |
//! | [`reconstruct`] | Alpha/green remap and blue-channel reconstruction |
//! | [`codec`] | `TextureCodec` trait; DDS, PNG and TGA implementations |
//! | [`convert`] | Directory driver: discovery, per-file isolation, atomic replacement |
//! | [`naming`] | Output path rule (in place or suffixed) |
//! | [`config`] | `ConvertConfig` defaults, TOML loading and validation |
//! | [`output`] | CLI output formatting for conversion events and the run summary |
//!
//! # Design Decisions
//!
//! ## Literal Reconstruction by Default
//!
//! The default [`reconstruct::ReconstructionMode::Literal`] reproduces the
//! established output of this conversion bit for bit, including its 8-bit
//! wrap-around for large inputs. The mathematically normalized variant is
//! available as an explicit mode, never silently substituted.
//!
//! ## Codecs Behind a Trait
//!
//! The driver only sees bytes and [`raster::RasterImage`]s. The `image` crate
//! has no DDS support, so DDS has its own codec: it parses the legacy header,
//! hands block-compressed surfaces to `bcdec_rs` and always writes
//! uncompressed output. PNG and TGA go through `image`.

pub mod codec;
pub mod config;
pub mod convert;
pub mod detect;
pub mod naming;
pub mod output;
pub mod raster;
pub mod reconstruct;

#[cfg(test)]
pub(crate) mod test_helpers;
