//! Eligibility checks for the two-channel normal-map convention.
//!
//! A file is converted only when both predicates hold:
//!
//! 1. [`is_candidate_normal_map`]: its file stem ends in the normal-map
//!    suffix (`wall_normal.dds`). Cheap string test, run before decoding.
//! 2. [`has_usable_transparency`]: the decoded image actually stores data in
//!    its alpha channel. The source convention only puts the X component in
//!    alpha when the asset needs no real transparency, so a fully opaque alpha
//!    plane means the file was never encoded that way and must be left alone.

use crate::raster::{Channel, ChannelLayout, RasterImage};
use std::path::Path;

/// Suffix that marks a normal map in the default configuration.
pub const DEFAULT_SUFFIX: &str = "normal";

/// Alpha value of a fully opaque sample.
const OPAQUE: u8 = 255;

/// True when the file stem of `filename` ends with [`DEFAULT_SUFFIX`].
///
/// ```
/// use normal_remap::detect::is_candidate_normal_map;
/// assert!(is_candidate_normal_map("wall_normal.dds"));
/// assert!(!is_candidate_normal_map("wall_Normal.dds"));
/// assert!(!is_candidate_normal_map("wall.dds"));
/// ```
pub fn is_candidate_normal_map(filename: &str) -> bool {
    has_stem_suffix(filename, DEFAULT_SUFFIX)
}

/// True when `filename` has an extension and the characters right before it
/// equal `suffix`. Case-sensitive; a name without an extension never matches.
pub fn has_stem_suffix(filename: &str, suffix: &str) -> bool {
    let path = Path::new(filename);
    if path.extension().is_none() {
        return false;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(suffix))
}

/// Does the image carry transparency information worth reconstructing from?
///
/// Checked in order: an explicit container marker, a used transparent palette
/// index, then an alpha plane whose minimum is below fully opaque.
pub fn has_usable_transparency(image: &RasterImage) -> bool {
    if image.transparency().is_some() {
        return true;
    }

    if image.layout() == ChannelLayout::Indexed {
        return uses_transparent_index(image);
    }

    match image.plane(Channel::Alpha) {
        Some(alpha) => alpha.min_sample().is_some_and(|min| min < OPAQUE),
        None => false,
    }
}

fn uses_transparent_index(image: &RasterImage) -> bool {
    let Some(transparent) = image.palette().and_then(|p| p.transparent_index) else {
        return false;
    };
    image
        .plane(Channel::Index)
        .is_some_and(|plane| plane.samples().contains(&transparent))
}
