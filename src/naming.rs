//! Output filename rule for converted textures.
//!
//! By default a converted texture replaces its source file under the same
//! name. With an output suffix the result is written next to the source:
//!
//! - `wall_normal.dds` + `InPlace` → `wall_normal.dds`
//! - `wall_normal.dds` + `Suffixed("_rgb")` → `wall_normal_rgb.dds`
//!
//! A suffixed output no longer ends in the normal-map suffix, so a second
//! run does not pick it up again.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// How the output path is derived from the input path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputNaming {
    /// Overwrite the source file.
    #[default]
    InPlace,
    /// Append the suffix to the file stem, keep the extension.
    Suffixed(String),
}

impl OutputNaming {
    /// `None` or an empty suffix means in-place.
    pub fn from_suffix(suffix: Option<&str>) -> Self {
        match suffix {
            Some(s) if !s.is_empty() => OutputNaming::Suffixed(s.to_string()),
            _ => OutputNaming::InPlace,
        }
    }

    pub fn output_path(&self, input: &Path) -> PathBuf {
        match self {
            OutputNaming::InPlace => input.to_path_buf(),
            OutputNaming::Suffixed(suffix) => {
                let mut name: OsString = input.file_stem().unwrap_or_default().to_os_string();
                name.push(suffix);
                if let Some(ext) = input.extension() {
                    name.push(".");
                    name.push(ext);
                }
                input.with_file_name(name)
            }
        }
    }
}
