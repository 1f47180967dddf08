//! Batch conversion of a texture directory.
//!
//! Walks one directory (non-recursively), picks the files with the configured
//! extension and runs each through:
//!
//! ```text
//! name check → read → decode → transparency check → reconstruct → encode → write
//! ```
//!
//! A file that fails any step is reported and left byte-identical; the batch
//! moves on. Only failing to list the directory (or an unusable config) stops
//! the run.
//!
//! ## Replacement
//!
//! Output is written to a temporary file in the target directory and renamed
//! over the target, so a crash mid-write never leaves a truncated texture.
//!
//! ## Progress
//!
//! Each file produces exactly one [`ConvertEvent`], sent over the optional
//! channel as soon as the file is done. The CLI prints them from a separate
//! thread; the library never prints.

use crate::codec::{self, CodecError, TextureCodec};
use crate::config::{ConfigError, ConvertConfig};
use crate::detect::{has_stem_suffix, has_usable_transparency};
use crate::naming::OutputNaming;
use crate::reconstruct::{EligibleImage, PreconditionError, reconstruct};
use serde::Serialize;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that abort the whole run.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Cannot list directory {}: {source}", path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors confined to one file. Reported, never propagated.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("cannot read file: {0}")]
    Read(#[source] io::Error),
    #[error(transparent)]
    Decode(CodecError),
    #[error("cannot reconstruct: {0}")]
    Precondition(#[from] PreconditionError),
    #[error(transparent)]
    Encode(CodecError),
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// File name does not end with the normal-map suffix.
    NotCandidate,
    /// Decoded fine but carries no usable transparency.
    NoTransparency,
}

/// Outcome of one file, emitted as the batch progresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ConvertEvent {
    Converted {
        path: PathBuf,
        output: PathBuf,
        width: u32,
        height: u32,
    },
    /// Dry run: the file would have been converted.
    WouldConvert { path: PathBuf, output: PathBuf },
    Skipped { path: PathBuf, reason: SkipReason },
    Failed { path: PathBuf, error: String },
}

impl ConvertEvent {
    fn failed(path: &Path, error: FileError) -> Self {
        ConvertEvent::Failed {
            path: path.to_path_buf(),
            error: error.to_string(),
        }
    }
}

/// Per-run counters. A dry-run hit counts as converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, event: &ConvertEvent) {
        match event {
            ConvertEvent::Converted { .. } | ConvertEvent::WouldConvert { .. } => {
                self.converted += 1
            }
            ConvertEvent::Skipped { .. } => self.skipped += 1,
            ConvertEvent::Failed { .. } => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.converted + self.skipped + self.failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} converted, {} skipped, {} failed",
            self.converted, self.skipped, self.failed
        )
    }
}

/// Convert every eligible texture in `dir` with the codec for
/// `config.extension`.
pub fn convert_directory(
    dir: &Path,
    config: &ConvertConfig,
    events: Option<Sender<ConvertEvent>>,
) -> Result<RunSummary, ConvertError> {
    config.validate()?;
    let codec = codec::for_extension(&config.extension).ok_or_else(|| {
        ConfigError::Validation(format!("no codec for extension {:?}", config.extension))
    })?;
    convert_directory_with_codec(codec.as_ref(), dir, config, events)
}

/// Convert using a specific codec (allows testing with mock).
pub fn convert_directory_with_codec(
    codec: &dyn TextureCodec,
    dir: &Path,
    config: &ConvertConfig,
    events: Option<Sender<ConvertEvent>>,
) -> Result<RunSummary, ConvertError> {
    // Listed up front so outputs written during the run are never revisited.
    let entries: Vec<io::Result<fs::DirEntry>> = fs::read_dir(dir)
        .map_err(|source| ConvertError::Discovery {
            path: dir.to_path_buf(),
            source,
        })?
        .collect();

    let naming = config.naming();
    let extension = OsStr::new(&config.extension);
    let mut summary = RunSummary::default();

    for entry in entries {
        let event = match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.extension() != Some(extension) {
                    continue;
                }
                // Follows symlinks, so a linked texture counts as a file.
                match fs::metadata(&path) {
                    Ok(meta) if meta.is_file() => convert_file(codec, &path, config, &naming)
                        .unwrap_or_else(|e| ConvertEvent::failed(&path, e)),
                    Ok(_) => continue,
                    Err(e) => ConvertEvent::failed(&path, FileError::Read(e)),
                }
            }
            Err(e) => ConvertEvent::failed(dir, FileError::Read(e)),
        };

        summary.record(&event);
        if let Some(tx) = &events {
            tx.send(event).ok();
        }
    }

    Ok(summary)
}

/// Run one file through the pipeline. `Err` means the file was left alone.
fn convert_file(
    codec: &dyn TextureCodec,
    path: &Path,
    config: &ConvertConfig,
    naming: &OutputNaming,
) -> Result<ConvertEvent, FileError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    if !has_stem_suffix(&file_name, &config.suffix) {
        return Ok(ConvertEvent::Skipped {
            path: path.to_path_buf(),
            reason: SkipReason::NotCandidate,
        });
    }

    let bytes = fs::read(path).map_err(FileError::Read)?;
    let image = codec.decode(&bytes).map_err(FileError::Decode)?;
    if !has_usable_transparency(&image) {
        return Ok(ConvertEvent::Skipped {
            path: path.to_path_buf(),
            reason: SkipReason::NoTransparency,
        });
    }

    let eligible = EligibleImage::try_from(image)?;
    let (width, height) = (eligible.width(), eligible.height());
    let converted = reconstruct(eligible, config.mode);
    let encoded = codec.encode(&converted).map_err(FileError::Encode)?;

    let output = naming.output_path(path);
    if config.dry_run {
        return Ok(ConvertEvent::WouldConvert {
            path: path.to_path_buf(),
            output,
        });
    }

    write_replacing(&output, &encoded).map_err(|source| FileError::Write {
        path: output.clone(),
        source,
    })?;

    Ok(ConvertEvent::Converted {
        path: path.to_path_buf(),
        output,
        width,
        height,
    })
}

/// Write `bytes` to a temp file beside `target`, then rename it into place.
///
/// An existing target keeps its permissions. A symlinked target is resolved
/// first, so the link survives and the file it points to is replaced.
fn write_replacing(target: &Path, bytes: &[u8]) -> io::Result<()> {
    let target = match fs::symlink_metadata(target) {
        Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(target)?,
        _ => target.to_path_buf(),
    };
    let target = target.as_path();
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    if let Ok(meta) = fs::metadata(target) {
        fs::set_permissions(tmp.path(), meta.permissions())?;
    }
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
