//! Conversion configuration.
//!
//! The driver itself never reads files or the environment: it takes a plain
//! [`ConvertConfig`] value. The CLI builds that value from stock defaults, an
//! optional TOML file named with `--config`, and command-line flags (flags
//! win).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! extension = "dds"         # Source texture extension (dds, png, tga)
//! suffix = "normal"         # Required end of the file stem
//! mode = "literal"          # literal | normalized
//! # output_suffix = "_rgb"  # Write <stem><suffix>.<ext> instead of in place
//! dry_run = false           # Detect and reconstruct, write nothing
//!
//! [processing]
//! max_threads = 4           # Pixel worker threads (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::codec::SUPPORTED_EXTENSIONS;
use crate::naming::OutputNaming;
use crate::reconstruct::ReconstructionMode;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings for one conversion run.
///
/// All fields have defaults that reproduce the plain in-place conversion of
/// `*normal.dds` files. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Source extension without the dot, matched case-sensitively.
    pub extension: String,
    /// Suffix the file stem must end with.
    pub suffix: String,
    /// Blue-channel reconstruction convention.
    pub mode: ReconstructionMode,
    /// When set, write next to the source instead of replacing it.
    pub output_suffix: Option<String>,
    /// Report what would be converted without writing.
    pub dry_run: bool,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            extension: "dds".to_string(),
            suffix: crate::detect::DEFAULT_SUFFIX.to_string(),
            mode: ReconstructionMode::default(),
            output_suffix: None,
            dry_run: false,
            processing: ProcessingConfig::default(),
        }
    }
}

impl ConvertConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SUPPORTED_EXTENSIONS.contains(&self.extension.as_str()) {
            return Err(ConfigError::Validation(format!(
                "extension must be one of {}, got {:?}",
                SUPPORTED_EXTENSIONS.join(", "),
                self.extension
            )));
        }
        if self.suffix.is_empty() {
            return Err(ConfigError::Validation("suffix must not be empty".into()));
        }
        if self
            .output_suffix
            .as_deref()
            .is_some_and(|out| out.contains(['/', '\\']))
        {
            return Err(ConfigError::Validation(
                "output_suffix must not contain path separators".into(),
            ));
        }
        if self.processing.max_threads == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn naming(&self) -> OutputNaming {
        OutputNaming::from_suffix(self.output_suffix.as_deref())
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of threads used for per-pixel work.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_threads.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse and validate a TOML config string.
pub fn parse_config(content: &str) -> Result<ConvertConfig, ConfigError> {
    let config: ConvertConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit file path.
///
/// Missing keys take stock defaults, unknown keys are rejected, and the
/// result is validated.
pub fn load_config(path: &Path) -> Result<ConvertConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# normal-remap Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Pass this file with --config. Command-line flags override it.
# Unknown keys will cause an error.

# Source texture extension, without the dot. Case-sensitive.
# Supported: dds, png, tga
extension = "dds"

# Only files whose name (before the extension) ends with this are considered.
suffix = "normal"

# How the blue channel is rebuilt from the alpha/green pair.
#   literal    - sqrt(|1 - (x^2 + y^2)|) on raw byte values, rounded to one
#                decimal and narrowed to 8 bits
#   normalized - bytes read as unit-vector components in [-1, 1]
mode = "literal"

# Write converted files as <stem><output_suffix>.<ext> next to the source
# instead of replacing the source. Must not contain path separators.
# output_suffix = "_rgb"

# Detect and reconstruct, but write nothing.
dry_run = false

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum threads for per-pixel work inside one texture.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_threads = 4
"##
}
