//! CLI output formatting for conversion runs.
//!
//! # Output Format
//!
//! One header line per file, led by its outcome and file name, with details
//! as indented context lines:
//!
//! ```text
//! Converted wall_normal.dds (512x512)
//! Converted rock_normal.dds → rock_normal_rgb.dds (1024x1024)
//! Skipped floor_diffuse.dds: not a normal map
//! Skipped tile_normal.dds: no transparency
//! Failed crate_normal.dds
//!     Error: Decode failed: bad magic 0x00000000
//!
//! 2 converted, 2 skipped, 1 failed
//! ```
//!
//! Dry runs print `Would convert` in place of `Converted`.
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::convert::{ConvertEvent, RunSummary, SkipReason};
use std::path::Path;

/// File name for display, falling back to the full path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `name` alone for in-place output, `name → output` otherwise.
fn source_and_target(path: &Path, output: &Path) -> String {
    if path == output {
        display_name(path)
    } else {
        format!("{} \u{2192} {}", display_name(path), display_name(output))
    }
}

fn skip_reason_text(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::NotCandidate => "not a normal map",
        SkipReason::NoTransparency => "no transparency",
    }
}

// ============================================================================
// Per-file events
// ============================================================================

/// Format a single conversion event as display lines.
pub fn format_convert_event(event: &ConvertEvent) -> Vec<String> {
    match event {
        ConvertEvent::Converted {
            path,
            output,
            width,
            height,
        } => vec![format!(
            "Converted {} ({}x{})",
            source_and_target(path, output),
            width,
            height
        )],
        ConvertEvent::WouldConvert { path, output } => {
            vec![format!("Would convert {}", source_and_target(path, output))]
        }
        ConvertEvent::Skipped { path, reason } => vec![format!(
            "Skipped {}: {}",
            display_name(path),
            skip_reason_text(*reason)
        )],
        ConvertEvent::Failed { path, error } => vec![
            format!("Failed {}", display_name(path)),
            format!("    Error: {}", error),
        ],
    }
}

pub fn print_convert_event(event: &ConvertEvent) {
    for line in format_convert_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// Run summary
// ============================================================================

/// Format the end-of-run summary, preceded by a blank separator line.
pub fn format_summary(summary: &RunSummary, dry_run: bool) -> Vec<String> {
    let mut lines = vec![String::new(), summary.to_string()];
    if dry_run {
        lines.push("Dry run: no files were written".to_string());
    }
    lines
}

pub fn print_summary(summary: &RunSummary, dry_run: bool) {
    for line in format_summary(summary, dry_run) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    // =========================================================================
    // Event formatting tests
    // =========================================================================

    #[test]
    fn converted_in_place() {
        let event = ConvertEvent::Converted {
            path: PathBuf::from("/tex/wall_normal.dds"),
            output: PathBuf::from("/tex/wall_normal.dds"),
            width: 512,
            height: 256,
        };
        assert_eq!(
            format_convert_event(&event),
            vec!["Converted wall_normal.dds (512x256)"]
        );
    }

    #[test]
    fn converted_to_suffixed_output() {
        let event = ConvertEvent::Converted {
            path: PathBuf::from("/tex/rock_normal.dds"),
            output: PathBuf::from("/tex/rock_normal_rgb.dds"),
            width: 4,
            height: 4,
        };
        assert_eq!(
            format_convert_event(&event),
            vec!["Converted rock_normal.dds \u{2192} rock_normal_rgb.dds (4x4)"]
        );
    }

    #[test]
    fn would_convert() {
        let event = ConvertEvent::WouldConvert {
            path: PathBuf::from("a_normal.dds"),
            output: PathBuf::from("a_normal.dds"),
        };
        assert_eq!(format_convert_event(&event), vec!["Would convert a_normal.dds"]);
    }

    #[test]
    fn skipped_reasons() {
        let not_candidate = ConvertEvent::Skipped {
            path: PathBuf::from("dir/floor.dds"),
            reason: SkipReason::NotCandidate,
        };
        let opaque = ConvertEvent::Skipped {
            path: PathBuf::from("dir/tile_normal.dds"),
            reason: SkipReason::NoTransparency,
        };
        assert_eq!(
            format_convert_event(&not_candidate),
            vec!["Skipped floor.dds: not a normal map"]
        );
        assert_eq!(
            format_convert_event(&opaque),
            vec!["Skipped tile_normal.dds: no transparency"]
        );
    }

    #[test]
    fn failed_shows_error_as_context() {
        let event = ConvertEvent::Failed {
            path: PathBuf::from("/tex/crate_normal.dds"),
            error: "Decode failed: bad magic".to_string(),
        };
        let lines = format_convert_event(&event);
        assert_eq!(lines[0], "Failed crate_normal.dds");
        assert_eq!(lines[1], "    Error: Decode failed: bad magic");
    }

    #[test]
    fn path_without_file_name_is_shown_whole() {
        let event = ConvertEvent::Failed {
            path: PathBuf::from("/"),
            error: "x".to_string(),
        };
        assert_eq!(format_convert_event(&event)[0], "Failed /");
    }

    // =========================================================================
    // Summary formatting tests
    // =========================================================================

    #[test]
    fn summary_lines() {
        let summary = RunSummary {
            converted: 2,
            skipped: 1,
            failed: 0,
        };
        assert_eq!(
            format_summary(&summary, false),
            vec!["", "2 converted, 1 skipped, 0 failed"]
        );
    }

    #[test]
    fn summary_notes_dry_run() {
        let lines = format_summary(&RunSummary::default(), true);
        assert_eq!(lines.last().unwrap(), "Dry run: no files were written");
    }
}
