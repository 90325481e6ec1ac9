//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every photo is shown by its position in the deck and its file name, with
//! the rest (dimensions, skip reason, source folder) as indented context
//! lines underneath. The same header shape is used by `check` and `build` so
//! a photo reads the same in both.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Photos
//! 001 dawn.jpg (4000x3000 image/jpeg)
//! 002 dusk.webp
//!     Skipped: unsupported type
//! 003 night.jpg (3000x4000 image/jpeg)
//!     Source: extras/
//!
//! 2 usable, 1 skipped
//! ```
//!
//! ## Build
//!
//! ```text
//! Skipped
//!     dusk.webp: unsupported type
//!
//! Wrote 2 slides → slideshow_20261018_0942.pptx
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::deck::{CheckedImage, SkippedImage, SlideshowReport};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `Source:` line for photos in a subfolder of the source root. Photos at
/// the top level get none.
fn source_line(path: &Path, source_root: &Path) -> Option<String> {
    let parent = path.parent()?;
    let rel = parent.strip_prefix(source_root).ok()?;
    if rel.as_os_str().is_empty() {
        return None;
    }
    Some(format!("{}Source: {}/", indent(1), rel.display()))
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

// ============================================================================
// Check
// ============================================================================

/// Format the result of `check`: one entry per photo, then a tally.
pub fn format_check_output(
    results: &[Result<CheckedImage, SkippedImage>],
    source_root: &Path,
) -> Vec<String> {
    if results.is_empty() {
        return vec!["No photos found".to_string()];
    }

    let mut lines = vec!["Photos".to_string()];
    let mut skipped = 0;
    for (i, result) in results.iter().enumerate() {
        let index = format_index(i + 1);
        let path = match result {
            Ok(image) => {
                lines.push(format!(
                    "{} {} ({}x{} {})",
                    index,
                    file_name(&image.path),
                    image.dimensions.width,
                    image.dimensions.height,
                    image.content_type
                ));
                &image.path
            }
            Err(skip) => {
                skipped += 1;
                lines.push(format!("{} {}", index, file_name(&skip.path)));
                lines.push(format!("{}Skipped: {}", indent(1), skip.reason));
                if !skip.detail.is_empty() {
                    lines.push(format!("{}{}", indent(2), skip.detail));
                }
                &skip.path
            }
        };
        lines.extend(source_line(path, source_root));
    }

    lines.push(String::new());
    lines.push(format!(
        "{} usable, {} skipped",
        results.len() - skipped,
        skipped
    ));
    lines
}

pub fn print_check_output(results: &[Result<CheckedImage, SkippedImage>], source_root: &Path) {
    for line in format_check_output(results, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format the summary printed after `build` writes a deck.
pub fn format_build_report(report: &SlideshowReport) -> Vec<String> {
    let mut lines = Vec::new();
    if !report.skipped.is_empty() {
        lines.push("Skipped".to_string());
        for skip in &report.skipped {
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                file_name(&skip.path),
                skip.reason
            ));
        }
        lines.push(String::new());
    }
    lines.push(format!(
        "Wrote {} → {}",
        plural(report.slides, "slide", "slides"),
        report.path.display()
    ));
    lines
}

pub fn print_build_report(report: &SlideshowReport) {
    for line in format_build_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Scan
// ============================================================================

/// One line per photo the scanner found, in deck order.
pub fn format_scan_output(images: &[std::path::PathBuf], source_root: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Found {} in {}",
        plural(images.len(), "photo", "photos"),
        source_root.display()
    )];
    for (i, path) in images.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), file_name(path)));
        lines.extend(source_line(path, source_root));
    }
    lines
}

pub fn print_scan_output(images: &[std::path::PathBuf], source_root: &Path) {
    for line in format_scan_output(images, source_root) {
        println!("{}", line);
    }
}
