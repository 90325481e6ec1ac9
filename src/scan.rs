//! Source folder scanning.
//!
//! Finds the images a deck is built from. By default only the top level of
//! the source folder is read; with `recursive` the whole tree is walked.
//!
//! ```text
//! photos/
//! ├── slideshow.toml       # config (optional, not an image)
//! ├── 001-dawn.jpg         # ✓
//! ├── 002-noon.PNG         # ✓ extension match is case-insensitive
//! ├── 003-dusk.webp        # ✓ picked up, later skipped by the deck builder
//! ├── ._001-dawn.jpg       # ✗ hidden (macOS resource fork)
//! ├── notes.txt            # ✗ not an image
//! └── extras/              # only with recursive = true
//!     └── 001-night.jpg
//! ```
//!
//! Results are sorted by path so `001-…`, `002-…` prefixes control slide
//! order, unless `shuffle` is set.

use crate::config::ScanConfig;
use crate::imaging::supported_input_extensions;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// List the images under `root`, sorted (or shuffled) and deduplicated.
pub fn scan_images(root: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let max_depth = if config.recursive { usize::MAX } else { 1 };
    let mut images = Vec::new();
    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_image(entry.path()) {
            images.push(entry.into_path());
        }
    }

    images.sort();
    images.dedup();

    if config.shuffle {
        images.shuffle(&mut rand::rng());
    }
    Ok(images)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| supported_input_extensions().contains(&ext.as_str()))
}
