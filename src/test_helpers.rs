//! Shared test utilities for the photo-deck test suite.
//!
//! Generates small real images (so the `image` crate and the content sniffer
//! see genuine headers) and reads finished archives back.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let photo = write_jpeg(tmp.path(), "001.jpg", 8, 6);
//!
//! let deck = build_deck(&backend, &[photo], &options).unwrap();
//! assert!(zip_entry_names(&deck.bytes).contains(&"ppt/slides/slide1.xml".to_string()));
//! ```

use image::{ImageFormat, Rgb, RgbImage};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

// =========================================================================
// Image fixtures
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    })
}

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    gradient(width, height).write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// PNG bytes of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

/// JPEG bytes of the given size.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

/// Write a PNG into `dir` and return its path.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, png_bytes(width, height)).unwrap();
    path
}

/// Write a JPEG into `dir` and return its path.
pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, jpeg_bytes(width, height)).unwrap();
    path
}

// =========================================================================
// Archive readback
// =========================================================================

/// Entry names in archive order.
pub fn zip_entry_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// Contents of one entry as UTF-8. Panics if the entry is missing.
pub fn zip_entry_text(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap_or_else(|_| {
        let names = zip_entry_names(bytes);
        panic!("entry '{name}' not found. Available: {names:?}")
    });
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    text
}
