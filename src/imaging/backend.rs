//! Image inspection backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between the deck pipeline and the
//! code that actually parses image headers. The pipeline reads each file
//! once and hands the bytes over, so the dimensions always describe the
//! bytes that get embedded. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend); tests use the mock in
//! [`tests`] so pipeline logic can run without real images.
//!
//! Failures are split three ways so callers can tell a file that vanished
//! from one that could not be read and from one whose bytes are not an image:
//!
//! | Variant | Meaning |
//! |---|---|
//! | [`BackendError::NotFound`] | nothing at that path |
//! | [`BackendError::Io`] | the file exists but could not be opened or read |
//! | [`BackendError::Decode`] | the bytes are corrupt, truncated, or not a supported raster format |

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Image not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
}

impl BackendError {
    /// Classify an I/O error raised while reading `path`.
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Trait for image inspection backends.
///
/// `Sync` so a single backend can be shared across rayon workers during the
/// parallel inspection pass.
pub trait ImageBackend: Sync {
    /// Pixel dimensions of the image held in `bytes`, decoding no more than
    /// the header. `path` is where the bytes came from, for error messages.
    fn identify(&self, path: &Path, bytes: &[u8]) -> Result<Dimensions, BackendError>;
}
