//! Pure Rust inspection backend built on the `image` crate.
//!
//! Only the container header is parsed: `ImageReader::into_dimensions` stops
//! as soon as the width and height are known. The bytes are already in
//! memory, so nothing here touches the file system.

use super::backend::{BackendError, Dimensions, ImageBackend};
use image::ImageReader;
use std::io::Cursor;
use std::path::Path;

/// Extensions the scanner hands to the pipeline.
///
/// WebP is listed on purpose: it is a real image the scanner should pick up,
/// and the embedder is what rejects it for the package.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp",
];

/// Returns the extensions (lowercase, no dot) recognised as images.
pub fn supported_input_extensions() -> &'static [&'static str] {
    IMAGE_EXTENSIONS
}

/// Backend using the `image` crate's header readers.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| BackendError::from_io(path, e))?;

        if reader.format().is_none() {
            return Err(BackendError::Decode {
                path: path.to_path_buf(),
                reason: "unrecognised image format".to_string(),
            });
        }

        let (width, height) = reader.into_dimensions().map_err(|e| BackendError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if width == 0 || height == 0 {
            return Err(BackendError::Decode {
                path: path.to_path_buf(),
                reason: format!("image has no pixels ({width}x{height})"),
            });
        }

        Ok(Dimensions { width, height })
    }
}
