//! Attach image bytes to a slide as a media part.

use crate::package::constants::{content_type as ct, relationship_type};
use crate::package::{Package, PackageError, Part, sniff_content_type};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("Unsupported image type: .{0}")]
    UnsupportedType(String),
    #[error("File extension says {declared} but the bytes are {actual}")]
    ContentMismatch { declared: String, actual: String },
    #[error(transparent)]
    Package(#[from] PackageError),
}

/// Content type for an image file extension (case-insensitive, no dot).
///
/// WebP decodes fine but is not accepted by every presentation viewer, so it
/// is rejected along with anything unknown.
pub fn image_content_type(extension: &str) -> Result<&'static str, EmbedError> {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Ok(ct::JPEG),
        "png" => Ok(ct::PNG),
        "gif" => Ok(ct::GIF),
        "bmp" => Ok(ct::BMP),
        "tif" | "tiff" => Ok(ct::TIFF),
        other => Err(EmbedError::UnsupportedType(other.to_string())),
    }
}

/// Add `bytes` as `/ppt/media/image<n>.<ext>` and link it from `slide_part`.
/// Returns the relationship id to put in the picture's `r:embed`.
pub fn embed_image(
    package: &mut Package,
    slide_part: &str,
    bytes: Vec<u8>,
    extension: &str,
) -> Result<String, EmbedError> {
    let declared = image_content_type(extension)?;
    let actual = sniff_content_type(&bytes).unwrap_or("unknown");
    if actual != declared {
        return Err(EmbedError::ContentMismatch {
            declared: declared.to_string(),
            actual: actual.to_string(),
        });
    }

    let extension = extension.to_ascii_lowercase();
    let part_name = package.allocate_part_name("/ppt/media/image", &extension);
    package.add_part(part_name.clone(), Part::binary(declared, bytes))?;
    Ok(package.add_relationship(slide_part, &part_name, relationship_type::IMAGE))
}
