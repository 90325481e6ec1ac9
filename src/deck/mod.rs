//! Slideshow assembly: image paths in, `.pptx` bytes out.
//!
//! ## Pipeline
//!
//! ```text
//! images ──► pre-pass (parallel, rayon)     extension check, read once, identify from bytes
//!        ──► merge (sequential, input order) skip failures, embed, assign slide ids
//!        ──► assembly                        presentation + master + slide parts
//!        ──► Package::finalize               validated zip bytes
//! ```
//!
//! The pre-pass touches no shared state; every id counter and the package
//! itself are owned by the sequential merge, so slide ids, media names and
//! relationship ids come out the same regardless of thread count.
//!
//! A bad input image never aborts the deck. It is recorded as a
//! [`SkippedImage`], logged at `warn`, and the deck is built from the rest.
//! Only when nothing usable is left does the build fail with
//! [`DeckError::NoSlides`].

pub mod embed;
pub mod model;
pub mod parts;

pub use embed::{EmbedError, embed_image, image_content_type};
pub use model::{
    MAX_DURATION_SECONDS, Picture, Presentation, Slide, TransitionEffect, TransitionSpec,
};

use crate::imaging::{BackendError, Dimensions, GeometryError, ImageBackend, RustBackend};
use crate::naming;
use crate::package::constants::{PACKAGE_ROOT, content_type as ct, relationship_type};
use crate::package::{Package, PackageError, Part, sniff_content_type};
use crate::types::SlideshowOptions;
use rayon::prelude::*;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

const PRESENTATION_PART: &str = "/ppt/presentation.xml";
const SLIDE_MASTER_PART: &str = "/ppt/slideMasters/slideMaster1.xml";

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Package error: {0}")]
    Package(#[from] PackageError),
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Slide duration must be at least one second")]
    ZeroDuration,
    #[error("Slide duration of {0} s is longer than the {MAX_DURATION_SECONDS} s maximum")]
    DurationTooLong(u32),
    #[error("No usable images ({skipped} skipped)")]
    NoSlides { skipped: usize },
    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Extension the package cannot carry (WebP, or not an image at all).
    UnsupportedType,
    /// Nothing at the path by the time it was read.
    Missing,
    /// Present but unreadable or undecodable.
    Unreadable,
    /// Bytes are a different format than the extension claims.
    ContentMismatch,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkipReason::UnsupportedType => "unsupported type",
            SkipReason::Missing => "missing",
            SkipReason::Unreadable => "unreadable",
            SkipReason::ContentMismatch => "content mismatch",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedImage {
    pub path: PathBuf,
    pub reason: SkipReason,
    pub detail: String,
}

impl SkippedImage {
    fn new(path: &Path, reason: SkipReason, detail: impl ToString) -> Self {
        Self {
            path: path.to_path_buf(),
            reason,
            detail: detail.to_string(),
        }
    }
}

/// A finished deck held in memory.
#[derive(Debug)]
pub struct Deck {
    pub bytes: Vec<u8>,
    pub slide_count: usize,
    pub skipped: Vec<SkippedImage>,
}

/// What [`create_slideshow`] produced.
#[derive(Debug)]
pub struct SlideshowReport {
    pub path: PathBuf,
    pub slides: usize,
    pub skipped: Vec<SkippedImage>,
}

/// An image that survived the pre-pass.
struct LoadedImage {
    path: PathBuf,
    extension: String,
    dimensions: Dimensions,
    bytes: Vec<u8>,
}

fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Extension check, one read, identify from the bytes read. Runs on rayon
/// workers.
fn load_image(backend: &impl ImageBackend, path: &Path) -> Result<LoadedImage, SkippedImage> {
    let extension = lowercase_extension(path);
    image_content_type(&extension)
        .map_err(|e| SkippedImage::new(path, SkipReason::UnsupportedType, e))?;

    let skip = |e: BackendError| {
        let reason = match e {
            BackendError::NotFound(_) => SkipReason::Missing,
            BackendError::Io { .. } | BackendError::Decode { .. } => SkipReason::Unreadable,
        };
        SkippedImage::new(path, reason, e)
    };
    let bytes = std::fs::read(path).map_err(|e| skip(BackendError::from_io(path, e)))?;
    let dimensions = backend.identify(path, &bytes).map_err(skip)?;

    Ok(LoadedImage {
        path: path.to_path_buf(),
        extension,
        dimensions,
        bytes,
    })
}

/// An image that would become a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedImage {
    pub path: PathBuf,
    pub dimensions: Dimensions,
    pub content_type: &'static str,
}

/// Run every per-image check [`build_deck`] runs, without building anything.
/// Results are in input order.
pub fn check_images(
    backend: &impl ImageBackend,
    images: &[PathBuf],
) -> Vec<Result<CheckedImage, SkippedImage>> {
    images
        .par_iter()
        .map(|path| {
            let image = load_image(backend, path)?;
            let declared = image_content_type(&image.extension)
                .map_err(|e| SkippedImage::new(path, SkipReason::UnsupportedType, e))?;
            let actual = sniff_content_type(&image.bytes).unwrap_or("unknown");
            if actual != declared {
                return Err(SkippedImage::new(
                    path,
                    SkipReason::ContentMismatch,
                    EmbedError::ContentMismatch {
                        declared: declared.to_string(),
                        actual: actual.to_string(),
                    },
                ));
            }
            Ok(CheckedImage {
                path: image.path,
                dimensions: image.dimensions,
                content_type: declared,
            })
        })
        .collect()
}

fn slide_part_name(slide_id: u32) -> String {
    format!("/ppt/slides/slide{slide_id}.xml")
}

/// Build a deck from `images`, in order, using `backend` to inspect them.
pub fn build_deck(
    backend: &impl ImageBackend,
    images: &[PathBuf],
    options: &SlideshowOptions,
) -> Result<Deck, DeckError> {
    if options.slide_duration_seconds == 0 {
        return Err(DeckError::ZeroDuration);
    }
    if options.slide_duration_seconds > MAX_DURATION_SECONDS {
        return Err(DeckError::DurationTooLong(options.slide_duration_seconds));
    }

    let loaded: Vec<Result<LoadedImage, SkippedImage>> = images
        .par_iter()
        .map(|path| load_image(backend, path))
        .collect();

    let mut package = Package::new();
    let mut presentation = Presentation::new(options.canvas);
    let mut image_rel_ids = Vec::new();
    let mut skipped = Vec::new();

    for result in loaded {
        let image = match result {
            Ok(image) => image,
            Err(skip) => {
                log::warn!("Skipping {} ({}): {}", skip.path.display(), skip.reason, skip.detail);
                skipped.push(skip);
                continue;
            }
        };

        let slide_part = slide_part_name(presentation.slides().len() as u32 + 1);
        let rel_id = match embed_image(&mut package, &slide_part, image.bytes, &image.extension) {
            Ok(rel_id) => rel_id,
            Err(EmbedError::Package(e)) => return Err(e.into()),
            Err(e) => {
                let reason = match e {
                    EmbedError::UnsupportedType(_) => SkipReason::UnsupportedType,
                    _ => SkipReason::ContentMismatch,
                };
                let skip = SkippedImage::new(&image.path, reason, e);
                log::warn!("Skipping {} ({}): {}", skip.path.display(), skip.reason, skip.detail);
                skipped.push(skip);
                continue;
            }
        };

        let slide = presentation.push_slide(
            Picture {
                source_path: image.path,
                pixel_width: image.dimensions.width,
                pixel_height: image.dimensions.height,
            },
            options.background_color,
            options.slide_duration_seconds,
        );
        log::debug!(
            "Slide {} ← {} ({}x{})",
            slide.id,
            slide.picture.source_path.display(),
            slide.picture.pixel_width,
            slide.picture.pixel_height
        );
        image_rel_ids.push(rel_id);
    }

    if presentation.is_empty() {
        return Err(DeckError::NoSlides {
            skipped: skipped.len(),
        });
    }

    assemble(&mut package, &presentation, &image_rel_ids)?;
    log::debug!("Assembled {} parts", package.part_names().count());

    Ok(Deck {
        bytes: package.finalize()?,
        slide_count: presentation.slides().len(),
        skipped,
    })
}

/// Add the presentation, master and slide parts plus the relationships that
/// tie them together. Media parts are already in the package.
fn assemble(
    package: &mut Package,
    presentation: &Presentation,
    image_rel_ids: &[String],
) -> Result<(), DeckError> {
    package.add_relationship(PACKAGE_ROOT, PRESENTATION_PART, relationship_type::OFFICE_DOCUMENT);
    let master_rel_id = package.add_relationship(
        PRESENTATION_PART,
        SLIDE_MASTER_PART,
        relationship_type::SLIDE_MASTER,
    );
    let slide_rel_ids: Vec<String> = presentation
        .slides()
        .iter()
        .map(|slide| {
            package.add_relationship(
                PRESENTATION_PART,
                &slide_part_name(slide.id),
                relationship_type::SLIDE,
            )
        })
        .collect();

    package.add_part(
        PRESENTATION_PART,
        Part::xml(
            ct::PML_PRESENTATION_MAIN,
            parts::presentation_tree(presentation, &master_rel_id, &slide_rel_ids),
        ),
    )?;
    package.add_part(
        SLIDE_MASTER_PART,
        Part::xml(ct::PML_SLIDE_MASTER, parts::slide_master_tree()),
    )?;

    for (slide, image_rel_id) in presentation.slides().iter().zip(image_rel_ids) {
        let tree = parts::slide_tree(slide, presentation.canvas, image_rel_id)?;
        package.add_part(slide_part_name(slide.id), Part::xml(ct::PML_SLIDE, tree))?;
    }
    Ok(())
}

/// Write `deck` into `output_dir` under a fresh timestamped name.
///
/// The bytes go to a temporary file in the same directory which is then
/// renamed into place, so a failed write leaves nothing behind and an
/// existing file is never overwritten.
pub fn write_deck(deck: &Deck, output_dir: &Path, base_name: &str) -> Result<PathBuf, DeckError> {
    let path = naming::unique_output_path(output_dir, base_name, "pptx");

    let write = || -> std::io::Result<()> {
        let mut tmp = NamedTempFile::new_in(output_dir)?;
        tmp.write_all(&deck.bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist_noclobber(&path).map_err(|e| e.error)?;
        Ok(())
    };
    write().map_err(|source| DeckError::Write {
        path: path.clone(),
        source,
    })?;

    log::info!("Wrote {} ({} slides)", path.display(), deck.slide_count);
    Ok(path)
}

/// Build a deck from `images` with the image-crate backend and write it to
/// `options.output_folder`.
pub fn create_slideshow(
    images: &[PathBuf],
    options: &SlideshowOptions,
) -> Result<SlideshowReport, DeckError> {
    let deck = build_deck(&RustBackend::new(), images, options)?;
    let path = write_deck(&deck, &options.output_folder, &options.base_name)?;
    Ok(SlideshowReport {
        path,
        slides: deck.slide_count,
        skipped: deck.skipped,
    })
}
