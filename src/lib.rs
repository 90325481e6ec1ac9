//! # Photo Deck
//!
//! Turns a folder of photos into a self-running slide deck: one photo per
//! slide, scaled to fit, centered on a solid background, each slide fading to
//! the next after a fixed time. The output is an Office Open XML presentation
//! (`.pptx`) written directly, with no office suite involved.
//!
//! # Architecture: Scan → Build → Write
//!
//! ```text
//! 1. Scan    photos/  →  Vec<PathBuf>      (which files, in what order)
//! 2. Build   paths    →  Deck { bytes }    (inspect, place, assemble, zip)
//! 3. Write   Deck     →  slideshow_<stamp>.pptx (atomic, never overwrites)
//! ```
//!
//! Building is a pure function of the image list and options, held entirely in
//! memory. Nothing touches the output folder until the final write, so a
//! failed build leaves no partial file.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Finds the photos in the source folder, sorted or shuffled |
//! | [`imaging`] | Reads pixel dimensions from image headers and fits them onto the slide |
//! | [`deck`] | Presentation model, slide XML builders, image embedding, the build pipeline |
//! | [`package`] | Generic OPC package: parts, relationships, content types, zip output |
//! | [`xml`] | Minimal ordered XML element tree with escaping |
//! | [`naming`] | Timestamped, collision-free output file names |
//! | [`config`] | `slideshow.toml` loading, validation, merging with command-line flags |
//! | [`types`] | Shared value types: `Color`, `Canvas`, `SlideshowOptions` |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Generic Element Tree
//!
//! Slides, the master, the presentation part, relationship parts and the
//! content-types registry are all built from the same [`xml::Element`] type
//! rather than one struct per XML element. The format has hundreds of element
//! types and this crate uses a few dozen, always in fixed shapes; a typed
//! model would be mostly boilerplate.
//!
//! ## Skip, Don't Fail
//!
//! A folder of photos usually has a few files that can't go in a deck: a WebP
//! from a phone, a truncated download, a `.jpg` that is really a PNG. Those
//! are reported and skipped; the deck is built from everything else. Only a
//! folder with no usable photo at all is an error.
//!
//! ## Ids Belong to the Build
//!
//! Slide ids, media part numbers and relationship ids are counters owned by a
//! single [`package::Package`] and the build that fills it. Nothing is global,
//! so two builds in one process produce identical output for identical input.

pub mod config;
pub mod deck;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod package;
pub mod scan;
pub mod types;
pub mod xml;

#[cfg(test)]
pub(crate) mod test_helpers;
