//! Pure calculation functions for picture placement.
//!
//! All functions here are pure and testable without any I/O or images.
//! Pixel sizes cross into EMU exactly once, in [`calculate_placement`], using
//! the fixed 96-DPI factor [`EMU_PER_PIXEL`].

use crate::types::{Canvas, EMU_PER_PIXEL};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GeometryError {
    #[error(
        "Placement needs positive dimensions (image {pixel_width}x{pixel_height} px, canvas {canvas_width}x{canvas_height} EMU)"
    )]
    NonPositive {
        pixel_width: u32,
        pixel_height: u32,
        canvas_width: i64,
        canvas_height: i64,
    },
}

/// Where a picture sits on the slide, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub offset_x: i64,
    pub offset_y: i64,
    pub extent_width: i64,
    pub extent_height: i64,
}

/// Convert a pixel length to EMU at 96 DPI.
pub fn pixels_to_emu(pixels: u32) -> i64 {
    pixels as i64 * EMU_PER_PIXEL
}

/// Fit an image inside the canvas, preserving aspect ratio, centered.
///
/// ```text
/// scale  = min(canvas_w / image_w, canvas_h / image_h)
/// extent = image * scale          (rounded, never larger than the canvas)
/// offset = (canvas - extent) / 2
/// ```
///
/// Images smaller than the canvas are scaled up; the picture always touches
/// two opposite canvas edges.
///
/// # Examples
/// ```
/// # use photo_deck::imaging::calculate_placement;
/// # use photo_deck::types::Canvas;
/// // 4:3 on a 16:9 slide → full height, pillarboxed
/// let p = calculate_placement((800, 600), Canvas::WIDESCREEN).unwrap();
/// assert_eq!((p.extent_width, p.extent_height), (9_144_000, 6_858_000));
/// assert_eq!((p.offset_x, p.offset_y), (1_524_000, 0));
/// ```
pub fn calculate_placement(pixels: (u32, u32), canvas: Canvas) -> Result<Placement, GeometryError> {
    let (px_w, px_h) = pixels;
    if px_w == 0 || px_h == 0 || canvas.width <= 0 || canvas.height <= 0 {
        return Err(GeometryError::NonPositive {
            pixel_width: px_w,
            pixel_height: px_h,
            canvas_width: canvas.width,
            canvas_height: canvas.height,
        });
    }

    let image_w = pixels_to_emu(px_w) as f64;
    let image_h = pixels_to_emu(px_h) as f64;

    let scale = (canvas.width as f64 / image_w).min(canvas.height as f64 / image_h);

    let extent_width = ((image_w * scale).round() as i64).clamp(1, canvas.width);
    let extent_height = ((image_h * scale).round() as i64).clamp(1, canvas.height);

    Ok(Placement {
        offset_x: (canvas.width - extent_width) / 2,
        offset_y: (canvas.height - extent_height) / 2,
        extent_width,
        extent_height,
    })
}
