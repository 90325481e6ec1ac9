//! Presentation data model.
//!
//! ```text
//! Presentation
//! ├── canvas: Canvas (EMU)
//! ├── master (exactly one, implicit)
//! └── slides: Vec<Slide>        ← input order, ids 1..=n
//!     ├── background: Color
//!     ├── picture: Picture      ← pixel size only, placement derived
//!     └── transition: TransitionSpec
//! ```

use crate::imaging::{GeometryError, Placement, calculate_placement};
use crate::types::{Canvas, Color};
use std::path::PathBuf;

/// Id of the single slide master in the presentation's master list.
pub const SLIDE_MASTER_ID: u32 = 2_147_483_648;

/// Serialized slide ids must be at least 256; slide 1 becomes 256.
pub const SLIDE_ID_OFFSET: u32 = 255;

/// Longest slide duration whose milliseconds still fit the `unsignedInt`
/// that `advTm` and the timing node's `dur` are typed as.
pub const MAX_DURATION_SECONDS: u32 = u32::MAX / 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionEffect {
    #[default]
    Fade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSpec {
    pub effect: TransitionEffect,
    pub advance_after_seconds: u32,
    pub advance_on_click: bool,
}

impl TransitionSpec {
    /// Fade in, then auto-advance after `seconds`. Clicks never advance.
    pub fn fade_after(seconds: u32) -> Self {
        Self {
            effect: TransitionEffect::Fade,
            advance_after_seconds: seconds,
            advance_on_click: false,
        }
    }

    pub fn advance_after_millis(&self) -> u64 {
        self.advance_after_seconds as u64 * 1000
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub source_path: PathBuf,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl Picture {
    pub fn placement(&self, canvas: Canvas) -> Result<Placement, GeometryError> {
        calculate_placement((self.pixel_width, self.pixel_height), canvas)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub id: u32,
    pub background: Color,
    pub picture: Picture,
    pub transition: TransitionSpec,
    pub duration_seconds: u32,
}

impl Slide {
    /// Value of `<p:sldId id>` in the presentation part.
    pub fn serialized_id(&self) -> u32 {
        SLIDE_ID_OFFSET + self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub canvas: Canvas,
    slides: Vec<Slide>,
}

impl Presentation {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            slides: Vec::new(),
        }
    }

    /// Append a slide, assigning the next id.
    pub fn push_slide(
        &mut self,
        picture: Picture,
        background: Color,
        duration_seconds: u32,
    ) -> &Slide {
        let id = self.slides.len() as u32 + 1;
        self.slides.push(Slide {
            id,
            background,
            picture,
            transition: TransitionSpec::fade_after(duration_seconds),
            duration_seconds,
        });
        &self.slides[self.slides.len() - 1]
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picture(name: &str, w: u32, h: u32) -> Picture {
        Picture {
            source_path: PathBuf::from(name),
            pixel_width: w,
            pixel_height: h,
        }
    }

    #[test]
    fn slide_ids_are_sequential_from_one() {
        let mut pres = Presentation::new(Canvas::WIDESCREEN);
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            pres.push_slide(picture(name, 10, 10), Color::BLACK, 5);
        }
        let ids: Vec<u32> = pres.slides().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(pres.slides()[0].serialized_id(), 256);
    }

    #[test]
    fn transition_never_advances_on_click() {
        let mut pres = Presentation::new(Canvas::WIDESCREEN);
        let slide = pres.push_slide(picture("a.jpg", 10, 10), Color::WHITE, 7);
        assert_eq!(slide.transition.effect, TransitionEffect::Fade);
        assert!(!slide.transition.advance_on_click);
        assert_eq!(slide.transition.advance_after_millis(), 7000);
    }

    #[test]
    fn longest_duration_fits_unsigned_int_millis() {
        let spec = TransitionSpec::fade_after(MAX_DURATION_SECONDS);
        assert!(spec.advance_after_millis() <= u32::MAX as u64);
        let over = TransitionSpec::fade_after(MAX_DURATION_SECONDS + 1);
        assert!(over.advance_after_millis() > u32::MAX as u64);
    }

    #[test]
    fn placement_is_derived_from_pixels() {
        let p = picture("a.jpg", 1920, 1080)
            .placement(Canvas::WIDESCREEN)
            .unwrap();
        assert_eq!(p.extent_width, Canvas::WIDESCREEN.width);
    }
}
