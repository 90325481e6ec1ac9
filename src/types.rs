//! Shared value types passed between the config layer, the scanner and the
//! deck pipeline.
//!
//! Lengths inside the package are EMUs (English Metric Units): 914 400 per
//! inch, so one 96-DPI pixel is 9 525 EMU and one point is 12 700 EMU.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// EMUs per pixel at the 96 DPI baseline.
pub const EMU_PER_PIXEL: i64 = 9_525;

/// EMUs per typographic point.
pub const EMU_PER_POINT: i64 = 12_700;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid color '{0}': expected six hex digits like #1A2B3C")]
pub struct ColorParseError(pub String);

/// An sRGB color, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Six uppercase hex digits without a leading `#`, as DrawingML expects.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Accepts `#RRGGBB` or `RRGGBB`, either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ColorParseError(s.to_string()))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Slide size in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: i64,
    pub height: i64,
}

impl Canvas {
    /// 16:9 widescreen, 13.333 × 7.5 inches.
    pub const WIDESCREEN: Canvas = Canvas {
        width: 12_192_000,
        height: 6_858_000,
    };

    pub const fn from_points(width: u32, height: u32) -> Self {
        Self {
            width: width as i64 * EMU_PER_POINT,
            height: height as i64 * EMU_PER_POINT,
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::WIDESCREEN
    }
}

/// Everything the deck pipeline needs besides the image list.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideshowOptions {
    /// Directory the finished `.pptx` is written into. Must exist.
    pub output_folder: PathBuf,
    /// How long each slide stays up before auto-advancing.
    pub slide_duration_seconds: u32,
    pub background_color: Color,
    pub canvas: Canvas,
    /// File name stem; a timestamp is appended by [`crate::naming`].
    pub base_name: String,
}

impl SlideshowOptions {
    pub fn new(output_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
            slide_duration_seconds: 5,
            background_color: Color::BLACK,
            canvas: Canvas::WIDESCREEN,
            base_name: "slideshow".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parses_with_and_without_hash() {
        assert_eq!("#1a2B3c".parse::<Color>(), Ok(Color::rgb(0x1a, 0x2b, 0x3c)));
        assert_eq!("FFFFFF".parse::<Color>(), Ok(Color::WHITE));
    }

    #[test]
    fn color_rejects_bad_input() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("#GGGGGG".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn color_hex_is_uppercase_without_hash() {
        assert_eq!(Color::rgb(10, 171, 255).to_hex(), "0AABFF");
        assert_eq!(Color::BLACK.to_hex(), "000000");
        assert_eq!(Color::rgb(10, 171, 255).to_string(), "#0AABFF");
    }

    #[test]
    fn widescreen_matches_960_by_540_points() {
        assert_eq!(Canvas::from_points(960, 540), Canvas::WIDESCREEN);
    }

    #[test]
    fn default_options() {
        let opts = SlideshowOptions::new("/tmp/out");
        assert_eq!(opts.slide_duration_seconds, 5);
        assert_eq!(opts.background_color, Color::BLACK);
        assert_eq!(opts.base_name, "slideshow");
    }
}
