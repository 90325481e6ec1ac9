//! Slideshow configuration.
//!
//! Handles loading, validating, and merging `slideshow.toml`. Three layers
//! are merged, later ones winning key by key:
//!
//! ```text
//! stock defaults  →  <source>/slideshow.toml  →  command-line flags
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [slides]
//! duration_seconds = 5      # Time each slide is shown before auto-advancing
//! background = "#000000"    # Fill behind pictures that don't cover the slide
//!
//! [canvas]
//! width = 960               # Slide size in points (960x540 = 16:9)
//! height = 540
//!
//! [output]
//! base_name = "slideshow"   # File name stem, timestamp appended
//! # folder = "decks"        # Relative to the source folder; default = source folder
//!
//! [scan]
//! recursive = false         # Include images in subfolders
//! shuffle = false           # Random slide order instead of sorted
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::deck::MAX_DURATION_SECONDS;
use crate::types::{Canvas, Color, SlideshowOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the source folder.
pub const CONFIG_FILE_NAME: &str = "slideshow.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Slideshow configuration loaded from `slideshow.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlideshowConfig {
    pub slides: SlidesConfig,
    pub canvas: CanvasConfig,
    pub output: OutputConfig,
    pub scan: ScanConfig,
    pub processing: ProcessingConfig,
}

impl SlideshowConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slides.duration_seconds == 0 {
            return Err(ConfigError::Validation(
                "slides.duration_seconds must be at least 1".into(),
            ));
        }
        if self.slides.duration_seconds > MAX_DURATION_SECONDS {
            return Err(ConfigError::Validation(format!(
                "slides.duration_seconds must be at most {MAX_DURATION_SECONDS}"
            )));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::Validation(
                "canvas.width and canvas.height must be non-zero".into(),
            ));
        }
        if self.output.base_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.base_name must not be empty".into(),
            ));
        }
        if self
            .output
            .base_name
            .contains(|c: char| c == '/' || c == '\\')
        {
            return Err(ConfigError::Validation(
                "output.base_name must be a file name, not a path".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Options for the deck builder. A relative `output.folder` is resolved
    /// against `source_dir`; without one the deck lands in `source_dir`.
    pub fn to_options(&self, source_dir: &Path) -> SlideshowOptions {
        let output_folder = match &self.output.folder {
            Some(folder) if folder.is_absolute() => folder.clone(),
            Some(folder) => source_dir.join(folder),
            None => source_dir.to_path_buf(),
        };
        SlideshowOptions {
            output_folder,
            slide_duration_seconds: self.slides.duration_seconds,
            background_color: self.slides.background,
            canvas: Canvas::from_points(self.canvas.width, self.canvas.height),
            base_name: self.output.base_name.clone(),
        }
    }
}

/// Per-slide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlidesConfig {
    /// Seconds each slide is shown before the fade to the next one.
    pub duration_seconds: u32,
    /// Fill color behind the picture, `#RRGGBB`.
    pub background: Color,
}

impl Default for SlidesConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 5,
            background: Color::BLACK,
        }
    }
}

/// Slide size in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
        }
    }
}

/// Where the deck is written and what it is called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub base_name: String,
    pub folder: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_name: "slideshow".to_string(),
            folder: None,
        }
    }
}

/// Which files become slides, and in what order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    pub recursive: bool,
    pub shuffle: bool,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel inspection workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Command-line overrides
// =============================================================================

/// Values given on the command line. Each `Some` replaces the config value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub duration_seconds: Option<u32>,
    pub background: Option<Color>,
    pub base_name: Option<String>,
    pub output_folder: Option<PathBuf>,
    pub recursive: Option<bool>,
    pub shuffle: Option<bool>,
}

impl Overrides {
    /// Sparse TOML table with only the overridden keys, ready for
    /// [`merge_toml`].
    pub fn to_toml(&self) -> toml::Value {
        let mut slides = toml::Table::new();
        if let Some(d) = self.duration_seconds {
            slides.insert("duration_seconds".into(), toml::Value::Integer(d as i64));
        }
        if let Some(c) = self.background {
            slides.insert("background".into(), toml::Value::String(c.to_string()));
        }

        let mut output = toml::Table::new();
        if let Some(name) = &self.base_name {
            output.insert("base_name".into(), toml::Value::String(name.clone()));
        }
        if let Some(folder) = &self.output_folder {
            output.insert(
                "folder".into(),
                toml::Value::String(folder.to_string_lossy().into_owned()),
            );
        }

        let mut scan = toml::Table::new();
        if let Some(r) = self.recursive {
            scan.insert("recursive".into(), toml::Value::Boolean(r));
        }
        if let Some(s) = self.shuffle {
            scan.insert("shuffle".into(), toml::Value::Boolean(s));
        }

        let mut root = toml::Table::new();
        for (key, table) in [("slides", slides), ("output", output), ("scan", scan)] {
            if !table.is_empty() {
                root.insert(key.into(), toml::Value::Table(table));
            }
        }
        toml::Value::Table(root)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SlideshowConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `slideshow.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<SlideshowConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: SlideshowConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `slideshow.toml` in `source_dir`.
pub fn load_config(source_dir: &Path) -> Result<SlideshowConfig, ConfigError> {
    load_config_with(source_dir, &Overrides::default())
}

/// Load config from `slideshow.toml` in `source_dir`, then apply `overrides`.
pub fn load_config_with(
    source_dir: &Path,
    overrides: &Overrides,
) -> Result<SlideshowConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let file = load_raw_config(source_dir)?;
    resolve_config(base, file.into_iter().chain([overrides.to_toml()]))
}

/// Returns a fully-commented stock `slideshow.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Photo Deck Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as slideshow.toml in the folder holding your photos.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Slides
# ---------------------------------------------------------------------------
[slides]
# Seconds each photo stays on screen before fading to the next one.
duration_seconds = 5

# Color shown around photos that don't fill the slide, as #RRGGBB.
background = "#000000"

# ---------------------------------------------------------------------------
# Canvas
# ---------------------------------------------------------------------------
[canvas]
# Slide size in points. 960x540 is 16:9 widescreen, 720x540 is 4:3.
width = 960
height = 540

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# File name stem. The deck is saved as <base_name>_<YYYYMMDD_HHMM>.pptx,
# with _2, _3, ... appended if that name is taken.
base_name = "slideshow"

# Folder to save into, relative to the photo folder.
# Omit to save next to the photos.
# folder = "decks"

# ---------------------------------------------------------------------------
# Scanning
# ---------------------------------------------------------------------------
[scan]
# Include photos in subfolders.
recursive = false

# Random slide order instead of sorted by file name.
shuffle = false

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for reading photos.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SlideshowConfig::default();
        assert_eq!(config.slides.duration_seconds, 5);
        assert_eq!(config.slides.background, Color::BLACK);
        assert_eq!((config.canvas.width, config.canvas.height), (960, 540));
        assert_eq!(config.output.base_name, "slideshow");
        assert_eq!(config.output.folder, None);
        assert!(!config.scan.recursive && !config.scan.shuffle);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[slides]
background = "#fafafa"
"##;
        let config: SlideshowConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.slides.background, Color::rgb(0xfa, 0xfa, 0xfa));
        assert_eq!(config.slides.duration_seconds, 5);
        assert_eq!(config.canvas.width, 960);
    }

    #[test]
    fn bad_color_is_a_parse_error() {
        let toml = r##"
[slides]
background = "#12345"
"##;
        assert!(toml::from_str::<SlideshowConfig>(toml).is_err());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, SlideshowConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r##"
[slides]
duration_seconds = 8

[output]
base_name = "holiday"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.slides.duration_seconds, 8);
        assert_eq!(config.output.base_name, "holiday");
        assert_eq!(config.slides.background, Color::BLACK);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "[slides\nbroken").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn flags_override_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r##"
[slides]
duration_seconds = 8
background = "#ffffff"

[scan]
shuffle = true
"##,
        )
        .unwrap();

        let overrides = Overrides {
            duration_seconds: Some(3),
            recursive: Some(true),
            ..Overrides::default()
        };
        let config = load_config_with(tmp.path(), &overrides).unwrap();
        assert_eq!(config.slides.duration_seconds, 3);
        assert_eq!(config.slides.background, Color::WHITE);
        assert!(config.scan.recursive);
        assert!(config.scan.shuffle);
    }

    #[test]
    fn flag_values_are_validated_too() {
        let tmp = TempDir::new().unwrap();
        let overrides = Overrides {
            duration_seconds: Some(0),
            ..Overrides::default()
        };
        assert!(matches!(
            load_config_with(tmp.path(), &overrides),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn duration_has_an_upper_bound() {
        let mut config = SlideshowConfig::default();
        config.slides.duration_seconds = MAX_DURATION_SECONDS;
        assert!(config.validate().is_ok());
        config.slides.duration_seconds = MAX_DURATION_SECONDS + 1;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_overrides_are_an_empty_table() {
        let value = Overrides::default().to_toml();
        assert!(value.as_table().unwrap().is_empty());
    }

    #[test]
    fn override_background_round_trips() {
        let overrides = Overrides {
            background: Some(Color::rgb(1, 2, 3)),
            ..Overrides::default()
        };
        let value = overrides.to_toml();
        assert_eq!(
            value
                .get("slides")
                .and_then(|s| s.get("background"))
                .and_then(|b| b.as_str()),
            Some("#010203")
        );
    }

    // =========================================================================
    // to_options tests
    // =========================================================================

    #[test]
    fn options_default_to_source_folder() {
        let config = SlideshowConfig::default();
        let options = config.to_options(Path::new("/photos"));
        assert_eq!(options.output_folder, PathBuf::from("/photos"));
        assert_eq!(options.canvas, Canvas::WIDESCREEN);
        assert_eq!(options.slide_duration_seconds, 5);
        assert_eq!(options.base_name, "slideshow");
    }

    #[test]
    fn relative_output_folder_resolves_against_source() {
        let mut config = SlideshowConfig::default();
        config.output.folder = Some(PathBuf::from("decks"));
        let options = config.to_options(Path::new("/photos"));
        assert_eq!(options.output_folder, PathBuf::from("/photos/decks"));

        config.output.folder = Some(PathBuf::from("/tmp/out"));
        let options = config.to_options(Path::new("/photos"));
        assert_eq!(options.output_folder, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn canvas_points_become_emu() {
        let mut config = SlideshowConfig::default();
        config.canvas.width = 720;
        let options = config.to_options(Path::new("."));
        assert_eq!(options.canvas.width, 9_144_000);
        assert_eq!(options.canvas.height, 6_858_000);
    }

    // =========================================================================
    // processing tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig {
            max_processes: None,
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("duration = 5").unwrap();
        let overlay: toml::Value = toml::from_str("duration = 9").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("duration").unwrap().as_integer(), Some(9));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str(
            r##"
[slides]
duration_seconds = 5
background = "#000000"
"##,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[slides]
duration_seconds = 7
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let slides = merged.get("slides").unwrap();
        assert_eq!(slides.get("duration_seconds").unwrap().as_integer(), Some(7));
        assert_eq!(slides.get("background").unwrap().as_str(), Some("#000000"));
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml = r#"
[slides]
duraton_seconds = 5
"#;
        assert!(toml::from_str::<SlideshowConfig>(toml).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        assert!(toml::from_str::<SlideshowConfig>("[theme]\nfoo = 1").is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(SlideshowConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_canvas() {
        let mut config = SlideshowConfig::default();
        config.canvas.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_base_names() {
        let mut config = SlideshowConfig::default();
        config.output.base_name = "  ".into();
        assert!(config.validate().is_err());
        config.output.base_name = "../escape".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_processes() {
        let mut config = SlideshowConfig::default();
        config.processing.max_processes = Some(0);
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // stock config tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SlideshowConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, SlideshowConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[slides]", "[canvas]", "[output]", "[scan]", "[processing]"] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        assert!(val.is_table());
        for section in ["slides", "canvas", "output", "scan", "processing"] {
            assert!(val.get(section).is_some(), "missing {section}");
        }
    }
}
