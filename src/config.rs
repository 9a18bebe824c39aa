//! Frame configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the user file, which only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! `config.toml` is read from the directory given by `--config` (default:
//! the working directory). A missing file means "all defaults".
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [view]
//! width = 500               # Rendered composition size (= export size)
//! height = 500
//!
//! [editor]
//! max_width = 752           # Crop editor area the photo is fitted into
//! max_height = 600
//!
//! [crop]
//! x = 5.0                   # Initial crop, percent of the displayed photo
//! y = 5.0
//! width = 90.0
//! height = 90.0
//! aspect_lock = true        # Keep the crop square
//! quality = 92              # JPEG quality of the rasterized crop (1-100)
//!
//! [processing]
//! max_threads = 4           # Pixel worker threads (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Dimensions, DisplayBounds, Quality};
use crate::types::CropRectangle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
///
/// Every field has a default, so an empty or missing `config.toml` is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameConfig {
    /// Size of the composition (frame + crop) and therefore of the export.
    pub view: ViewConfig,
    /// Crop editor layout bounds.
    pub editor: EditorConfig,
    /// Initial crop rectangle and crop encoding.
    pub crop: CropConfig,
    /// Parallel pixel processing settings.
    pub processing: ProcessingConfig,
}

impl FrameConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.view.width == 0 || self.view.height == 0 {
            return Err(ConfigError::Validation(
                "view.width and view.height must be non-zero".into(),
            ));
        }
        if self.editor.max_width == 0 || self.editor.max_height == 0 {
            return Err(ConfigError::Validation(
                "editor.max_width and editor.max_height must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.crop.quality) {
            return Err(ConfigError::Validation("crop.quality must be 1-100".into()));
        }
        let c = &self.crop;
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !(in_range(c.x) && in_range(c.y) && in_range(c.width) && in_range(c.height)) {
            return Err(ConfigError::Validation(
                "crop.x, crop.y, crop.width and crop.height must be 0-100".into(),
            ));
        }
        if c.width == 0.0 || c.height == 0.0 {
            return Err(ConfigError::Validation(
                "crop.width and crop.height must be non-zero".into(),
            ));
        }
        if c.x + c.width > 100.0 || c.y + c.height > 100.0 {
            return Err(ConfigError::Validation(
                "crop must lie inside the image (x + width <= 100, y + height <= 100)".into(),
            ));
        }
        Ok(())
    }
}

/// Composition canvas size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    pub width: u32,
    pub height: u32,
}

impl ViewConfig {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::from((self.width, self.height))
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
        }
    }
}

/// Area the uploaded photo is fitted into while cropping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub max_width: u32,
    pub max_height: u32,
}

impl EditorConfig {
    pub fn bounds(&self) -> DisplayBounds {
        DisplayBounds {
            max_width: self.max_width,
            max_height: self.max_height,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        // 800px dialog minus padding, 60% of a 1000px viewport
        Self {
            max_width: 752,
            max_height: 600,
        }
    }
}

/// Initial crop rectangle (percent units) and crop encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropConfig {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Keep the crop square in displayed pixels.
    pub aspect_lock: bool,
    /// JPEG quality of the rasterized crop (1 = worst, 100 = best).
    pub quality: u32,
}

impl CropConfig {
    /// The rectangle a freshly opened editor starts from.
    pub fn initial_rectangle(&self) -> CropRectangle {
        let rect = CropRectangle::new(self.x, self.y, self.width, self.height);
        if self.aspect_lock { rect } else { rect.unlocked() }
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.quality)
    }
}

impl Default for CropConfig {
    fn default() -> Self {
        let rect = CropRectangle::default();
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            aspect_lock: true,
            quality: Quality::default().value(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of worker threads for pixel loops.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_threads
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(FrameConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
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

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<FrameConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: FrameConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<FrameConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    let config = resolve_config(base, overlay)?;
    log::debug!("loaded config from {}: {config:?}", root.display());
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Photo Frame Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Composition
# ---------------------------------------------------------------------------
[view]
# Rendered size of the framed photo in pixels. The exported
# framed-photo.png has exactly this size.
width = 500
height = 500

# ---------------------------------------------------------------------------
# Crop editor
# ---------------------------------------------------------------------------
[editor]
# The uploaded photo is scaled down (never up) to fit this area.
# Crop coordinates are percentages of the fitted size.
max_width = 752
max_height = 600

# ---------------------------------------------------------------------------
# Crop
# ---------------------------------------------------------------------------
[crop]
# Initial crop rectangle, in percent of the displayed photo.
x = 5.0
y = 5.0
width = 90.0
height = 90.0

# Keep the crop square so it fills the circular cutout.
aspect_lock = true

# JPEG quality of the rasterized crop (1 = worst, 100 = best).
quality = 92

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum worker threads for pixel loops.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_threads = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_layout() {
        let config = FrameConfig::default();
        assert_eq!(config.view.dimensions(), Dimensions::new(500, 500));
        assert_eq!(config.editor.bounds().max_width, 752);
        assert_eq!(config.editor.bounds().max_height, 600);
        assert_eq!(config.crop.initial_rectangle(), CropRectangle::default());
        assert_eq!(config.crop.quality(), Quality::new(92));
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[view]
width = 800
"#;
        let config: FrameConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.view.width, 800);
        // Default values preserved
        assert_eq!(config.view.height, 500);
        assert_eq!(config.crop.quality, 92);
    }

    #[test]
    fn unlocked_crop_config() {
        let toml = r#"
[crop]
aspect_lock = false
"#;
        let config: FrameConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.crop.initial_rectangle().aspect, None);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.view.width, 500);
        assert_eq!(config.crop.x, 5.0);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[crop]
x = 10.0
width = 50.0
quality = 80
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.crop.x, 10.0);
        assert_eq!(config.crop.width, 50.0);
        assert_eq!(config.crop.quality, 80);
        // Unspecified values should be defaults
        assert_eq!(config.crop.y, 5.0);
        assert_eq!(config.editor.max_height, 600);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[view]\ndepth = 3\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<FrameConfig, _> = toml::from_str("[frame]\nsource = \"x.png\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(FrameConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_view_rejected() {
        let mut config = FrameConfig::default();
        config.view.height = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_zero_editor_rejected() {
        let mut config = FrameConfig::default();
        config.editor.max_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_quality_bounds() {
        let mut config = FrameConfig::default();
        config.crop.quality = 0;
        assert!(config.validate().is_err());
        config.crop.quality = 100;
        assert!(config.validate().is_ok());
        config.crop.quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_crop_outside_image_rejected() {
        let mut config = FrameConfig::default();
        config.crop.x = 20.0;
        config.crop.width = 90.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_empty_crop_rejected() {
        let mut config = FrameConfig::default();
        config.crop.height = 0.0;
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // Merging tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_nested_tables() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[crop]\nquality = 70").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["crop"]["quality"].as_integer(), Some(70));
        assert_eq!(merged["crop"]["x"].as_float(), Some(5.0));
        assert_eq!(merged["view"]["width"].as_integer(), Some(500));
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[view]\nwidth = 0").unwrap();
        assert!(resolve_config(base, Some(overlay)).is_err());
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let parsed: FrameConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = FrameConfig::default();
        assert_eq!(parsed.view.dimensions(), defaults.view.dimensions());
        assert_eq!(parsed.editor.max_width, defaults.editor.max_width);
        assert_eq!(parsed.crop.initial_rectangle(), defaults.crop.initial_rectangle());
        assert_eq!(parsed.crop.quality, defaults.crop.quality);
        assert_eq!(parsed.processing.max_threads, None);
    }

    // =========================================================================
    // Thread count tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_threads: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_zero_means_one() {
        let config = ProcessingConfig {
            max_threads: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }
}
