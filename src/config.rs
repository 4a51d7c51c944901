//! Share configuration module.
//!
//! Handles loading, validating, and merging `share.toml`. Stock defaults are
//! overridden by the user's file; both layers are sparse TOML tables merged
//! key by key before deserialization.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! locale = "en-US"          # Date label language
//!
//! [output]
//! encoding = "png"          # "png" or "jpeg"
//! quality = 92              # JPEG quality (1-100)
//!
//! [photos]
//! thumbnail_quality = 90    # Quality requested for managed thumbnails
//! origin_fallback = false   # Use unmanaged bytes when no thumbnail exists
//!
//! [colors]
//! background = "#faf7f2"
//! text = "#222222"          # Title and content
//! date = "#8a8580"
//! brand = "#b5afa8"
//! placeholder = "#e8e4de"   # Photo area when the entry has no photos
//!
//! [fonts]
//! # regular = "/path/to/Regular.ttf"
//! # bold = "/path/to/Bold.ttf"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [colors]
//! background = "#ffffff"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::compose::{Palette, PhotoOptions, Quality};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

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

/// Share configuration loaded from `share.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShareConfig {
    /// Locale used for the date label (`en-US`, `ko-KR`, ...).
    pub locale: String,
    /// Encoding of the rendered image.
    pub output: OutputConfig,
    /// How photo bytes are requested.
    pub photos: PhotosConfig,
    /// Canvas and text colors.
    pub colors: ColorConfig,
    /// Optional font files replacing the embedded faces.
    pub fonts: FontsConfig,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            output: OutputConfig::default(),
            photos: PhotosConfig::default(),
            colors: ColorConfig::default(),
            fonts: FontsConfig::default(),
        }
    }
}

impl ShareConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if !(1..=100).contains(&self.photos.thumbnail_quality) {
            return Err(ConfigError::Validation(
                "photos.thumbnail_quality must be 1-100".into(),
            ));
        }
        if self.locale.trim().is_empty() {
            return Err(ConfigError::Validation("locale must not be empty".into()));
        }
        self.colors.resolve()?;
        Ok(())
    }

    pub fn photo_options(&self) -> PhotoOptions {
        PhotoOptions {
            quality: Quality::new(self.photos.thumbnail_quality),
            origin_fallback: self.photos.origin_fallback,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputEncoding {
    #[default]
    Png,
    Jpeg,
}

impl OutputEncoding {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => write!(f, "png"),
            Self::Jpeg => write!(f, "jpeg"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub encoding: OutputEncoding,
    /// JPEG quality; ignored for PNG.
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            encoding: OutputEncoding::Png,
            quality: 92,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhotosConfig {
    pub thumbnail_quality: u32,
    pub origin_fallback: bool,
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            thumbnail_quality: 90,
            origin_fallback: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub background: String,
    pub text: String,
    pub date: String,
    pub brand: String,
    pub placeholder: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#faf7f2".to_string(),
            text: "#222222".to_string(),
            date: "#8a8580".to_string(),
            brand: "#b5afa8".to_string(),
            placeholder: "#e8e4de".to_string(),
        }
    }
}

/// [`ColorConfig`] parsed into pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedColors {
    pub background: Rgba<u8>,
    pub placeholder: Rgba<u8>,
    pub palette: Palette,
}

impl ColorConfig {
    pub fn resolve(&self) -> Result<ResolvedColors, ConfigError> {
        let parse = |key: &str, value: &str| {
            parse_hex_color(value).ok_or_else(|| {
                ConfigError::Validation(format!(
                    "colors.{key} must be #rgb or #rrggbb, got {value:?}"
                ))
            })
        };
        Ok(ResolvedColors {
            background: parse("background", &self.background)?,
            placeholder: parse("placeholder", &self.placeholder)?,
            palette: Palette {
                text: parse("text", &self.text)?,
                date: parse("date", &self.date)?,
                brand: parse("brand", &self.brand)?,
            },
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<PathBuf>,
}

/// Parse `#rgb` or `#rrggbb` into an opaque color.
pub fn parse_hex_color(value: &str) -> Option<Rgba<u8>> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (out, i) in rgb.iter_mut().zip(0..3) {
                *out = channel(&hex[i..i + 1])? * 17;
            }
            Some(Rgba([rgb[0], rgb[1], rgb[2], 255]))
        }
        6 => Some(Rgba([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        ])),
        _ => None,
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ShareConfig::default())?)
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

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ShareConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ShareConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, or the stock defaults when `path` is `None`.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file is an error: the caller asked
/// for it explicitly.
pub fn load_config(path: Option<&Path>) -> Result<ShareConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `share.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Diary Share Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Locale for the date label. The language subtag picks the pattern:
# en "Mar 7, 2024", ko "2024. 3. 7.", ja/zh "2024/3/7", de "7.3.2024",
# fr/es/it "07/03/2024", anything else "2024-03-07".
locale = "en-US"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# "png" (lossless) or "jpeg".
encoding = "png"

# JPEG quality (1 = worst, 100 = best). Ignored for PNG.
quality = 92

# ---------------------------------------------------------------------------
# Photos
# ---------------------------------------------------------------------------
[photos]
# Quality requested for color-managed thumbnails (1-100).
thumbnail_quality = 90

# When a color-managed thumbnail is unavailable, draw the original file
# bytes instead. Wide-gamut photos may look washed out on this path.
origin_fallback = false

# ---------------------------------------------------------------------------
# Colors (#rgb or #rrggbb)
# ---------------------------------------------------------------------------
[colors]
background = "#faf7f2"
text = "#222222"          # Title and content
date = "#8a8580"
brand = "#b5afa8"         # "Made with Photo Diary" stamp
placeholder = "#e8e4de"   # Photo area when the entry has no photos

# ---------------------------------------------------------------------------
# Fonts
# ---------------------------------------------------------------------------
[fonts]
# TrueType/OpenType files replacing the embedded DejaVu Sans faces.
# regular = "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf"
# bold = "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf"
"##
}
