//! Configuration for the pure-Rust backend and the CLI.
//!
//! Handles loading, validating, and merging `simple-fit.toml`. User files are
//! sparse: stock defaults are the base layer and the file only overrides the
//! keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! format = "png"            # png | jpeg | webp (webp is lossless)
//! quality = 90              # JPEG quality (1-100)
//!
//! [render]
//! filter = "lanczos3"       # nearest | triangle | catmull-rom | gaussian | lanczos3
//! max_surface_pixels = 268435456
//!
//! [limits]
//! timeout_ms = 30000        # Give up on a single conversion (omit for no limit)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{OutputFormat, Quality, RenderSettings, ResampleFilter};
use crate::imaging::rust_backend::DEFAULT_MAX_SURFACE_PIXELS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "simple-fit.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `simple-fit.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FitConfig {
    /// Export settings for re-encoded images.
    pub output: OutputConfig,
    /// Surface allocation and resampling.
    pub render: RenderConfig,
    /// Time limits.
    pub limits: LimitsConfig,
}

impl FitConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if self.render.max_surface_pixels == 0 {
            return Err(ConfigError::Validation(
                "render.max_surface_pixels must be non-zero".into(),
            ));
        }
        if self.limits.timeout_ms == Some(0) {
            return Err(ConfigError::Validation(
                "limits.timeout_ms must be non-zero (omit it for no limit)".into(),
            ));
        }
        Ok(())
    }

    /// Backend settings derived from this config.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            format: self.output.format,
            quality: Quality::new(self.output.quality),
            filter: self.render.filter,
            max_surface_pixels: self.render.max_surface_pixels,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.limits.timeout_ms.map(Duration::from_millis)
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Format scaled images are exported as.
    pub format: OutputFormat,
    /// Lossy quality, only used by JPEG.
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            quality: Quality::default().value(),
        }
    }
}

/// Surface and resampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub filter: ResampleFilter,
    /// Surfaces with more pixels than this fail to allocate.
    pub max_surface_pixels: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            filter: ResampleFilter::Lanczos3,
            max_surface_pixels: DEFAULT_MAX_SURFACE_PIXELS,
        }
    }
}

/// Time limits. A conversion that outlives its limit is abandoned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Per-file limit in milliseconds. Absent means wait forever.
    pub timeout_ms: Option<u64>,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(FitConfig::default())
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<FitConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: FitConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults if it is absent.
pub fn load_config(path: &Path) -> Result<FitConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Returns a fully-commented stock `simple-fit.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# simple-fit configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Export of scaled images
# ---------------------------------------------------------------------------
[output]
# png (lossless), jpeg (lossy, uses quality) or webp (lossless).
format = "png"

# JPEG quality (1 = worst, 100 = best).
quality = 90

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[render]
# Resampling filter: nearest, triangle, catmull-rom, gaussian, lanczos3.
filter = "lanczos3"

# Largest surface, in pixels, that may be allocated (16384 x 16384).
max_surface_pixels = 268435456

# ---------------------------------------------------------------------------
# Limits
# ---------------------------------------------------------------------------
[limits]
# Abandon a single file after this many milliseconds.
# Omit or comment out to wait indefinitely.
# timeout_ms = 30000
"##
}
