//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. The
//! [`operations`](super::operations) module turns them into backend calls,
//! and the [`RustBackend`](super::RustBackend) reads the encoder settings.
//!
//! ## Types
//!
//! - [`ScaleOptions`]: Bounding constraints for a scale call. At least one axis must be set.
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`OutputFormat`]: Format a surface exports to (PNG by default).
//! - [`ResampleFilter`]: Filter used for the scaled blit.

use image::ImageFormat;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised synchronously when a scale call carries no size constraint.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("scale options need a height or a width constraint")]
pub struct InvalidOptionsError;

/// Bounding constraints for [`scale`](super::scale).
///
/// `None` means "no constraint on this axis". `Some(0)` is a real (degenerate)
/// constraint and is not treated as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScaleOptions {
    /// Maximum height (ratio mode) or exact height (free mode).
    pub height: Option<u32>,
    /// Maximum width (ratio mode) or exact width (free mode).
    pub width: Option<u32>,
    /// Keep the original aspect ratio. When false each axis is set independently.
    pub preserve_ratio: bool,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            height: None,
            width: None,
            preserve_ratio: true,
        }
    }
}

impl ScaleOptions {
    /// Fit within `height` x `width`, keeping the aspect ratio.
    pub fn fit(height: u32, width: u32) -> Self {
        Self {
            height: Some(height),
            width: Some(width),
            ..Self::default()
        }
    }

    pub fn max_height(height: u32) -> Self {
        Self {
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn max_width(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    /// Stretch to exactly the given axes; absent axes keep their natural size.
    pub fn stretch(height: Option<u32>, width: Option<u32>) -> Self {
        Self {
            height,
            width,
            preserve_ratio: false,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidOptionsError> {
        if self.height.is_none() && self.width.is_none() {
            return Err(InvalidOptionsError);
        }
        Ok(())
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Format a raster surface is exported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless; the default export of a drawing surface.
    #[default]
    Png,
    /// Lossy, honours [`Quality`]. Alpha is flattened.
    Jpeg,
    /// Lossless WebP.
    Webp,
}

impl OutputFormat {
    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Webp => ImageFormat::WebP,
        }
    }

    pub fn mime(self) -> &'static str {
        self.image_format().to_mime_type()
    }
}

/// Resampling filter for the scaled blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    /// Bilinear.
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_preserves_ratio() {
        let options = ScaleOptions::default();
        assert!(options.preserve_ratio);
        assert_eq!(options.height, None);
        assert_eq!(options.width, None);
    }

    #[test]
    fn validate_requires_an_axis() {
        assert_eq!(ScaleOptions::default().validate(), Err(InvalidOptionsError));
        assert_eq!(
            ScaleOptions::stretch(None, None).validate(),
            Err(InvalidOptionsError)
        );
        assert!(ScaleOptions::max_height(10).validate().is_ok());
        assert!(ScaleOptions::max_width(10).validate().is_ok());
    }

    #[test]
    fn zero_counts_as_a_constraint() {
        assert!(ScaleOptions::max_height(0).validate().is_ok());
    }

    #[test]
    fn options_deserialize_from_camel_case() {
        let options: ScaleOptions =
            serde_json::from_str(r#"{"height": 50, "preserveRatio": false}"#).unwrap();
        assert_eq!(options, ScaleOptions::stretch(Some(50), None));
    }

    #[test]
    fn options_omitted_ratio_flag_defaults_true() {
        let options: ScaleOptions = serde_json::from_str(r#"{"width": 50}"#).unwrap();
        assert_eq!(options, ScaleOptions::max_width(50));
    }

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn output_format_mime_types() {
        assert_eq!(OutputFormat::Png.mime(), "image/png");
        assert_eq!(OutputFormat::Jpeg.mime(), "image/jpeg");
        assert_eq!(OutputFormat::Webp.mime(), "image/webp");
    }

    #[test]
    fn filter_names_are_kebab_case() {
        let filter: ResampleFilter = serde_json::from_str("\"catmull-rom\"").unwrap();
        assert_eq!(filter, ResampleFilter::CatmullRom);
    }
}
