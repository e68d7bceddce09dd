//! Shared value types returned by the public operations.

use crate::data_url::EncodedImage;
use serde::{Deserialize, Serialize};

/// Pixel extent of an image or surface.
///
/// Zero on either axis is degenerate but representable; rejecting it is up to
/// the caller or the backend that has to allocate pixels for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub height: u32,
    pub width: u32,
}

impl Dimensions {
    pub fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// The longer of the two axes.
    pub fn longer_edge(self) -> u32 {
        self.height.max(self.width)
    }

    pub fn area(self) -> u64 {
        self.height as u64 * self.width as u64
    }
}

/// A decoded image together with its natural dimensions.
///
/// Created per call by [`load_image`](crate::imaging::load_image) and owned by
/// that call alone.
#[derive(Debug, Clone)]
pub struct ImageHandle<I> {
    pub image: I,
    pub dimensions: Dimensions,
}

/// A file read into a data URL, with the metadata gathered on the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobDetails {
    /// The file's bytes as a `data:` URL.
    pub base64: EncodedImage,
    /// Natural dimensions reported by the decoder.
    pub dimensions: Dimensions,
    /// Client-side file name. Not unique, not sanitized.
    pub name: String,
}

/// Output of a scale operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleResult {
    pub base64: EncodedImage,
    /// Dimensions actually produced (the natural ones when no resize was needed).
    pub dimensions: Dimensions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longer_edge_picks_max_axis() {
        assert_eq!(Dimensions::new(200, 100).longer_edge(), 200);
        assert_eq!(Dimensions::new(100, 300).longer_edge(), 300);
        assert_eq!(Dimensions::new(64, 64).longer_edge(), 64);
    }

    #[test]
    fn area_does_not_overflow_u32() {
        assert_eq!(Dimensions::new(100_000, 100_000).area(), 10_000_000_000);
    }
}
