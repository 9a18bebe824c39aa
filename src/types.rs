//! Shared types passed between the session, the imaging layer, composition
//! and export.
//!
//! None of these are mutated after construction. Re-selecting a file or
//! re-cropping always builds a brand-new value and swaps it into the
//! [`Session`](crate::session::Session).

use crate::imaging::Dimensions;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Crop rectangle over the displayed source image, in percent of the
/// displayed width (`x`, `width`) and height (`y`, `height`).
///
/// `aspect` is the locked `width / height` ratio in displayed pixels.
/// `None` leaves the rectangle free-form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<f64>,
}

impl CropRectangle {
    /// Ratio used for the circular crop.
    pub const SQUARE: f64 = 1.0;

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            aspect: Some(Self::SQUARE),
        }
    }

    pub fn unlocked(self) -> Self {
        Self {
            aspect: None,
            ..self
        }
    }

    /// A rectangle that is still being drawn has no area yet.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

impl Default for CropRectangle {
    fn default() -> Self {
        Self::new(5.0, 5.0, 90.0, 90.0)
    }
}

/// Rectangle in pixel units (displayed or natural, depending on context).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// The uploaded photo: decoded pixels plus natural and displayed sizes.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: Arc<DynamicImage>,
    natural: Dimensions,
    displayed: Dimensions,
}

impl SourceImage {
    pub fn new(pixels: DynamicImage, displayed: Dimensions) -> Self {
        let natural = Dimensions::new(pixels.width(), pixels.height());
        Self {
            pixels: Arc::new(pixels),
            natural,
            displayed,
        }
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    pub fn natural(&self) -> Dimensions {
        self.natural
    }

    pub fn displayed(&self) -> Dimensions {
        self.displayed
    }
}

/// A rasterized crop, held as encoded JPEG bytes.
///
/// Owns its bytes, so it stays valid whatever happens to the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CroppedImage {
    bytes: Arc<[u8]>,
    dimensions: Dimensions,
}

impl CroppedImage {
    /// Wrap an encoded crop. Returns `None` for an empty encode.
    pub fn new(bytes: Vec<u8>, dimensions: Dimensions) -> Option<Self> {
        if bytes.is_empty() || dimensions.is_unmeasured() {
            return None;
        }
        Some(Self {
            bytes: bytes.into(),
            dimensions,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }
}
