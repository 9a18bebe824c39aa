//! Shared test utilities: synthetic photos and pixel assertions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let photo = quadrant_image(200, 100);
//! let bytes = png_bytes(&photo);
//! assert_rgb_near(*photo.to_rgba8().get_pixel(10, 10), QUADRANT_COLORS[0], 0);
//! ```

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba};
use std::io::Cursor;

// =========================================================================
// Synthetic photos
// =========================================================================

/// Quadrant colors, in order: top-left, top-right, bottom-left, bottom-right.
pub const QUADRANT_COLORS: [[u8; 3]; 4] = [
    [220, 20, 20],
    [20, 220, 20],
    [20, 20, 220],
    [220, 220, 20],
];

/// A single-color RGB photo.
pub fn solid_image(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

/// A photo split into four solid quadrants, colored per [`QUADRANT_COLORS`].
///
/// Handy for checking that a crop took pixels from the right place.
pub fn quadrant_image(width: u32, height: u32) -> DynamicImage {
    let (half_w, half_h) = (width / 2, height / 2);
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let index = usize::from(x >= half_w) + 2 * usize::from(y >= half_h);
        Rgb(QUADRANT_COLORS[index])
    }))
}

/// A photo whose left half is `left` and right half is `right`.
pub fn split_image(width: u32, height: u32, left: [u8; 3], right: [u8; 3]) -> DynamicImage {
    let half = width / 2;
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, _| {
        Rgb(if x < half { left } else { right })
    }))
}

/// Encode as PNG, the way a photo file would arrive from disk.
pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

// =========================================================================
// Pixel assertions
// =========================================================================

/// Assert every color channel is within `tolerance` of `expected`.
/// Alpha is ignored.
pub fn assert_rgb_near(pixel: Rgba<u8>, expected: [u8; 3], tolerance: u8) {
    let actual = [pixel[0], pixel[1], pixel[2]];
    let close = actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| a.abs_diff(*e) <= tolerance);
    assert!(
        close,
        "pixel {actual:?} not within {tolerance} of {expected:?}"
    );
}
