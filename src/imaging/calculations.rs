//! Pure calculation functions for crop geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//! Three coordinate spaces are involved:
//!
//! - **percent**: the crop editor's own units, relative to the displayed image
//! - **displayed**: on-screen pixels of the image inside the editor
//! - **natural**: pixels of the decoded source file

use super::backend::Dimensions;
use super::params::RegionParams;
use crate::types::{CropRectangle, PixelRect};

/// Size of the source image once laid out inside the crop editor.
///
/// The image is scaled down uniformly to fit `max_width × max_height` and is
/// never scaled up.
///
/// # Examples
/// ```
/// # use photo_frame::imaging::{Dimensions, fit_display};
/// // 4000x3000 photo in a 752x600 editor → limited by height
/// assert_eq!(fit_display(Dimensions::new(4000, 3000), 752, 600), Dimensions::new(752, 564));
///
/// // Small images stay at natural size
/// assert_eq!(fit_display(Dimensions::new(300, 200), 752, 600), Dimensions::new(300, 200));
/// ```
pub fn fit_display(natural: Dimensions, max_width: u32, max_height: u32) -> Dimensions {
    if natural.is_unmeasured() {
        return Dimensions::default();
    }
    let scale = (max_width as f64 / natural.width as f64)
        .min(max_height as f64 / natural.height as f64)
        .min(1.0);

    Dimensions {
        width: ((natural.width as f64 * scale).round() as u32).max(1),
        height: ((natural.height as f64 * scale).round() as u32).max(1),
    }
}

/// Convert a percent crop to displayed pixels.
pub fn percent_to_display(crop: &CropRectangle, displayed: Dimensions) -> PixelRect {
    let w = displayed.width as f64 / 100.0;
    let h = displayed.height as f64 / 100.0;
    PixelRect {
        x: crop.x * w,
        y: crop.y * h,
        width: crop.width * w,
        height: crop.height * h,
    }
}

/// Map a displayed-pixel rectangle onto natural source pixels.
///
/// Each axis scales independently by `natural / displayed`. Returns `None`
/// while the displayed size is still unmeasured; the caller must retry once
/// layout has happened instead of mapping with zero sizes.
///
/// Rectangles reaching past the source are passed through unchanged; the
/// region copy clamps them.
pub fn map_to_natural(
    rect: &PixelRect,
    natural: Dimensions,
    displayed: Dimensions,
) -> Option<PixelRect> {
    if displayed.is_unmeasured() {
        return None;
    }
    let scale_x = natural.width as f64 / displayed.width as f64;
    let scale_y = natural.height as f64 / displayed.height as f64;

    Some(PixelRect {
        x: rect.x * scale_x,
        y: rect.y * scale_y,
        width: rect.width * scale_x,
        height: rect.height * scale_y,
    })
}

/// Turn a natural-pixel rectangle into an integer sampling window.
///
/// Returns `None` when either side rounds to zero pixels.
pub fn plan_region(rect: &PixelRect) -> Option<RegionParams> {
    let width = rect.width.round() as u32;
    let height = rect.height.round() as u32;
    if width == 0 || height == 0 {
        return None;
    }
    Some(RegionParams {
        x: rect.x.round() as i64,
        y: rect.y.round() as i64,
        width,
        height,
    })
}

/// Apply the crop's aspect lock against the displayed size and keep it
/// inside the image.
///
/// The longer side (in displayed pixels) shrinks around the rectangle's
/// center until `width_px / height_px` equals the locked ratio. Without a
/// lock, only the bounds clamp applies. With an unmeasured display or an
/// empty rectangle the input is returned untouched.
pub fn constrain_aspect(crop: &CropRectangle, displayed: Dimensions) -> CropRectangle {
    if displayed.is_unmeasured() || crop.is_empty() {
        return *crop;
    }
    let mut width = crop.width.clamp(0.0, 100.0);
    let mut height = crop.height.clamp(0.0, 100.0);
    let center_x = crop.x + crop.width / 2.0;
    let center_y = crop.y + crop.height / 2.0;

    if let Some(ratio) = crop.aspect.filter(|r| *r > 0.0) {
        let px_w = width * displayed.width as f64 / 100.0;
        let px_h = height * displayed.height as f64 / 100.0;
        if px_h > 0.0 && px_w / px_h > ratio {
            width = px_h * ratio * 100.0 / displayed.width as f64;
        } else if px_w > 0.0 {
            height = px_w / ratio * 100.0 / displayed.height as f64;
        }
    }

    CropRectangle {
        x: (center_x - width / 2.0).clamp(0.0, 100.0 - width),
        y: (center_y - height / 2.0).clamp(0.0, 100.0 - height),
        width,
        height,
        aspect: crop.aspect,
    }
}

/// Position of the crop overlay inside the composition canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Centered box covering `scale` of the canvas on each axis.
pub fn overlay_box(canvas: Dimensions, scale: f64) -> OverlayBox {
    let width = (canvas.width as f64 * scale).round() as u32;
    let height = (canvas.height as f64 * scale).round() as u32;
    OverlayBox {
        x: (canvas.width - width.min(canvas.width)) / 2,
        y: (canvas.height - height.min(canvas.height)) / 2,
        width,
        height,
    }
}
