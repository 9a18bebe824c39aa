//! High-level image operations.
//!
//! These functions combine calculations with backend execution. They take
//! session values, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{fit_display, map_to_natural, percent_to_display, plan_region};
use super::params::{EncodeFormat, Quality};
use crate::types::{CropRectangle, CroppedImage, SourceImage};
use thiserror::Error;

/// Why a crop rasterization produced nothing.
///
/// None of these are fatal: the caller keeps whatever crop it already shows.
#[derive(Error, Debug)]
pub enum RasterizeError {
    #[error("source image has not been laid out yet")]
    NotMeasured,
    #[error("crop region has no area")]
    EmptyRegion,
    #[error("encoder produced no data")]
    EmptyEncode,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Bounds of the crop editor the source image is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayBounds {
    pub max_width: u32,
    pub max_height: u32,
}

/// Decode an uploaded file and lay it out inside the editor bounds.
pub fn decode_source(
    backend: &impl ImageBackend,
    bytes: &[u8],
    bounds: DisplayBounds,
) -> Result<SourceImage, BackendError> {
    let pixels = backend.decode(bytes)?;
    let natural = Dimensions::new(pixels.width(), pixels.height());
    let displayed = fit_display(natural, bounds.max_width, bounds.max_height);
    Ok(SourceImage::new(pixels, displayed))
}

/// Rasterize the crop: map it to natural pixels, copy the region at 1:1 and
/// encode it as JPEG.
///
/// The returned bitmap is exactly the mapped rectangle's size (rounded to
/// whole pixels). Any missing piece along the way yields an error instead of
/// a partial crop.
pub fn rasterize_crop(
    backend: &impl ImageBackend,
    source: &SourceImage,
    crop: &CropRectangle,
    quality: Quality,
) -> Result<CroppedImage, RasterizeError> {
    if crop.is_empty() {
        return Err(RasterizeError::EmptyRegion);
    }
    let displayed = percent_to_display(crop, source.displayed());
    let natural = map_to_natural(&displayed, source.natural(), source.displayed())
        .ok_or(RasterizeError::NotMeasured)?;
    let region = plan_region(&natural).ok_or(RasterizeError::EmptyRegion)?;

    let bitmap = backend.copy_region(source.pixels(), &region)?;
    let bytes = backend.encode(&bitmap, EncodeFormat::Jpeg(quality))?;

    CroppedImage::new(bytes, Dimensions::new(bitmap.width(), bitmap.height()))
        .ok_or(RasterizeError::EmptyEncode)
}
