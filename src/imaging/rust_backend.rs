//! Pure Rust image backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::load_from_memory` (format sniffed from content) |
//! | Region copy | `image::imageops::replace` onto a transparent `RgbaImage` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (alpha dropped first) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |

use super::backend::{BackendError, ImageBackend};
use super::params::{EncodeFormat, RegionParams};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};
use std::path::Path;
use std::sync::LazyLock;

/// Extensions the file picker accepts, paired with the decoder they need.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `path` looks like an image the decoders can handle.
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            supported_input_extensions()
                .iter()
                .any(|ext| ext.eq_ignore_ascii_case(e))
        })
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>, BackendError> {
    // JPEG has no alpha channel; transparent pixels become black.
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {e}")))?;
    Ok(buf)
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {e}")))?;
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
        image::load_from_memory(bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn copy_region(
        &self,
        source: &DynamicImage,
        region: &RegionParams,
    ) -> Result<RgbaImage, BackendError> {
        if region.width == 0 || region.height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "empty region {}x{}",
                region.width, region.height
            )));
        }
        // Shifting the source by the negative origin puts the region at
        // (0, 0); `replace` skips everything outside the destination.
        let mut bitmap = RgbaImage::new(region.width, region.height);
        image::imageops::replace(&mut bitmap, source, -region.x, -region.y);
        Ok(bitmap)
    }

    fn encode(&self, image: &RgbaImage, format: EncodeFormat) -> Result<Vec<u8>, BackendError> {
        match format {
            EncodeFormat::Jpeg(quality) => encode_jpeg(image, quality.value() as u8),
            EncodeFormat::Png => encode_png(image),
        }
    }
}
