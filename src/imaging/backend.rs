//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: decode, copy_region, and encode.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Everything is statically linked into the binary.

use super::params::{EncodeFormat, RegionParams};
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of an image or a rendered surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True until the surface has been laid out with a non-zero size.
    pub fn is_unmeasured(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Trait for image processing backends.
///
/// Every backend must implement all three operations so the rest of the
/// codebase is backend-agnostic.
pub trait ImageBackend: Sync {
    /// Decode an in-memory file into pixels, guessing the format from content.
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError>;

    /// Copy a region of `source` at 1:1 scale into a new bitmap of exactly
    /// `region.width × region.height` pixels.
    fn copy_region(
        &self,
        source: &DynamicImage,
        region: &RegionParams,
    ) -> Result<RgbaImage, BackendError>;

    /// Encode a bitmap into a compressed byte stream.
    fn encode(&self, image: &RgbaImage, format: EncodeFormat) -> Result<Vec<u8>, BackendError>;
}
