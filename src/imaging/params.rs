//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides which region to sample and how to encode it) and the
//! [`backend`](super::backend) (which does the actual pixel work). This
//! separation lets tests swap in a recording mock without touching the
//! mapping logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 92). Clamped on construction.
//! - [`RegionParams`]: Integer sampling window in natural source pixels.
//! - [`EncodeFormat`]: Target raster format for an encode call.

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    /// The quality in 1..=100, even for a `Quality` built without [`new`](Self::new).
    pub fn value(self) -> u32 {
        self.0.clamp(1, 100)
    }
}

impl Default for Quality {
    /// Visually lossless for photos at a fraction of the size of 100.
    fn default() -> Self {
        Self(92)
    }
}

/// Sampling window for a 1:1 region copy.
///
/// `x` and `y` may be negative or lie past the source edge; the backend
/// leaves any destination pixel without a source pixel fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionParams {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Output format for [`ImageBackend::encode`](super::ImageBackend::encode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeFormat {
    /// Lossy, no alpha. Transparent pixels flatten to black.
    Jpeg(Quality),
    /// Lossless RGBA.
    Png,
}

impl EncodeFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg(_) => "jpg",
            Self::Png => "png",
        }
    }
}
