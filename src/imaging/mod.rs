//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` |
//! | **Map crop** | [`map_to_natural`] (percent → displayed → natural pixels) |
//! | **Region copy** | `imageops::replace` onto a transparent bitmap |
//! | **Encode** | JPEG for crops, PNG for exports |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop geometry (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    OverlayBox, constrain_aspect, fit_display, map_to_natural, overlay_box, percent_to_display,
    plan_region,
};
pub use operations::{DisplayBounds, RasterizeError, decode_source, rasterize_crop};
pub use params::{EncodeFormat, Quality, RegionParams};
pub use rust_backend::{RustBackend, is_supported_input};
