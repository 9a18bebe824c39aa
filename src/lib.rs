//! # Photo Frame
//!
//! Put a photo inside a decorative frame: choose an image, crop it to a
//! square, and download the framed result as a single PNG.
//!
//! # Architecture: One Session, Four Events
//!
//! The whole tool is a small state machine. Every user action is an event
//! that turns the current [`session::Session`] into a new one:
//!
//! ```text
//! 1. File selected    photo bytes  →  source image + open editor
//! 2. Crop adjusted    rectangle    →  aspect-locked rectangle
//! 3. Crop finalized   rectangle    →  JPEG crop (natural resolution)
//! 4. Crop confirmed                →  editor closed, download available
//!    Download         view         →  framed-photo.png
//! ```
//!
//! The pixel work (decode, copy, encode) sits behind the
//! [`imaging::ImageBackend`] trait so session logic can be tested against a
//! recording mock without touching real images.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Coordinate math, crop rasterization, the `image`-crate backend |
//! | [`types`] | Crop rectangle, source image and cropped image values |
//! | [`session`] | Immutable session state and its transitions |
//! | [`compose`] | Frame + circular crop composition, stock frame drawing |
//! | [`export`] | Flattens the composed view into `framed-photo.png` |
//! | [`orchestrator`] | Runs fallible steps and applies transitions; emits progress events |
//! | [`config`] | `config.toml` loading, merging with stock defaults, validation |
//! | [`output`] | CLI formatting of progress events, text or JSON |
//!
//! # Design Decisions
//!
//! ## Crops Are Kept at Natural Resolution
//!
//! The editor works on a downscaled preview, but the crop is cut from the
//! original pixels. A crop of a 4000px photo stays sharp even though the
//! preview was 752px wide. The composition scales it down at render time.
//!
//! ## Silent Failure
//!
//! A file that cannot be decoded, a zero-size crop, or an export that fails
//! leaves the session exactly as it was. Nothing is shown to the user; the
//! cause is logged at `debug` level (`RUST_LOG=photo_frame=debug`).
//!
//! ## Download Needs a Crop
//!
//! [`session::ExportControl`] can only be obtained from a session that holds
//! a crop and has its editor closed, so an export of an empty frame cannot
//! be written by accident.

pub mod compose;
pub mod config;
pub mod export;
pub mod imaging;
pub mod orchestrator;
pub mod output;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
