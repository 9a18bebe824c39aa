//! Flatten the composed view into `framed-photo.png`.
//!
//! The whole view is rasterized, frame included, at the view's rendered
//! size. An [`ExportControl`] is required, so nothing can be exported before
//! a crop exists.

use crate::compose::CompositionView;
use crate::imaging::{BackendError, Dimensions, EncodeFormat, ImageBackend};
use crate::session::ExportControl;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of every exported file.
pub const EXPORT_FILE_NAME: &str = "framed-photo.png";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// A flattened export, ready to be saved.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub file_name: &'static str,
    pub dimensions: Dimensions,
    pub bytes: Vec<u8>,
}

/// Render frame + crop and encode the result as PNG.
pub fn rasterize_view(
    backend: &impl ImageBackend,
    view: &CompositionView,
    control: &ExportControl,
) -> Result<ExportedFile, ExportError> {
    let crop = backend.decode(control.cropped().bytes())?;
    let canvas = view.render(Some(&crop));
    let bytes = backend.encode(&canvas, EncodeFormat::Png)?;
    Ok(ExportedFile {
        file_name: EXPORT_FILE_NAME,
        dimensions: Dimensions::new(canvas.width(), canvas.height()),
        bytes,
    })
}

/// Write the export into `dir`, replacing any earlier export there.
pub fn save(file: &ExportedFile, dir: &Path) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file.file_name);
    fs::write(&path, &file.bytes)?;
    Ok(path)
}
