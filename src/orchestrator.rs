//! Drives a [`Session`] through the upload → crop → confirm → download flow.
//!
//! The orchestrator is the only place where fallible work meets session
//! state. Each step either produces a value and applies the matching
//! transition, or produces nothing and leaves the session exactly as it was.
//! Failures never propagate: they are logged at `debug` level and otherwise
//! stay silent.
//!
//! Progress is reported as [`SessionEvent`]s over an optional channel, the
//! same way a caller can watch a long pipeline without the pipeline knowing
//! how the events are displayed.

use crate::compose::CompositionView;
use crate::config::FrameConfig;
use crate::export;
use crate::imaging::{
    Dimensions, DisplayBounds, ImageBackend, Quality, decode_source, is_supported_input,
    rasterize_crop,
};
use crate::session::Session;
use crate::types::CropRectangle;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Progress report for a successful step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    FileSelected {
        file: String,
        natural: Dimensions,
        displayed: Dimensions,
    },
    CropAdjusted {
        crop: CropRectangle,
    },
    CropRasterized {
        width: u32,
        height: u32,
        bytes: usize,
    },
    CropConfirmed,
    Exported {
        path: String,
        width: u32,
        height: u32,
    },
}

/// Owns the session and everything needed to advance it.
pub struct Orchestrator<B: ImageBackend> {
    backend: B,
    view: CompositionView,
    bounds: DisplayBounds,
    quality: Quality,
    session: Session,
    events: Option<Sender<SessionEvent>>,
}

impl<B: ImageBackend> Orchestrator<B> {
    pub fn new(backend: B, config: &FrameConfig, events: Option<Sender<SessionEvent>>) -> Self {
        Self {
            backend,
            view: CompositionView::new(config.view.dimensions()),
            bounds: config.editor.bounds(),
            quality: config.crop.quality(),
            session: Session::new(config.crop.initial_rectangle()),
            events,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// "File selected": read and decode the photo, then open the editor.
    ///
    /// Files the picker would not offer (unknown extension) and files that
    /// fail to read or decode leave the session unchanged.
    pub fn select_file(&mut self, path: &Path) {
        if !is_supported_input(path) {
            log::debug!("ignoring {}: not an accepted image type", path.display());
            return;
        }
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::debug!("could not read {}: {e}", path.display());
                return;
            }
        };
        self.select_bytes(&path.display().to_string(), &bytes);
    }

    /// Same as [`select_file`](Self::select_file) for an already-read file.
    pub fn select_bytes(&mut self, name: &str, bytes: &[u8]) {
        match decode_source(&self.backend, bytes, self.bounds) {
            Ok(source) => {
                let (natural, displayed) = (source.natural(), source.displayed());
                self.session = self.session.file_selected(source);
                self.emit(SessionEvent::FileSelected {
                    file: name.to_string(),
                    natural,
                    displayed,
                });
            }
            Err(e) => log::debug!("could not decode {name}: {e}"),
        }
    }

    /// Crop dragged or resized in the editor.
    pub fn adjust_crop(&mut self, crop: CropRectangle) {
        if self.session.source().is_none() || !self.session.editor_open() {
            log::debug!("crop change ignored: editor is not open");
            return;
        }
        self.session = self.session.crop_changed(crop);
        self.emit(SessionEvent::CropAdjusted {
            crop: *self.session.crop(),
        });
    }

    /// "Crop finalized": rasterize the current crop into the crop slot.
    ///
    /// An empty, unmeasured or unencodable crop keeps whatever crop was
    /// already shown.
    pub fn finalize_crop(&mut self) {
        let Some(source) = self.session.source() else {
            log::debug!("crop finalized without a photo");
            return;
        };
        match rasterize_crop(&self.backend, source, self.session.crop(), self.quality) {
            Ok(cropped) => {
                let Dimensions { width, height } = cropped.dimensions();
                let bytes = cropped.bytes().len();
                self.session = self.session.crop_rasterized(cropped);
                self.emit(SessionEvent::CropRasterized {
                    width,
                    height,
                    bytes,
                });
            }
            Err(e) => log::debug!("crop not rasterized: {e}"),
        }
    }

    /// "Crop confirmed": close the editor.
    pub fn confirm_crop(&mut self) {
        if !self.session.editor_open() {
            return;
        }
        self.session = self.session.crop_confirmed();
        self.emit(SessionEvent::CropConfirmed);
    }

    /// Download: flatten the view into `dir/framed-photo.png`.
    ///
    /// Returns the written path, or `None` when the download control is not
    /// available yet or the export failed.
    pub fn download(&self, dir: &Path) -> Option<PathBuf> {
        let Some(control) = self.session.export_control() else {
            log::debug!("download requested before a confirmed crop exists");
            return None;
        };
        let result = export::rasterize_view(&self.backend, &self.view, &control)
            .and_then(|file| export::save(&file, dir).map(|path| (path, file.dimensions)));
        match result {
            Ok((path, Dimensions { width, height })) => {
                self.emit(SessionEvent::Exported {
                    path: path.display().to_string(),
                    width,
                    height,
                });
                Some(path)
            }
            Err(e) => {
                log::debug!("export failed: {e}");
                None
            }
        }
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver only means nobody is listening.
            tx.send(event).ok();
        }
    }
}
