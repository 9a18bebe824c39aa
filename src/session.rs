//! Session state: one immutable value, replaced on every user event.
//!
//! A session has four slots of state (selected photo, crop rectangle,
//! cropped result, editor visibility). Instead of mutating them one by one,
//! each event is a named transition that returns a complete new [`Session`],
//! so no observer ever sees a half-applied update.
//!
//! | Event | Transition |
//! |---|---|
//! | file chosen and decoded | [`Session::file_selected`] |
//! | crop dragged / resized | [`Session::crop_changed`] |
//! | crop rasterized | [`Session::crop_rasterized`] |
//! | crop confirmed | [`Session::crop_confirmed`] |
//!
//! Failed operations have no transition: the orchestrator simply keeps the
//! previous session.

use crate::imaging::constrain_aspect;
use crate::types::{CropRectangle, CroppedImage, SourceImage};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Session {
    source: Option<SourceImage>,
    crop: CropRectangle,
    initial_crop: CropRectangle,
    cropped: Option<Arc<CroppedImage>>,
    editor_open: bool,
}

/// Proof that the composed view can be exported.
///
/// Only [`Session::export_control`] hands these out, so the export action is
/// unreachable before a crop exists.
#[derive(Debug, Clone)]
pub struct ExportControl {
    cropped: Arc<CroppedImage>,
}

impl ExportControl {
    pub fn cropped(&self) -> &CroppedImage {
        &self.cropped
    }
}

impl Session {
    /// Empty session whose editor starts from `initial_crop`.
    pub fn new(initial_crop: CropRectangle) -> Self {
        Self {
            crop: initial_crop,
            initial_crop,
            ..Self::default()
        }
    }

    /// A new photo was decoded: it replaces any previous one, the crop
    /// restarts from the initial rectangle and the editor opens.
    ///
    /// An existing crop stays on display until a new one is rasterized.
    #[must_use]
    pub fn file_selected(&self, source: SourceImage) -> Self {
        let crop = constrain_aspect(&self.initial_crop, source.displayed());
        Self {
            source: Some(source),
            crop,
            editor_open: true,
            ..self.clone()
        }
    }

    /// The user moved or resized the crop. Ignored while no editor is open.
    #[must_use]
    pub fn crop_changed(&self, crop: CropRectangle) -> Self {
        match (&self.source, self.editor_open) {
            (Some(source), true) => Self {
                crop: constrain_aspect(&crop, source.displayed()),
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    /// A crop finished rasterizing. The slot is replaced wholesale; whichever
    /// result arrives last wins.
    #[must_use]
    pub fn crop_rasterized(&self, cropped: CroppedImage) -> Self {
        Self {
            cropped: Some(Arc::new(cropped)),
            ..self.clone()
        }
    }

    /// The user confirmed the crop: the editor closes.
    #[must_use]
    pub fn crop_confirmed(&self) -> Self {
        Self {
            editor_open: false,
            ..self.clone()
        }
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn crop(&self) -> &CropRectangle {
        &self.crop
    }

    pub fn cropped(&self) -> Option<&CroppedImage> {
        self.cropped.as_deref()
    }

    pub fn editor_open(&self) -> bool {
        self.editor_open
    }

    /// "Choose image" is offered until a crop exists.
    pub fn shows_upload_control(&self) -> bool {
        self.cropped.is_none()
    }

    /// "Download" is offered once a crop exists and the editor is closed.
    pub fn export_control(&self) -> Option<ExportControl> {
        if self.editor_open {
            return None;
        }
        self.cropped
            .as_ref()
            .map(|cropped| ExportControl {
                cropped: Arc::clone(cropped),
            })
    }
}
