//! Gesture scripts for driving the annotator without a UI.
//!
//! A script names the images to load, a list of input commands, and the
//! export to produce:
//!
//! ```json
//! {
//!   "images": ["scan1.png", "scan2.png"],
//!   "commands": [
//!     { "op": "down", "x": 10, "y": 10 },
//!     { "op": "move", "x": 110, "y": 60 },
//!     { "op": "up" },
//!     { "op": "text", "id": 1, "text": "Hello" }
//!   ],
//!   "format": "json",
//!   "scope": "all_pages"
//! }
//! ```
//!
//! Pointer coordinates are screen space over a surface at the origin, so
//! they are divided by the current zoom.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::{Annotator, read_image_file};
use crate::format::{ExportScope, FormatError};
use crate::model::{Point, RegionId};
use crate::ocr::OcrEngine;

/// Errors from loading or running a script.
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid script: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// One recorded input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    Leave,
    /// Switch to a 0-based page index
    Page { index: usize },
    Zoom { scale: f32 },
    Delete { id: RegionId },
    Text { id: RegionId, text: String },
}

/// A complete headless session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    /// Image files, relative to the script's directory
    #[serde(default)]
    pub images: Vec<PathBuf>,

    #[serde(default)]
    pub commands: Vec<Command>,

    /// Export format id; the configured default when absent
    #[serde(default)]
    pub format: Option<String>,

    /// Export scope; the configured default when absent
    #[serde(default)]
    pub scope: Option<ExportScope>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load the images, replay every command and return the export text.
    ///
    /// Images that cannot be read or decoded are skipped with a warning.
    pub fn run<E: OcrEngine>(
        &self,
        app: &mut Annotator<E>,
        base_dir: &Path,
    ) -> Result<String, ReplayError> {
        let mut uploads = Vec::with_capacity(self.images.len());
        for image in &self.images {
            match read_image_file(&base_dir.join(image)) {
                Ok(upload) => uploads.push(upload),
                Err(e) => log::warn!("Skipping image: {}", e),
            }
        }
        app.load_images(uploads);

        apply_commands(app, &self.commands);
        app.poll_ocr();

        let format = self
            .format
            .clone()
            .unwrap_or_else(|| app.config().export.default_format.clone());
        let scope = self.scope.unwrap_or(app.config().export.scope);
        Ok(app.export(&format, scope)?)
    }
}

/// Feed commands to the annotator in order.
pub fn apply_commands<E: OcrEngine>(app: &mut Annotator<E>, commands: &[Command]) {
    let origin = Point::default();
    for command in commands {
        log::trace!("Replay {:?}", command);
        match command {
            Command::Down { x, y } => app.pointer_down(Point::new(*x, *y), origin),
            Command::Move { x, y } => app.pointer_move(Point::new(*x, *y), origin),
            Command::Up => {
                app.pointer_up();
            }
            Command::Leave => {
                app.pointer_leave();
            }
            Command::Page { index } => app.set_page(*index),
            Command::Zoom { scale } => app.set_zoom(*scale),
            Command::Delete { id } => {
                if !app.delete_region(*id) {
                    log::warn!("Replay: no region {} to delete", id);
                }
            }
            Command::Text { id, text } => {
                if !app.set_text(*id, text.clone()) {
                    log::warn!("Replay: no region {} to edit", id);
                }
            }
        }
        app.poll_ocr();
    }
}
