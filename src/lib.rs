//! region-ocr - Region OCR Annotation Engine
//!
//! Load page images, draw rectangular regions over them, recognize the text
//! inside each region in the background, and export the results as CSV or
//! JSON. The crate holds no UI; hosts drive [`app::Annotator`] with pointer
//! events and render from its session.

pub mod app;
pub mod config;
pub mod constants;
pub mod format;
pub mod model;
pub mod ocr;
pub mod replay;
pub mod state;
pub mod zoom_math;

pub use app::{Annotator, LoadError, LoadedImage};
pub use config::AppConfig;
pub use state::Session;
