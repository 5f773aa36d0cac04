//! Global constants for region annotation and OCR.

/// Minimum width/height (exclusive) of a committed region, in image pixels.
pub const MIN_REGION_SIZE: f32 = 5.0;

/// Side of the square resize-handle touch target, in screen pixels.
pub const HANDLE_SIZE: f32 = 8.0;

/// Zoom limits and step.
pub mod zoom {
    /// Smallest allowed zoom factor.
    pub const MIN: f32 = 0.1;
    /// Largest allowed zoom factor.
    pub const MAX: f32 = 5.0;
    /// Upper end of the zoom slider (the slider never reaches `MAX`).
    pub const SLIDER_MAX: f32 = 3.0;
    /// Fixed increment used by zoom in/out steps.
    pub const STEP: f32 = 0.1;
    /// Zoom applied after the first upload.
    pub const DEFAULT: f32 = 1.0;
}

/// OCR defaults.
pub mod ocr {
    /// Language hint passed to the recognizer (two languages, fixed).
    pub const LANGUAGE: &str = "eng+chi_tra";
    /// Text written into a region when recognition fails.
    pub const ERROR_TEXT: &str = "Error";
}

/// Version string written into JSON exports.
pub const EXPORT_VERSION: &str = "1.0";
