//! OCR engine capability and lifecycle types.

use image::RgbaImage;
use thiserror::Error;

use crate::model::{PageId, RegionId};

/// Monotonic identifier of one recognition request.
pub type Ticket = u64;

/// Lifecycle of a lazily loaded recognition engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EngineState {
    /// Nothing has been loaded yet
    #[default]
    Uninitialized,
    /// Loading in the background
    Loading,
    /// Accepting jobs
    Ready,
    /// Loading failed; the engine never becomes ready
    Failed(String),
}

impl EngineState {
    pub fn is_ready(&self) -> bool {
        matches!(self, EngineState::Ready)
    }
}

/// Errors raised while loading or running recognition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OcrError {
    /// Engine has not reached the ready state
    #[error("OCR engine is not ready")]
    NotReady,

    /// Engine failed to load
    #[error("Failed to load OCR engine: {0}")]
    Load(String),

    /// The recognizer itself reported an error
    #[error("Recognition failed: {0}")]
    Recognition(String),

    /// Region does not overlap the image
    #[error("Region lies outside the image")]
    EmptyRegion,

    /// Worker thread went away
    #[error("OCR worker disconnected")]
    Disconnected,
}

/// A cropped image region queued for recognition.
#[derive(Debug, Clone)]
pub struct OcrJob {
    pub ticket: Ticket,
    pub page_id: PageId,
    pub region_id: RegionId,
    pub image: RgbaImage,
    pub language: String,
}

impl OcrJob {
    /// Build the completion for this job.
    pub fn complete(&self, result: Result<String, OcrError>) -> OcrCompletion {
        OcrCompletion::new(self.ticket, self.page_id, self.region_id, result)
    }
}

/// Outcome of one recognition request.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrCompletion {
    pub ticket: Ticket,
    pub page_id: PageId,
    pub region_id: RegionId,
    pub result: Result<String, OcrError>,
}

impl OcrCompletion {
    pub fn new(
        ticket: Ticket,
        page_id: PageId,
        region_id: RegionId,
        result: Result<String, OcrError>,
    ) -> Self {
        Self {
            ticket,
            page_id,
            region_id,
            result,
        }
    }
}

/// Synchronous text recognizer, run off the main thread by an engine.
pub trait Recognizer: Send + 'static {
    /// Recognize the text in `image` using the given language hint.
    fn recognize(&mut self, image: &RgbaImage, language: &str) -> Result<String, OcrError>;
}

impl<F> Recognizer for F
where
    F: FnMut(&RgbaImage, &str) -> Result<String, OcrError> + Send + 'static,
{
    fn recognize(&mut self, image: &RgbaImage, language: &str) -> Result<String, OcrError> {
        self(image, language)
    }
}

/// Asynchronous recognition capability injected into the dispatcher.
///
/// Jobs are submitted without blocking; completions are collected later with
/// `try_recv` from the thread that owns the session.
pub trait OcrEngine {
    /// Current lifecycle state.
    fn state(&self) -> EngineState;

    /// Queue a job. Fails if the engine is not ready or has gone away.
    fn submit(&mut self, job: OcrJob) -> Result<(), OcrError>;

    /// Take one finished job, if any. Never blocks.
    fn try_recv(&mut self) -> Option<OcrCompletion>;
}

/// Engine used when no recognizer is configured. Never becomes ready.
#[derive(Debug, Default)]
pub struct DisabledEngine;

impl OcrEngine for DisabledEngine {
    fn state(&self) -> EngineState {
        EngineState::Failed("no recognizer configured".to_string())
    }

    fn submit(&mut self, _job: OcrJob) -> Result<(), OcrError> {
        Err(OcrError::NotReady)
    }

    fn try_recv(&mut self) -> Option<OcrCompletion> {
        None
    }
}
