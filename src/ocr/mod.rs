//! Asynchronous text recognition for committed regions.
//!
//! - `engine`: the injected recognition capability and its lifecycle
//! - `worker`: an engine that runs a recognizer on a background thread
//! - `dispatcher`: per-region request tracking and write-back

mod dispatcher;
mod engine;
mod worker;

pub use dispatcher::{OcrDispatcher, crop_region};
pub use engine::{
    DisabledEngine, EngineState, OcrCompletion, OcrEngine, OcrError, OcrJob, Recognizer, Ticket,
};
pub use worker::{RecognizerLoader, WorkerEngine};
