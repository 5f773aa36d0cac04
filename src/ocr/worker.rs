//! Background thread that hosts a recognizer.
//!
//! The recognizer is constructed lazily on the worker thread when `start` is
//! called, so a slow model load never blocks the caller. Jobs are served in
//! submission order; results come back over a channel and are collected with
//! non-blocking polls.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use super::engine::{EngineState, OcrCompletion, OcrEngine, OcrError, OcrJob, Recognizer};

/// Boxed constructor for the recognizer, run once on the worker thread.
pub type RecognizerLoader<R> = Box<dyn FnOnce() -> Result<R, OcrError> + Send>;

/// Message sent to the worker thread.
enum ThreadMessage {
    /// Recognize one region
    Recognize(OcrJob),
    /// Shutdown the thread
    Shutdown,
}

/// Running worker: channels plus the thread handle.
struct Worker {
    request_tx: Sender<ThreadMessage>,
    result_rx: Receiver<OcrCompletion>,
    thread_handle: Option<JoinHandle<()>>,
}

/// OCR engine backed by a dedicated background thread.
pub struct WorkerEngine<R: Recognizer> {
    loader: Option<RecognizerLoader<R>>,
    state: Arc<Mutex<EngineState>>,
    worker: Option<Worker>,
}

impl<R: Recognizer> WorkerEngine<R> {
    /// Create an engine. Nothing is loaded until `start` is called.
    pub fn new(loader: impl FnOnce() -> Result<R, OcrError> + Send + 'static) -> Self {
        Self {
            loader: Some(Box::new(loader)),
            state: Arc::new(Mutex::new(EngineState::Uninitialized)),
            worker: None,
        }
    }

    /// Spawn the worker thread and begin loading the recognizer.
    ///
    /// Calling this more than once is a no-op.
    pub fn start(&mut self) -> Result<(), OcrError> {
        let Some(loader) = self.loader.take() else {
            return Ok(());
        };

        let (request_tx, request_rx) = mpsc::channel::<ThreadMessage>();
        let (result_tx, result_rx) = mpsc::channel::<OcrCompletion>();
        let state = Arc::clone(&self.state);
        set_state(&self.state, EngineState::Loading);

        let thread_handle = thread::Builder::new()
            .name("ocr-worker".to_string())
            .spawn(move || {
                log::info!("OCR worker thread started");
                let loaded = panic::catch_unwind(AssertUnwindSafe(loader))
                    .unwrap_or_else(|payload| Err(OcrError::Load(panic_message(&*payload))));
                match loaded {
                    Ok(recognizer) => {
                        set_state(&state, EngineState::Ready);
                        log::info!("OCR engine ready");
                        Self::thread_loop(recognizer, request_rx, result_tx);
                    }
                    Err(e) => {
                        log::warn!("OCR engine failed to load: {}", e);
                        set_state(&state, EngineState::Failed(e.to_string()));
                    }
                }
                log::info!("OCR worker thread exiting");
            })
            .map_err(|e| {
                let reason = format!("Failed to spawn OCR worker: {}", e);
                set_state(&self.state, EngineState::Failed(reason.clone()));
                OcrError::Load(reason)
            })?;

        self.worker = Some(Worker {
            request_tx,
            result_rx,
            thread_handle: Some(thread_handle),
        });
        Ok(())
    }

    /// Worker thread main loop.
    fn thread_loop(
        mut recognizer: R,
        request_rx: Receiver<ThreadMessage>,
        result_tx: Sender<OcrCompletion>,
    ) {
        loop {
            match request_rx.recv() {
                Ok(ThreadMessage::Recognize(job)) => {
                    log::debug!(
                        "Recognizing ticket {} ({}x{})",
                        job.ticket,
                        job.image.width(),
                        job.image.height()
                    );
                    let result = panic::catch_unwind(AssertUnwindSafe(|| {
                        recognizer.recognize(&job.image, &job.language)
                    }))
                    .unwrap_or_else(|payload| {
                        let reason = panic_message(&*payload);
                        log::error!("Recognizer panicked on ticket {}: {}", job.ticket, reason);
                        Err(OcrError::Recognition(reason))
                    });
                    if result_tx.send(job.complete(result)).is_err() {
                        log::warn!("Result channel closed, OCR worker exiting");
                        break;
                    }
                }
                Ok(ThreadMessage::Shutdown) => {
                    log::debug!("Received shutdown signal");
                    break;
                }
                Err(_) => {
                    log::debug!("Request channel closed, OCR worker exiting");
                    break;
                }
            }
        }
    }
}

/// Text of a caught panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        format!("panic: {}", text)
    } else if let Some(text) = payload.downcast_ref::<String>() {
        format!("panic: {}", text)
    } else {
        "panic".to_string()
    }
}

fn set_state(state: &Mutex<EngineState>, value: EngineState) {
    match state.lock() {
        Ok(mut guard) => *guard = value,
        Err(poisoned) => *poisoned.into_inner() = value,
    }
}

impl<R: Recognizer> OcrEngine for WorkerEngine<R> {
    fn state(&self) -> EngineState {
        match self.state.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn submit(&mut self, job: OcrJob) -> Result<(), OcrError> {
        if !self.state().is_ready() {
            return Err(OcrError::NotReady);
        }
        let worker = self.worker.as_ref().ok_or(OcrError::NotReady)?;
        worker
            .request_tx
            .send(ThreadMessage::Recognize(job))
            .map_err(|_| {
                log::error!("Failed to send OCR job: channel closed");
                OcrError::Disconnected
            })
            .inspect_err(|_| self.mark_disconnected())
    }

    fn try_recv(&mut self) -> Option<OcrCompletion> {
        let worker = self.worker.as_ref()?;
        match worker.result_rx.try_recv() {
            Ok(completion) => Some(completion),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.mark_disconnected();
                None
            }
        }
    }
}

impl<R: Recognizer> WorkerEngine<R> {
    /// Record that the worker thread is gone. A load failure keeps its reason.
    fn mark_disconnected(&self) {
        if !matches!(self.state(), EngineState::Failed(_)) {
            log::error!("OCR worker disconnected");
            set_state(&self.state, EngineState::Failed("worker disconnected".to_string()));
        }
    }
}

impl<R: Recognizer> Drop for WorkerEngine<R> {
    fn drop(&mut self) {
        let Some(mut worker) = self.worker.take() else {
            return;
        };
        log::debug!("Shutting down OCR worker");

        let _ = worker.request_tx.send(ThreadMessage::Shutdown);

        if let Some(handle) = worker.thread_handle.take() {
            if let Err(e) = handle.join() {
                log::warn!("OCR worker panicked: {:?}", e);
            }
        }
    }
}
