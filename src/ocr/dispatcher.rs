//! OCR request lifecycle: crop, submit, and apply completions.
//!
//! Dispatch returns right after marking the region as running. Results are
//! applied later by `poll`, which runs on the thread that owns the session,
//! so completions interleave with user edits but never preempt them.
//!
//! Every write-back is scoped to the page the request came from and re-checks
//! that the region still exists. Overlapping requests for the same region
//! are not de-duplicated; by default the last one to complete wins.

use std::collections::HashMap;

use image::{DynamicImage, RgbaImage};

use crate::constants::ocr::ERROR_TEXT;
use crate::model::{PageId, Rect, RegionId, RegionPatch};
use crate::state::Session;

use super::engine::{EngineState, OcrCompletion, OcrEngine, OcrError, OcrJob, Ticket};

/// Requests still outstanding for one region.
#[derive(Debug, Clone, Copy)]
struct InFlight {
    outstanding: usize,
    latest: Ticket,
}

/// Issues recognition requests and writes their results back.
pub struct OcrDispatcher<E: OcrEngine> {
    engine: E,
    language: String,
    drop_stale: bool,
    next_ticket: Ticket,
    in_flight: HashMap<(PageId, RegionId), InFlight>,
}

impl<E: OcrEngine> OcrDispatcher<E> {
    pub fn new(engine: E, language: impl Into<String>) -> Self {
        Self {
            engine,
            language: language.into(),
            drop_stale: false,
            next_ticket: 1,
            in_flight: HashMap::new(),
        }
    }

    /// Discard text from a completion when a newer request for the same
    /// region has been issued since.
    pub fn with_drop_stale(mut self, drop_stale: bool) -> Self {
        self.drop_stale = drop_stale;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Number of requests issued but not yet applied.
    pub fn pending_count(&self) -> usize {
        self.in_flight.values().map(|f| f.outstanding).sum()
    }

    /// Whether any request for this region is outstanding.
    pub fn is_pending(&self, page_id: PageId, region_id: RegionId) -> bool {
        self.in_flight.contains_key(&(page_id, region_id))
    }

    /// Start recognition of one region.
    ///
    /// Skipped silently (returns `None`) when the engine is not ready or the
    /// region does not exist.
    pub fn dispatch(
        &mut self,
        session: &mut Session,
        page_id: PageId,
        region_id: RegionId,
    ) -> Option<Ticket> {
        let state = self.engine.state();
        if !state.is_ready() {
            log::debug!("OCR skipped for region {}: engine {:?}", region_id, state);
            return None;
        }

        let page = session.page(page_id)?;
        let rect = page.region(region_id)?.rect;
        let crop = crop_region(page.image(), &rect);

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let entry = self
            .in_flight
            .entry((page_id, region_id))
            .or_insert(InFlight {
                outstanding: 0,
                latest: ticket,
            });
        entry.outstanding += 1;
        entry.latest = ticket;
        session.update_region_on_page(page_id, region_id, RegionPatch::new().ocr_running(true));

        let Some(image) = crop else {
            log::warn!("Region {} lies outside its image, nothing to recognize", region_id);
            let done = OcrCompletion::new(ticket, page_id, region_id, Err(OcrError::EmptyRegion));
            self.apply(session, done);
            return Some(ticket);
        };

        log::debug!(
            "Dispatching OCR ticket {} for region {} ({}x{})",
            ticket,
            region_id,
            image.width(),
            image.height()
        );
        let job = OcrJob {
            ticket,
            page_id,
            region_id,
            image,
            language: self.language.clone(),
        };
        if let Err(e) = self.engine.submit(job) {
            self.apply(session, OcrCompletion::new(ticket, page_id, region_id, Err(e)));
        }
        Some(ticket)
    }

    /// Apply every completion that has arrived. Returns how many were handled.
    ///
    /// If the engine has failed, requests it will never answer are completed
    /// here as failures so no region stays marked as running.
    pub fn poll(&mut self, session: &mut Session) -> usize {
        let mut handled = 0;
        while let Some(done) = self.engine.try_recv() {
            self.apply(session, done);
            handled += 1;
        }

        if self.in_flight.is_empty() {
            return handled;
        }
        if let EngineState::Failed(reason) = self.engine.state() {
            log::warn!(
                "OCR engine failed ({}), abandoning {} pending requests",
                reason,
                self.pending_count()
            );
            handled += self.fail_outstanding(session);
        }
        handled
    }

    /// Complete every outstanding request as disconnected.
    fn fail_outstanding(&mut self, session: &mut Session) -> usize {
        let stranded: Vec<_> = self.in_flight.drain().collect();
        for ((page_id, region_id), entry) in &stranded {
            let done = OcrCompletion::new(
                entry.latest,
                *page_id,
                *region_id,
                Err(OcrError::Disconnected),
            );
            self.apply(session, done);
        }
        stranded.len()
    }

    /// Write one completion back into the session.
    pub fn apply(&mut self, session: &mut Session, done: OcrCompletion) {
        let key = (done.page_id, done.region_id);
        let (still_running, stale) = match self.in_flight.get_mut(&key) {
            Some(entry) => {
                entry.outstanding = entry.outstanding.saturating_sub(1);
                let state = (entry.outstanding > 0, entry.latest != done.ticket);
                if entry.outstanding == 0 {
                    self.in_flight.remove(&key);
                }
                state
            }
            None => (false, false),
        };

        let mut patch = RegionPatch::new().ocr_running(still_running);
        if self.drop_stale && stale {
            log::debug!(
                "Dropping stale OCR ticket {} for region {}",
                done.ticket,
                done.region_id
            );
        } else {
            let text = match done.result {
                Ok(text) => text.trim().to_string(),
                Err(e) => {
                    log::warn!("OCR failed for region {}: {}", done.region_id, e);
                    ERROR_TEXT.to_string()
                }
            };
            patch = patch.text(text);
        }

        if !session.update_region_on_page(done.page_id, done.region_id, patch) {
            log::debug!(
                "OCR ticket {} arrived for removed region {}",
                done.ticket,
                done.region_id
            );
        }
    }
}

/// Crop `image` to `rect`, rounded to whole pixels and clipped to the image.
///
/// Returns `None` when nothing of the region overlaps the image.
pub fn crop_region(image: &DynamicImage, rect: &Rect) -> Option<RgbaImage> {
    let left = rect.x.round().max(0.0);
    let top = rect.y.round().max(0.0);
    let right = rect.right().round().min(image.width() as f32);
    let bottom = rect.bottom().round().min(image.height() as f32);
    if right <= left || bottom <= top {
        return None;
    }

    let (x, y) = (left as u32, top as u32);
    let (width, height) = ((right - left) as u32, (bottom - top) as u32);
    Some(image.crop_imm(x, y, width, height).to_rgba8())
}
