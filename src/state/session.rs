//! Session state: pages, current page, selection, zoom and the OCR toggle.

use crate::constants::zoom;
use crate::model::{Page, PageId, PageSource, Rect, Region, RegionId, RegionPatch};
use crate::zoom_math;

use super::action::Action;
use super::interaction::Gesture;

/// All mutable annotation state, owned by a single controller.
///
/// Invariant: `selected`, if set, names a region on the current page.
#[derive(Debug, Clone)]
pub struct Session {
    pub(super) pages: Vec<Page>,
    pub(super) current_page_index: usize,
    pub(super) selected: Option<RegionId>,
    pub(super) scale: f32,
    pub(super) default_scale: f32,
    pub(super) ocr_enabled: bool,
    pub(super) gesture: Gesture,
    next_page_id: PageId,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            current_page_index: 0,
            selected: None,
            scale: zoom::DEFAULT,
            default_scale: zoom::DEFAULT,
            ocr_enabled: true,
            gesture: Gesture::Idle,
            next_page_id: 1,
        }
    }

    /// Set the zoom applied after the first upload.
    pub fn with_default_scale(mut self, scale: f32) -> Self {
        self.default_scale = zoom_math::clamp_scale(scale);
        self.scale = self.default_scale;
        self
    }

    pub fn with_ocr_enabled(mut self, enabled: bool) -> Self {
        self.ocr_enabled = enabled;
        self
    }

    /// Apply one reducer action. Returns whether anything changed.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::AddPages(sources) => !self.add_pages(sources).is_empty(),
            Action::SetPage(index) => {
                let before = self.current_page_index;
                self.set_current_page_index(index);
                before != self.current_page_index
            }
            Action::AddRect(region) => self.add_rect(region),
            Action::UpdateRect { id, patch } => self.update_rect(id, patch),
            Action::DeleteRect(id) => self.delete_rect(id),
            Action::SetText { id, text } => self.set_text(id, text),
        }
    }

    // ========================================================================
    // Pages
    // ========================================================================

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_page_index(&self) -> usize {
        self.current_page_index
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.pages.get(self.current_page_index)
    }

    pub(crate) fn current_page_mut(&mut self) -> Option<&mut Page> {
        self.pages.get_mut(self.current_page_index)
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id() == id)
    }

    fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id() == id)
    }

    /// Regions shown for the current page (empty when nothing is loaded).
    pub fn current_regions(&self) -> &[Region] {
        self.current_page().map(Page::regions).unwrap_or(&[])
    }

    /// Append one page per source, in the given order.
    ///
    /// The first upload also selects page 0 and resets zoom to its default.
    pub fn add_pages(&mut self, sources: Vec<PageSource>) -> Vec<PageId> {
        let first_upload = self.pages.is_empty();
        let mut ids = Vec::with_capacity(sources.len());

        for source in sources {
            let id = self.next_page_id;
            self.next_page_id += 1;
            log::info!("Added page {} ({})", id, source.name);
            self.pages.push(Page::new(id, source));
            ids.push(id);
        }

        if first_upload && !ids.is_empty() {
            self.current_page_index = 0;
            self.scale = self.default_scale;
            self.selected = None;
            self.cancel_gesture();
        }
        ids
    }

    /// Switch pages. The index is clamped to the valid range.
    ///
    /// Selection and any in-progress gesture are always cleared.
    pub fn set_current_page_index(&mut self, index: usize) {
        self.selected = None;
        self.cancel_gesture();

        if self.pages.is_empty() {
            return;
        }
        let clamped = index.min(self.pages.len() - 1);
        if clamped != self.current_page_index {
            log::debug!("Switching to page {} of {}", clamped + 1, self.pages.len());
        }
        self.current_page_index = clamped;
    }

    pub fn next_page(&mut self) {
        self.set_current_page_index(self.current_page_index.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_current_page_index(self.current_page_index.saturating_sub(1));
    }

    // ========================================================================
    // Regions on the current page
    // ========================================================================

    /// Insert a prebuilt region into the current page.
    ///
    /// Rejected on an id collision or when either side is at or below the
    /// minimum size.
    pub fn add_rect(&mut self, region: Region) -> bool {
        self.current_page_mut()
            .map(|page| page.insert(region))
            .unwrap_or(false)
    }

    /// Create a region with a fresh id on the current page.
    ///
    /// Undersized rectangles are rejected.
    pub fn add_new_rect(&mut self, rect: Rect) -> Option<RegionId> {
        self.current_page_mut()?.add_rect(rect)
    }

    pub fn update_rect(&mut self, id: RegionId, patch: RegionPatch) -> bool {
        self.current_page_mut()
            .map(|page| page.update(id, patch))
            .unwrap_or(false)
    }

    pub fn set_text(&mut self, id: RegionId, text: impl Into<String>) -> bool {
        self.update_rect(id, RegionPatch::new().text(text))
    }

    /// Delete a region, clearing the selection if it pointed at it.
    pub fn delete_rect(&mut self, id: RegionId) -> bool {
        let removed = self
            .current_page_mut()
            .and_then(|page| page.remove(id))
            .is_some();

        if removed {
            if self.selected == Some(id) {
                self.selected = None;
            }
            if self.gesture.region_id() == Some(id) {
                self.cancel_gesture();
            }
            log::debug!("Deleted region {}", id);
        }
        removed
    }

    /// Patch a region on a specific page, whichever page is current.
    pub fn update_region_on_page(
        &mut self,
        page_id: PageId,
        id: RegionId,
        patch: RegionPatch,
    ) -> bool {
        self.page_mut(page_id)
            .map(|page| page.update(id, patch))
            .unwrap_or(false)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn selected(&self) -> Option<RegionId> {
        self.selected
    }

    pub fn selected_region(&self) -> Option<&Region> {
        let id = self.selected?;
        self.current_page()?.region(id)
    }

    /// Select a region on the current page, or clear with `None`.
    ///
    /// Unknown ids leave the selection unchanged.
    pub fn select(&mut self, id: Option<RegionId>) -> bool {
        match id {
            None => {
                self.selected = None;
                true
            }
            Some(id) if self.current_page().and_then(|p| p.region(id)).is_some() => {
                self.selected = Some(id);
                true
            }
            Some(_) => false,
        }
    }

    // ========================================================================
    // Zoom and OCR toggle
    // ========================================================================

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = zoom_math::clamp_scale(scale);
    }

    /// Set zoom from the slider, which covers a narrower range.
    pub fn set_scale_from_slider(&mut self, scale: f32) {
        self.scale = zoom_math::clamp_slider(scale);
    }

    pub fn zoom_in(&mut self) {
        self.scale = zoom_math::step_in(self.scale);
        log::debug!("Zoom in: {:.2}x", self.scale);
    }

    pub fn zoom_out(&mut self) {
        self.scale = zoom_math::step_out(self.scale);
        log::debug!("Zoom out: {:.2}x", self.scale);
    }

    pub fn is_ocr_enabled(&self) -> bool {
        self.ocr_enabled
    }

    pub fn set_ocr_enabled(&mut self, enabled: bool) {
        self.ocr_enabled = enabled;
    }
}
