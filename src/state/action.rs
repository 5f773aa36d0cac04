//! Reducer actions over the session store.

use crate::model::{PageSource, Region, RegionId, RegionPatch};

/// A mutation of the page and annotation store.
#[derive(Debug, Clone)]
pub enum Action {
    /// Append pages, one per source, in order
    AddPages(Vec<PageSource>),
    /// Switch to a page (clamped)
    SetPage(usize),
    /// Insert a region into the current page
    AddRect(Region),
    /// Patch a region on the current page
    UpdateRect { id: RegionId, patch: RegionPatch },
    /// Delete a region from the current page
    DeleteRect(RegionId),
    /// Replace a region's text on the current page
    SetText { id: RegionId, text: String },
}
