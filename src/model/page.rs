//! Pages: one uploaded image plus its own regions.

use std::sync::Arc;

use image::DynamicImage;

use super::annotation::{Rect, Region, RegionId, RegionPatch};

/// Unique identifier for a page within a session.
pub type PageId = u64;

/// Shared handle to decoded pixel data. Pages never own a private copy.
pub type ImageRef = Arc<DynamicImage>;

/// An image ready to become a page.
#[derive(Clone, Debug)]
pub struct PageSource {
    /// Display name (usually the uploaded file name)
    pub name: String,
    /// Decoded pixels
    pub image: ImageRef,
}

impl PageSource {
    pub fn new(name: impl Into<String>, image: impl Into<ImageRef>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
        }
    }
}

/// One loaded image and its regions, in creation order.
#[derive(Clone, Debug)]
pub struct Page {
    id: PageId,
    name: String,
    image: ImageRef,
    regions: Vec<Region>,
    next_region_id: RegionId,
}

impl Page {
    pub fn new(id: PageId, source: PageSource) -> Self {
        Self {
            id,
            name: source.name,
            image: source.image,
            regions: Vec::new(),
            next_region_id: 1,
        }
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    /// Regions in creation order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// 1-based display index of a region (`#1`, `#2`, ...).
    pub fn display_index(&self, id: RegionId) -> Option<usize> {
        self.regions.iter().position(|r| r.id == id).map(|i| i + 1)
    }

    /// Create a region with a fresh id and return that id.
    ///
    /// Returns `None` when either side is at or below the minimum size, or
    /// when the id space is exhausted.
    pub fn add_rect(&mut self, rect: Rect) -> Option<RegionId> {
        if !rect.is_committable() {
            log::debug!(
                "Rejected region {:.1}x{:.1} on page {}: too small",
                rect.width,
                rect.height,
                self.id
            );
            return None;
        }
        let id = self.next_region_id;
        self.next_region_id = id.checked_add(1)?;
        self.regions.push(Region::new(id, rect));
        Some(id)
    }

    /// Insert a prebuilt region. Its id must not already be in use.
    ///
    /// Returns false (and leaves the page untouched) on an id collision, an
    /// undersized rectangle, or an id too large to advance the counter past.
    pub fn insert(&mut self, region: Region) -> bool {
        if self.region(region.id).is_some() || !region.rect.is_committable() {
            return false;
        }
        let Some(next) = region.id.checked_add(1) else {
            log::warn!("Rejected region id {} on page {}: out of range", region.id, self.id);
            return false;
        };
        self.next_region_id = self.next_region_id.max(next);
        self.regions.push(region);
        true
    }

    /// Patch a region. Missing ids are ignored.
    ///
    /// Geometry that would leave a side at or below the minimum size is
    /// dropped; the rest of the patch still applies.
    pub fn update(&mut self, id: RegionId, patch: RegionPatch) -> bool {
        let Some(region) = self.regions.iter_mut().find(|r| r.id == id) else {
            return false;
        };

        let mut patch = patch;
        if patch.has_geometry() && !patch.patched_rect(region.rect).is_committable() {
            log::debug!("Ignoring undersized geometry for region {}", id);
            patch = patch.without_geometry();
            if patch.is_empty() {
                return false;
            }
        }
        region.apply(patch);
        true
    }

    /// Remove a region. Missing ids are ignored.
    pub fn remove(&mut self, id: RegionId) -> Option<Region> {
        let index = self.regions.iter().position(|r| r.id == id)?;
        Some(self.regions.remove(index))
    }
}
