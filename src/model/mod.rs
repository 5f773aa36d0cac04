//! Data models for pages and text regions.

mod annotation;
mod page;

pub use annotation::{Handle, Point, Rect, Region, RegionId, RegionPatch, topmost_at};
pub use page::{ImageRef, Page, PageId, PageSource};
