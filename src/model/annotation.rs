//! Region geometry, annotation records and hit testing.

use crate::constants::{HANDLE_SIZE, MIN_REGION_SIZE};

/// Unique identifier for a region within its page.
pub type RegionId = u64;

// ============================================================================
// Core Geometry Types
// ============================================================================

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An axis-aligned rectangle in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width of the rectangle
    pub width: f32,
    /// Height of the rectangle
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized bounding box of two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self {
            x: p1.x.min(p2.x),
            y: p1.y.min(p2.y),
            width: (p1.x - p2.x).abs(),
            height: (p1.y - p2.y).abs(),
        }
    }

    /// Whether both sides are strictly larger than the minimum region size.
    pub fn is_committable(&self) -> bool {
        self.width > MIN_REGION_SIZE && self.height > MIN_REGION_SIZE
    }

    /// Closed containment test: edges count as inside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

// ============================================================================
// Resize Handles
// ============================================================================

/// Corner handle of a selected region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Handle {
    /// Hit-test order. The first match wins when corner targets overlap.
    pub const ALL: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
    ];

    /// Position of this handle on a rectangle.
    pub fn position(&self, rect: &Rect) -> Point {
        match self {
            Handle::TopLeft => Point::new(rect.x, rect.y),
            Handle::TopRight => Point::new(rect.right(), rect.y),
            Handle::BottomLeft => Point::new(rect.x, rect.bottom()),
            Handle::BottomRight => Point::new(rect.right(), rect.bottom()),
        }
    }

    pub fn moves_left(&self) -> bool {
        matches!(self, Handle::TopLeft | Handle::BottomLeft)
    }

    pub fn moves_top(&self) -> bool {
        matches!(self, Handle::TopLeft | Handle::TopRight)
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Handle::TopLeft => "tl",
            Handle::TopRight => "tr",
            Handle::BottomLeft => "bl",
            Handle::BottomRight => "br",
        }
    }

    /// Find the handle under `point`.
    ///
    /// The touch target is `HANDLE_SIZE` screen pixels, so in image space it
    /// shrinks as `scale` grows.
    pub fn hit_test(rect: &Rect, point: Point, scale: f32) -> Option<Handle> {
        let threshold = HANDLE_SIZE / scale;
        Handle::ALL.into_iter().find(|handle| {
            let pos = handle.position(rect);
            (point.x - pos.x).abs() <= threshold && (point.y - pos.y).abs() <= threshold
        })
    }

    /// Drag this handle to `point`, editing each addressed edge independently.
    ///
    /// An edge whose new extent would be `<= MIN_REGION_SIZE` keeps its old
    /// value; the other addressed edge still updates.
    pub fn drag(&self, rect: &mut Rect, point: Point) {
        if self.moves_left() {
            let width = rect.right() - point.x;
            if width > MIN_REGION_SIZE {
                rect.width = width;
                rect.x = point.x;
            }
        } else {
            let width = point.x - rect.x;
            if width > MIN_REGION_SIZE {
                rect.width = width;
            }
        }

        if self.moves_top() {
            let height = rect.bottom() - point.y;
            if height > MIN_REGION_SIZE {
                rect.height = height;
                rect.y = point.y;
            }
        } else {
            let height = point.y - rect.y;
            if height > MIN_REGION_SIZE {
                rect.height = height;
            }
        }
    }
}

// ============================================================================
// Region
// ============================================================================

/// A committed text region on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Unique identifier within the owning page.
    pub id: RegionId,
    /// Geometry in image coordinates.
    pub rect: Rect,
    /// Recognized or manually edited text.
    pub text: String,
    /// True while at least one OCR request for this region is outstanding.
    pub is_ocr_running: bool,
}

impl Region {
    /// Create a region with empty text.
    pub fn new(id: RegionId, rect: Rect) -> Self {
        Self {
            id,
            rect,
            text: String::new(),
            is_ocr_running: false,
        }
    }

    /// Apply a sparse patch.
    pub fn apply(&mut self, patch: RegionPatch) {
        self.rect = patch.patched_rect(self.rect);
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(running) = patch.is_ocr_running {
            self.is_ocr_running = running;
        }
    }
}

/// Sparse update for a region. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub text: Option<String>,
    pub is_ocr_running: Option<bool>,
}

impl RegionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the region's origin.
    pub fn origin(mut self, origin: Point) -> Self {
        self.x = Some(origin.x);
        self.y = Some(origin.y);
        self
    }

    /// Replace the whole geometry.
    pub fn rect(mut self, rect: Rect) -> Self {
        self.x = Some(rect.x);
        self.y = Some(rect.y);
        self.width = Some(rect.width);
        self.height = Some(rect.height);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn ocr_running(mut self, running: bool) -> Self {
        self.is_ocr_running = Some(running);
        self
    }

    /// Geometry `rect` would have after this patch.
    pub fn patched_rect(&self, rect: Rect) -> Rect {
        Rect {
            x: self.x.unwrap_or(rect.x),
            y: self.y.unwrap_or(rect.y),
            width: self.width.unwrap_or(rect.width),
            height: self.height.unwrap_or(rect.height),
        }
    }

    pub fn has_geometry(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.width.is_some() || self.height.is_some()
    }

    /// Same patch with the geometry fields cleared.
    pub fn without_geometry(self) -> Self {
        Self {
            x: None,
            y: None,
            width: None,
            height: None,
            ..self
        }
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        !self.has_geometry() && self.text.is_none() && self.is_ocr_running.is_none()
    }
}

/// Find the topmost region containing `point`.
///
/// Later regions are painted over earlier ones, so the scan runs newest first.
pub fn topmost_at(regions: &[Region], point: Point) -> Option<&Region> {
    regions.iter().rev().find(|r| r.rect.contains(point))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_corners() {
        let rect = Rect::from_corners(Point::new(10.0, 20.0), Point::new(50.0, 80.0));
        assert_eq!(rect, Rect::new(10.0, 20.0, 40.0, 60.0));

        // Reversed corners give the same box
        let rect2 = Rect::from_corners(Point::new(50.0, 80.0), Point::new(10.0, 20.0));
        assert_eq!(rect, rect2);
    }

    #[test]
    fn test_rect_contains_is_closed() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert!(rect.contains(Point::new(50.0, 30.0)));
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(110.0, 60.0)));
        assert!(!rect.contains(Point::new(110.1, 60.0)));
        assert!(!rect.contains(Point::new(5.0, 30.0)));
    }

    #[test]
    fn test_committable_is_strict() {
        assert!(Rect::new(0.0, 0.0, 5.1, 5.1).is_committable());
        assert!(!Rect::new(0.0, 0.0, 5.0, 100.0).is_committable());
        assert!(!Rect::new(0.0, 0.0, 100.0, 5.0).is_committable());
    }

    #[test]
    fn test_handle_hit_each_corner() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert_eq!(
            Handle::hit_test(&rect, Point::new(11.0, 9.0), 1.0),
            Some(Handle::TopLeft)
        );
        assert_eq!(
            Handle::hit_test(&rect, Point::new(110.0, 10.0), 1.0),
            Some(Handle::TopRight)
        );
        assert_eq!(
            Handle::hit_test(&rect, Point::new(10.0, 60.0), 1.0),
            Some(Handle::BottomLeft)
        );
        assert_eq!(
            Handle::hit_test(&rect, Point::new(112.0, 62.0), 1.0),
            Some(Handle::BottomRight)
        );
        assert_eq!(Handle::hit_test(&rect, Point::new(60.0, 35.0), 1.0), None);
    }

    #[test]
    fn test_handle_target_shrinks_with_zoom() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        // 6 image px away: inside 8/1 but outside 8/2
        let point = Point::new(16.0, 10.0);
        assert_eq!(Handle::hit_test(&rect, point, 1.0), Some(Handle::TopLeft));
        assert_eq!(Handle::hit_test(&rect, point, 2.0), None);
    }

    #[test]
    fn test_handle_tie_break_prefers_fixed_order() {
        // Tiny rect: every corner target overlaps the centre
        let rect = Rect::new(0.0, 0.0, 6.0, 6.0);
        let centre = Point::new(3.0, 3.0);
        assert_eq!(Handle::hit_test(&rect, centre, 1.0), Some(Handle::TopLeft));

        // Right of centre: tl (x distance 5) and tr (x distance 1) both match
        assert_eq!(
            Handle::hit_test(&rect, Point::new(5.0, 3.0), 1.0),
            Some(Handle::TopLeft)
        );
    }

    #[test]
    fn test_drag_bottom_right_shrinks_height() {
        let mut rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        Handle::BottomRight.drag(&mut rect, Point::new(150.0, 40.0));
        assert_eq!(rect, Rect::new(10.0, 10.0, 140.0, 30.0));
    }

    #[test]
    fn test_drag_top_left_moves_origin() {
        let mut rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        Handle::TopLeft.drag(&mut rect, Point::new(0.0, 20.0));
        assert_eq!(rect, Rect::new(0.0, 20.0, 110.0, 40.0));
    }

    #[test]
    fn test_drag_rejects_collapsing_edge_independently() {
        let mut rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        // x would give width 3 (rejected), y gives height 70 (accepted)
        Handle::BottomRight.drag(&mut rect, Point::new(13.0, 80.0));
        assert_eq!(rect, Rect::new(10.0, 10.0, 100.0, 70.0));

        // Dragging the left edge past the right edge is rejected
        Handle::TopLeft.drag(&mut rect, Point::new(200.0, 10.0));
        assert_eq!(rect, Rect::new(10.0, 10.0, 100.0, 70.0));
    }

    #[test]
    fn test_drag_exact_floor_is_rejected() {
        let mut rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        Handle::BottomRight.drag(&mut rect, Point::new(15.0, 15.0));
        assert_eq!(rect, Rect::new(10.0, 10.0, 100.0, 50.0));
    }

    #[test]
    fn test_topmost_prefers_newest() {
        let regions = vec![
            Region::new(1, Rect::new(0.0, 0.0, 100.0, 100.0)),
            Region::new(2, Rect::new(50.0, 50.0, 100.0, 100.0)),
        ];
        assert_eq!(topmost_at(&regions, Point::new(75.0, 75.0)).map(|r| r.id), Some(2));
        assert_eq!(topmost_at(&regions, Point::new(10.0, 10.0)).map(|r| r.id), Some(1));
        assert!(topmost_at(&regions, Point::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn test_patch_is_sparse() {
        let mut region = Region::new(1, Rect::new(1.0, 2.0, 30.0, 40.0));
        region.apply(RegionPatch::new().text("hello"));
        assert_eq!(region.rect, Rect::new(1.0, 2.0, 30.0, 40.0));
        assert_eq!(region.text, "hello");

        region.apply(RegionPatch::new().origin(Point::new(7.0, 8.0)).ocr_running(true));
        assert_eq!(region.rect, Rect::new(7.0, 8.0, 30.0, 40.0));
        assert!(region.is_ocr_running);
        assert_eq!(region.text, "hello");
    }
}
