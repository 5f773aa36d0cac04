//! Pointer-driven draw/move/resize state machine.
//!
//! All points are in image space, so gestures behave the same at every zoom
//! level. Pointer-leave is handled exactly like pointer-up.

use crate::model::{Handle, Point, Rect, RegionId, RegionPatch, topmost_at};

use super::session::Session;

/// The gesture currently in progress.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Drawing a new region from `start` to the latest pointer position.
    Drawing {
        start: Point,
        current: Option<Point>,
    },
    /// Dragging a region; `drag_offset` is the pointer minus the region origin.
    Moving {
        region_id: RegionId,
        drag_offset: Point,
    },
    /// Dragging one corner handle of the selected region.
    Resizing { region_id: RegionId, handle: Handle },
}

impl Gesture {
    /// Region this gesture edits, if any.
    pub fn region_id(&self) -> Option<RegionId> {
        match self {
            Gesture::Moving { region_id, .. } | Gesture::Resizing { region_id, .. } => {
                Some(*region_id)
            }
            Gesture::Idle | Gesture::Drawing { .. } => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Normalized rectangle of an in-progress draw.
    pub fn draft(&self) -> Option<Rect> {
        match self {
            Gesture::Drawing {
                start,
                current: Some(current),
            } => Some(Rect::from_corners(*start, *current)),
            _ => None,
        }
    }
}

impl Session {
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Ephemeral rectangle of the draw in progress, for rendering.
    pub fn draft(&self) -> Option<Rect> {
        self.gesture.draft()
    }

    /// Abandon any gesture without committing a draft.
    pub fn cancel_gesture(&mut self) {
        if !self.gesture.is_idle() {
            log::debug!("Gesture cancelled: {:?}", self.gesture);
        }
        self.gesture = Gesture::Idle;
    }

    /// Pointer pressed at an image-space point.
    ///
    /// A handle of the selected region wins over region interiors, and
    /// interiors win over empty space.
    pub fn pointer_down(&mut self, point: Point) {
        let scale = self.scale;
        let Some(page) = self.current_page() else {
            return;
        };

        let handle_hit = self.selected_region().and_then(|region| {
            Handle::hit_test(&region.rect, point, scale).map(|handle| (region.id, handle))
        });
        if let Some((region_id, handle)) = handle_hit {
            log::debug!("Resize start on region {} ({})", region_id, handle.name());
            self.gesture = Gesture::Resizing { region_id, handle };
            return;
        }

        if let Some(region) = topmost_at(page.regions(), point) {
            let region_id = region.id;
            let drag_offset = point - region.rect.origin();
            log::debug!("Move start on region {}", region_id);
            self.selected = Some(region_id);
            self.gesture = Gesture::Moving {
                region_id,
                drag_offset,
            };
            return;
        }

        log::trace!("Draw start at ({:.1}, {:.1})", point.x, point.y);
        self.selected = None;
        self.gesture = Gesture::Drawing {
            start: point,
            current: None,
        };
    }

    /// Pointer moved to an image-space point.
    pub fn pointer_move(&mut self, point: Point) {
        match self.gesture.clone() {
            Gesture::Idle => {}
            Gesture::Drawing { start, .. } => {
                self.gesture = Gesture::Drawing {
                    start,
                    current: Some(point),
                };
            }
            Gesture::Moving {
                region_id,
                drag_offset,
            } => {
                // No clamping: regions may be dragged off the image.
                let origin = point - drag_offset;
                self.update_rect(region_id, RegionPatch::new().origin(origin));
            }
            Gesture::Resizing { region_id, handle } => {
                let Some(mut rect) = self
                    .current_page()
                    .and_then(|page| page.region(region_id))
                    .map(|region| region.rect)
                else {
                    return;
                };
                handle.drag(&mut rect, point);
                self.update_rect(region_id, RegionPatch::new().rect(rect));
            }
        }
    }

    /// Pointer released. Returns the id of a newly committed region.
    ///
    /// A draft commits only when both sides exceed the minimum size; the new
    /// region becomes the selection.
    pub fn pointer_up(&mut self) -> Option<RegionId> {
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            Gesture::Drawing { .. } => {
                let rect = gesture.draft()?;
                if !rect.is_committable() {
                    log::debug!(
                        "Discarding draft {:.1}x{:.1}: too small",
                        rect.width,
                        rect.height
                    );
                    return None;
                }
                let id = self.add_new_rect(rect)?;
                self.selected = Some(id);
                log::info!(
                    "Committed region {} at ({:.0}, {:.0}) {:.0}x{:.0}",
                    id,
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height
                );
                Some(id)
            }
            Gesture::Moving { region_id, .. } => {
                log::debug!("Move end on region {}", region_id);
                None
            }
            Gesture::Resizing { region_id, handle } => {
                log::debug!("Resize end on region {} ({})", region_id, handle.name());
                None
            }
            Gesture::Idle => None,
        }
    }

    /// Pointer left the drawing surface; same as releasing it.
    pub fn pointer_leave(&mut self) -> Option<RegionId> {
        self.pointer_up()
    }
}
