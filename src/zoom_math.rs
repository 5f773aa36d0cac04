//! Screen/image coordinate mathematics.
//!
//! Regions are stored in image space, which does not change with zoom.
//! Pointer events arrive in screen space, where everything is scaled by the
//! zoom factor and offset by the origin of the drawing surface.

use crate::constants::zoom;
use crate::model::Point;

/// Map a screen-space point into image space.
pub fn to_image_space(screen: Point, surface_origin: Point, scale: f32) -> Point {
    Point::new(
        (screen.x - surface_origin.x) / scale,
        (screen.y - surface_origin.y) / scale,
    )
}

/// Map an image-space point into screen space.
pub fn to_screen_space(image: Point, surface_origin: Point, scale: f32) -> Point {
    Point::new(
        image.x * scale + surface_origin.x,
        image.y * scale + surface_origin.y,
    )
}

/// Clamp a zoom factor to the supported range.
///
/// Non-finite input falls back to the default zoom.
pub fn clamp_scale(scale: f32) -> f32 {
    if !scale.is_finite() {
        return zoom::DEFAULT;
    }
    scale.clamp(zoom::MIN, zoom::MAX)
}

/// Zoom in by one fixed step.
pub fn step_in(scale: f32) -> f32 {
    clamp_scale(scale + zoom::STEP)
}

/// Zoom out by one fixed step.
pub fn step_out(scale: f32) -> f32 {
    clamp_scale(scale - zoom::STEP)
}

/// Clamp a slider value to the slider's narrower range.
pub fn clamp_slider(scale: f32) -> f32 {
    clamp_scale(scale).min(zoom::SLIDER_MAX)
}
