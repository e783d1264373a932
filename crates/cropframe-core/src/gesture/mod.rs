//! Gesture controller: raw input in, transform mutations out.
//!
//! The controller owns the ephemeral [`GestureState`] (drag anchor, last
//! touch position, pinch baseline) and turns each [`InputEvent`] into calls
//! on the [`Transform`]. It never holds the transform itself; the session
//! lends it out per event through a [`GestureTarget`], and passes `None`
//! when no image is loaded so that every handler degrades to a no-op.
//!
//! # Mouse vs. touch panning
//!
//! Mouse drags reposition the image absolutely from the anchor recorded on
//! press, so per-event rounding never accumulates. Single-finger touch drags
//! pan incrementally from the previous frame's position instead.
//!
//! # Pinch fusion
//!
//! With two fingers down, each frame zooms about the centroid by the ratio
//! of the current to the previous finger distance (when a previous distance
//! is known), then pans by the centroid's movement on the post-zoom
//! transform.

mod event;

pub use event::{Focus, InputEvent, Key, RotateDirection, ZoomDirection};

use crate::geometry::Point;
use crate::transform::{CropWindow, Transform, NUDGE_STEP};

/// Zoom factor applied per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.08;

/// Zoom factor applied per zoom-button click.
pub const BUTTON_ZOOM_STEP: f64 = 1.05;

/// Rotation applied per rotate-button click, in degrees.
pub const ROTATE_STEP_DEGREES: f64 = 1.0;

/// What a gesture may mutate: the live transform and the crop window it is
/// framed by.
pub struct GestureTarget<'a> {
    pub transform: &'a mut Transform,
    pub crop: &'a CropWindow,
}

/// Ephemeral per-gesture state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureState {
    /// `pointer - transform.xy` recorded on mouse press, while dragging.
    pub drag_anchor: Option<Point>,
    /// A single-finger drag is in progress.
    pub touching: bool,
    /// Last single touch position or two-finger centroid, client space.
    pub last_touch: Point,
    /// Last two-finger distance; `0.0` means no pinch baseline.
    pub last_distance: f64,
}

impl GestureState {
    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }
}

/// Converts input events into transform mutations.
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    state: GestureState,
    /// Client-space position of the canvas' top-left corner.
    canvas_origin: Point,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Tell the controller where the canvas sits in client coordinates.
    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.canvas_origin = origin;
    }

    /// Drop any in-progress gesture.
    pub fn reset(&mut self) {
        self.state = GestureState::default();
    }

    fn to_canvas_local(&self, client: Point) -> Point {
        Point::new(client.x - self.canvas_origin.x, client.y - self.canvas_origin.y)
    }

    /// Handle one event. Returns `true` when the transform changed and the
    /// frame should be re-rendered (and, for keys, the event consumed).
    pub fn handle(&mut self, event: &InputEvent, target: Option<GestureTarget<'_>>) -> bool {
        // Releases reset state even with no image loaded.
        match event {
            InputEvent::PointerUp => {
                self.state.drag_anchor = None;
                return false;
            }
            InputEvent::TouchEnd { touches } => {
                self.touch_end(touches);
                return false;
            }
            _ => {}
        }

        let Some(GestureTarget { transform, crop }) = target else {
            return false;
        };

        match event {
            InputEvent::PointerDown { x, y } => {
                self.state.drag_anchor = Some(Point::new(x - transform.x, y - transform.y));
                false
            }
            InputEvent::PointerMove { x, y } => match self.state.drag_anchor {
                Some(anchor) => {
                    transform.set_position(Point::new(x - anchor.x, y - anchor.y));
                    true
                }
                None => false,
            },
            InputEvent::Wheel { x, y, delta_y } => {
                let factor = if *delta_y < 0.0 {
                    WHEEL_ZOOM_STEP
                } else if *delta_y > 0.0 {
                    1.0 / WHEEL_ZOOM_STEP
                } else {
                    return false;
                };
                let pivot = self.to_canvas_local(Point::new(*x, *y));
                transform.zoom_about(factor, pivot);
                log::debug!("wheel zoom x{factor:.4} about ({:.1}, {:.1})", pivot.x, pivot.y);
                true
            }
            InputEvent::TouchStart { touches } => {
                self.touch_start(touches);
                false
            }
            InputEvent::TouchMove { touches } => self.touch_move(touches, transform),
            InputEvent::Key { key, focus } => {
                if *focus == Focus::TextInput {
                    return false;
                }
                match key.direction() {
                    Some((dx, dy)) => {
                        transform.nudge(dx * NUDGE_STEP, dy * NUDGE_STEP);
                        true
                    }
                    None => false,
                }
            }
            InputEvent::ZoomButton { direction } => {
                let factor = match direction {
                    ZoomDirection::In => BUTTON_ZOOM_STEP,
                    ZoomDirection::Out => 1.0 / BUTTON_ZOOM_STEP,
                };
                transform.zoom_about(factor, crop.center());
                true
            }
            InputEvent::RotateButton { direction } => {
                let delta = match direction {
                    RotateDirection::Clockwise => ROTATE_STEP_DEGREES,
                    RotateDirection::CounterClockwise => -ROTATE_STEP_DEGREES,
                };
                transform.rotate_by(delta);
                true
            }
            InputEvent::PointerUp | InputEvent::TouchEnd { .. } => false,
        }
    }

    fn touch_start(&mut self, touches: &[Point]) {
        match touches {
            [only] => {
                self.state.touching = true;
                self.state.last_touch = *only;
            }
            [a, b] => {
                self.state.last_distance = a.distance(*b);
                self.state.last_touch = a.midpoint(*b);
            }
            _ => {}
        }
    }

    fn touch_move(&mut self, touches: &[Point], transform: &mut Transform) -> bool {
        match touches {
            [only] if self.state.touching => {
                transform.pan(only.x - self.state.last_touch.x, only.y - self.state.last_touch.y);
                self.state.last_touch = *only;
                true
            }
            [a, b] => {
                let distance = a.distance(*b);
                let centroid = a.midpoint(*b);

                if self.state.last_distance > 0.0 {
                    let factor = distance / self.state.last_distance;
                    transform.zoom_about(factor, self.to_canvas_local(centroid));
                }
                transform.pan(
                    centroid.x - self.state.last_touch.x,
                    centroid.y - self.state.last_touch.y,
                );

                self.state.last_distance = distance;
                self.state.last_touch = centroid;
                true
            }
            _ => false,
        }
    }

    fn touch_end(&mut self, remaining: &[Point]) {
        if remaining.len() < 2 {
            self.state.last_distance = 0.0;
        }
        match remaining {
            [] => self.state.touching = false,
            // Re-baseline on the finger that stayed down so the next
            // single-finger frame does not jump from the old centroid.
            [only] => self.state.last_touch = *only,
            _ => {}
        }
    }
}
