//! Toolkit-independent input events.
//!
//! Hosts translate their native pointer, wheel, touch, keyboard and button
//! callbacks into [`InputEvent`] values and dispatch them one at a time, in
//! arrival order. Pointer and touch positions are in client (window)
//! coordinates; the controller converts them to canvas-local coordinates
//! where a pivot is needed.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// One raw input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Primary mouse button pressed on the canvas.
    PointerDown { x: f64, y: f64 },
    /// Mouse moved anywhere in the window.
    PointerMove { x: f64, y: f64 },
    /// Mouse button released anywhere in the window.
    PointerUp,
    /// Wheel scrolled over the canvas. Negative `delta_y` zooms in.
    Wheel { x: f64, y: f64, delta_y: f64 },
    /// A finger touched down; `touches` lists every active touch.
    TouchStart { touches: Vec<Point> },
    /// Active touches moved.
    TouchMove { touches: Vec<Point> },
    /// A finger lifted; `touches` lists the touches that remain.
    TouchEnd { touches: Vec<Point> },
    /// A key was pressed while `focus` had keyboard focus.
    Key {
        key: Key,
        #[serde(default)]
        focus: Focus,
    },
    /// Zoom button clicked.
    ZoomButton { direction: ZoomDirection },
    /// Rotate button clicked.
    RotateButton { direction: RotateDirection },
}

/// Keys the controller reacts to. Everything else maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    #[serde(other)]
    Other,
}

impl Key {
    /// Unit nudge direction for arrow keys.
    pub fn direction(self) -> Option<(i32, i32)> {
        match self {
            Key::ArrowLeft => Some((-1, 0)),
            Key::ArrowRight => Some((1, 0)),
            Key::ArrowUp => Some((0, -1)),
            Key::ArrowDown => Some((0, 1)),
            Key::Other => None,
        }
    }
}

/// Where keyboard focus was when a key event fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    /// The canvas or the document body.
    #[default]
    Canvas,
    /// A text field, text area or selection list. Arrow keys belong to it.
    TextInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomDirection {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event: InputEvent =
            serde_json::from_str(r#"{"type":"wheel","x":10.0,"y":20.0,"delta_y":-3.0}"#).unwrap();
        assert_eq!(
            event,
            InputEvent::Wheel {
                x: 10.0,
                y: 20.0,
                delta_y: -3.0
            }
        );

        let event: InputEvent = serde_json::from_str(
            r#"{"type":"touch_move","touches":[{"x":1.0,"y":2.0},{"x":3.0,"y":4.0}]}"#,
        )
        .unwrap();
        assert!(matches!(event, InputEvent::TouchMove { ref touches } if touches.len() == 2));
    }

    #[test]
    fn test_unknown_key_maps_to_other() {
        let event: InputEvent =
            serde_json::from_str(r#"{"type":"key","key":"Enter","focus":"canvas"}"#).unwrap();
        assert_eq!(
            event,
            InputEvent::Key {
                key: Key::Other,
                focus: Focus::Canvas
            }
        );
    }

    #[test]
    fn test_focus_defaults_to_canvas() {
        let event: InputEvent = serde_json::from_str(r#"{"type":"key","key":"ArrowUp"}"#).unwrap();
        assert_eq!(
            event,
            InputEvent::Key {
                key: Key::ArrowUp,
                focus: Focus::Canvas
            }
        );
    }

    #[test]
    fn test_key_directions() {
        assert_eq!(Key::ArrowLeft.direction(), Some((-1, 0)));
        assert_eq!(Key::ArrowDown.direction(), Some((0, 1)));
        assert_eq!(Key::Other.direction(), None);
    }
}
