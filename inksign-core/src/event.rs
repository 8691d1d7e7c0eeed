//! Input events delivered by the host to the signature surface.
//!
//! All coordinates arrive in screen space. [`SurfaceBounds::to_local`] maps
//! them into surface-local [`StrokePoint`]s.

use serde::{Deserialize, Serialize};

/// A point in surface-local coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    /// Pixels from the left edge of the surface.
    pub x: f32,
    /// Pixels from the top edge of the surface.
    pub y: f32,
}

impl StrokePoint {
    /// Create a new point.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Screen-space placement of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBounds {
    /// Screen X of the top-left corner.
    pub left: f32,
    /// Screen Y of the top-left corner.
    pub top: f32,
    /// Displayed width in pixels.
    pub width: f32,
    /// Displayed height in pixels.
    pub height: f32,
}

impl SurfaceBounds {
    /// Create bounds from offset and size.
    #[must_use]
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Convert screen coordinates into surface-local coordinates.
    #[must_use]
    pub fn to_local(&self, screen_x: f32, screen_y: f32) -> StrokePoint {
        StrokePoint::new(screen_x - self.left, screen_y - self.top)
    }

    /// Pixel size of the backing bitmap for these bounds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.max(1.0) as u32, self.height.max(1.0) as u32)
    }
}

impl Default for SurfaceBounds {
    fn default() -> Self {
        Self::new(0.0, 0.0, 600.0, 200.0)
    }
}

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled by the platform.
    Cancel,
}

/// A single touch contact in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// Screen X.
    pub client_x: f32,
    /// Screen Y.
    pub client_y: f32,
}

/// A touch event with zero or more active contacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points, primary first.
    pub touches: Vec<TouchPoint>,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>) -> Self {
        Self { phase, touches }
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }
}

/// What happened to the mouse pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerAction {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
    /// Pointer left the surface.
    Leave,
}

/// All input events the signature surface can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InputEvent {
    /// Mouse pointer event.
    Pointer {
        /// What the pointer did.
        action: PointerAction,
        /// Screen X.
        client_x: f32,
        /// Screen Y.
        client_y: f32,
    },

    /// Raw touch event.
    Touch(TouchEvent),
}

/// Instruction returned to the host after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// Let the platform run its default behaviour.
    Default,
    /// Suppress the platform default (scrolling, zooming).
    PreventDefault,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_local_subtracts_offset() {
        let bounds = SurfaceBounds::new(40.0, 300.0, 500.0, 150.0);
        let p = bounds.to_local(55.0, 312.5);
        assert_eq!(p, StrokePoint::new(15.0, 12.5));
    }

    #[test]
    fn test_pixel_size_never_zero() {
        let bounds = SurfaceBounds::new(0.0, 0.0, 0.0, -3.0);
        assert_eq!(bounds.pixel_size(), (1, 1));
    }

    #[test]
    fn test_primary_touch_is_first() {
        let event = TouchEvent::new(
            TouchPhase::Move,
            vec![
                TouchPoint {
                    id: 7,
                    client_x: 1.0,
                    client_y: 2.0,
                },
                TouchPoint {
                    id: 8,
                    client_x: 50.0,
                    client_y: 60.0,
                },
            ],
        );
        assert_eq!(event.primary_touch().map(|t| t.id), Some(7));
        assert!(TouchEvent::new(TouchPhase::End, vec![])
            .primary_touch()
            .is_none());
    }

    #[test]
    fn test_input_event_json_shape() {
        let json = serde_json::json!({
            "type": "Pointer",
            "data": { "action": "down", "client_x": 3.0, "client_y": 4.0 }
        });
        let event: InputEvent = serde_json::from_value(json).expect("deserialize");
        assert_eq!(
            event,
            InputEvent::Pointer {
                action: PointerAction::Down,
                client_x: 3.0,
                client_y: 4.0
            }
        );
    }
}
