//! Input model: raw pointer input from the two DOM event families and its
//! normalization into a single pointer sample.
//!
//! Mouse events report client coordinates; touch events report page
//! coordinates for a list of active touches and a list of touches that just
//! changed. Both are reduced to one `PointerSample` in surface-local
//! coordinates by subtracting the surface's bounding-box origin. Multi-touch
//! collapses to the first touch point.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::geom::Point;

/// Lifecycle position of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// Pointer moved (mousemove, touchmove).
    Move,
    /// Press started (mousedown, touchstart).
    Down,
    /// Press ended or was cancelled (mouseup, touchend, touchcancel).
    Up,
}

/// Which DOM event family produced an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFamily {
    Mouse,
    Touch,
}

/// Every DOM event the engine listens to, with its family and phase.
pub const LISTENED_EVENTS: [(&str, InputFamily, PointerPhase); 7] = [
    ("mousemove", InputFamily::Mouse, PointerPhase::Move),
    ("touchmove", InputFamily::Touch, PointerPhase::Move),
    ("mousedown", InputFamily::Mouse, PointerPhase::Down),
    ("touchstart", InputFamily::Touch, PointerPhase::Down),
    ("mouseup", InputFamily::Mouse, PointerPhase::Up),
    ("touchend", InputFamily::Touch, PointerPhase::Up),
    ("touchcancel", InputFamily::Touch, PointerPhase::Up),
];

/// A mouse event reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseInput {
    /// `clientX` / `clientY` of the event.
    pub client: Point,
}

/// A touch event reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchInput {
    /// Page coordinates of the touches still on the surface.
    pub touches: Vec<Point>,
    /// Page coordinates of the touches that changed in this event.
    pub changed_touches: Vec<Point>,
}

/// Raw input from either event family.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Mouse(MouseInput),
    Touch(TouchInput),
}

impl RawInput {
    /// Viewport position carried by this input, if any.
    ///
    /// For touch, the first active touch wins; a lifted finger is only
    /// listed in the changed touches, so those are the fallback.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Mouse(mouse) => Some(mouse.client),
            Self::Touch(touch) => touch.touches.first().or_else(|| touch.changed_touches.first()).copied(),
        }
    }

    #[must_use]
    pub fn family(&self) -> InputFamily {
        match self {
            Self::Mouse(_) => InputFamily::Mouse,
            Self::Touch(_) => InputFamily::Touch,
        }
    }
}

/// One input event delivered by the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    pub phase: PointerPhase,
    pub input: RawInput,
}

impl InputEvent {
    #[must_use]
    pub fn mouse(phase: PointerPhase, client_x: f64, client_y: f64) -> Self {
        Self { phase, input: RawInput::Mouse(MouseInput { client: Point::new(client_x, client_y) }) }
    }

    #[must_use]
    pub fn touch(phase: PointerPhase, touches: Vec<Point>, changed_touches: Vec<Point>) -> Self {
        Self { phase, input: RawInput::Touch(TouchInput { touches, changed_touches }) }
    }
}

/// The normalized pointer: last known surface-local position and press state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub is_pressed: bool,
}

impl PointerSample {
    /// Surface-local position of the pointer.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Fold one input event into the pointer.
    ///
    /// `origin` is the surface's bounding-box origin in the same coordinate
    /// space as the raw input. Inputs without coordinates keep the previous
    /// position; the press state still follows the phase.
    pub fn apply(&mut self, event: &InputEvent, origin: Point) {
        if let Some(raw) = event.input.position() {
            let local = raw.relative_to(origin);
            self.x = local.x;
            self.y = local.y;
        }
        match event.phase {
            PointerPhase::Move => {}
            PointerPhase::Down => self.is_pressed = true,
            PointerPhase::Up => self.is_pressed = false,
        }
    }
}
