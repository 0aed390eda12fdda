//! Platform seams: the drawing surface and the next-frame primitive.
//!
//! The engine only talks to the browser through these two traits, so the
//! whole lifecycle (sizing, input, the frame loop) runs unchanged against the
//! `web_sys` bindings in [`crate::web`] and against test doubles.

use std::rc::Rc;

use crate::error::EngineError;
use crate::geom::{Point, Size};
use crate::input::InputEvent;
use crate::render::DrawContext;

/// Receives every input event raised on a surface.
pub type InputSink = Rc<dyn Fn(InputEvent)>;

/// A one-shot callback run when the platform is ready for the next frame.
pub type FrameCallback = Box<dyn FnOnce()>;

/// A drawing target the engine can bind to.
pub trait Surface: Clone + 'static {
    /// The 2D context derived from this surface.
    type Context: DrawContext + Clone + 'static;

    /// Guard for registered input listeners; dropping it detaches them.
    type Listeners: 'static;

    /// Derive the 2D drawing context.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Context`] if the surface has no usable 2D context.
    fn context(&self) -> Result<Self::Context, EngineError>;

    /// Current layout box (CSS client size), in pixels.
    fn layout_size(&self) -> Size;

    /// Resize the backing pixel store.
    fn set_backing_size(&self, size: Size);

    /// Top-left of the surface's bounding box in viewport coordinates.
    fn origin(&self) -> Point;

    /// Register the pointer listeners, routing every event into `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Listener`] if any listener cannot be attached;
    /// listeners attached before the failure are detached again.
    fn listen(&self, sink: InputSink) -> Result<Self::Listeners, EngineError>;
}

/// The platform's next-frame primitive (`requestAnimationFrame`).
pub trait FrameScheduler: 'static {
    /// Run `callback` once, when the next frame is due.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Schedule`] if the platform refuses the request.
    fn request_frame(&self, callback: FrameCallback) -> Result<(), EngineError>;
}
