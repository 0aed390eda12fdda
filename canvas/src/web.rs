//! Browser bindings: `web_sys` implementations of the platform seams.
//!
//! - [`HtmlSurface`] binds an `<canvas>` element: 2D context, layout box,
//!   backing size, bounding-box origin, and the seven pointer listeners.
//! - [`AnimationFrames`] paces the frame loop with `requestAnimationFrame`.
//! - `CanvasRenderingContext2d` implements [`DrawContext`].
//!
//! None of this runs outside a browser; the engine logic is exercised
//! against test doubles instead.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent, TouchEvent, TouchList};

use crate::engine::Engine;
use crate::error::{DrawError, EngineError, describe_js};
use crate::geom::{Point, Size};
use crate::input::{InputEvent, InputFamily, LISTENED_EVENTS, MouseInput, RawInput, TouchInput};
use crate::render::DrawContext;
use crate::surface::{FrameCallback, FrameScheduler, InputSink, Surface};

/// The engine as bound in the browser.
pub type BrowserEngine = Engine<HtmlSurface, AnimationFrames>;

/// Create an unbound browser engine.
#[must_use]
pub fn browser_engine() -> BrowserEngine {
    Engine::new(AnimationFrames)
}

// =============================================================
// Surface
// =============================================================

/// An HTML `<canvas>` element as an engine surface.
#[derive(Debug, Clone)]
pub struct HtmlSurface {
    canvas: HtmlCanvasElement,
}

impl HtmlSurface {
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }

    #[must_use]
    pub fn element(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for HtmlSurface {
    type Context = CanvasRenderingContext2d;
    type Listeners = DomListeners;

    fn context(&self) -> Result<CanvasRenderingContext2d, EngineError> {
        self.canvas
            .get_context("2d")
            .map_err(|err| EngineError::Context(describe_js(&err)))?
            .ok_or_else(|| EngineError::Context("canvas has no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::Context("context is not a CanvasRenderingContext2d".into()))
    }

    fn layout_size(&self) -> Size {
        Size::new(
            u32::try_from(self.canvas.client_width()).unwrap_or(0),
            u32::try_from(self.canvas.client_height()).unwrap_or(0),
        )
    }

    fn set_backing_size(&self, size: Size) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }

    fn origin(&self) -> Point {
        let rect = self.canvas.get_bounding_client_rect();
        Point::new(rect.left(), rect.top())
    }

    fn listen(&self, sink: InputSink) -> Result<DomListeners, EngineError> {
        let mut listeners = DomListeners { target: self.canvas.clone(), closures: Vec::new() };
        for (name, family, phase) in LISTENED_EVENTS {
            let sink = Rc::clone(&sink);
            let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                if let Some(input) = read_input(&event, family) {
                    sink(InputEvent { phase, input });
                }
            });
            // On failure `listeners` drops and detaches what was attached so far.
            self.canvas
                .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref::<js_sys::Function>())
                .map_err(|err| EngineError::Listener(format!("{name}: {}", describe_js(&err))))?;
            listeners.closures.push((name, closure));
        }
        log::debug!("attached {} input listeners", listeners.closures.len());
        Ok(listeners)
    }
}

/// Registered DOM listeners; dropping this removes them from the element.
pub struct DomListeners {
    target: HtmlCanvasElement,
    closures: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

impl Drop for DomListeners {
    fn drop(&mut self) {
        for (name, closure) in self.closures.drain(..) {
            if let Err(err) = self
                .target
                .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            {
                log::warn!("failed to detach {name} listener: {}", describe_js(&err));
            }
            // The listener may be on the stack right now (shutdown from a
            // pointer handler), so the JS heap takes ownership instead of
            // freeing it here.
            drop(closure.into_js_value());
        }
    }
}

fn read_input(event: &Event, family: InputFamily) -> Option<RawInput> {
    match family {
        InputFamily::Mouse => event.dyn_ref::<MouseEvent>().map(|mouse| {
            RawInput::Mouse(MouseInput {
                client: Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y())),
            })
        }),
        InputFamily::Touch => event.dyn_ref::<TouchEvent>().map(|touch| {
            RawInput::Touch(TouchInput {
                touches: page_points(&touch.touches()),
                changed_touches: page_points(&touch.changed_touches()),
            })
        }),
    }
}

fn page_points(list: &TouchList) -> Vec<Point> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|touch| Point::new(f64::from(touch.page_x()), f64::from(touch.page_y())))
        .collect()
}

// =============================================================
// Scheduler
// =============================================================

/// `window.requestAnimationFrame` as a frame scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationFrames;

impl FrameScheduler for AnimationFrames {
    fn request_frame(&self, callback: FrameCallback) -> Result<(), EngineError> {
        let window = web_sys::window().ok_or_else(|| EngineError::Schedule("no global window".into()))?;
        // Freed by wasm-bindgen once the frame has fired.
        let js = Closure::once_into_js(move |_timestamp: f64| callback());
        window
            .request_animation_frame(js.unchecked_ref::<js_sys::Function>())
            .map(|_handle| ())
            .map_err(|err| EngineError::Schedule(describe_js(&err)))
    }
}

// =============================================================
// DrawContext
// =============================================================

impl DrawContext for CanvasRenderingContext2d {
    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        CanvasRenderingContext2d::clear_rect(self, x, y, width, height);
    }

    fn set_fill_style(&self, color: &str) {
        self.set_fill_style_str(color);
    }

    fn set_stroke_style(&self, color: &str) {
        self.set_stroke_style_str(color);
    }

    fn set_line_width(&self, width: f64) {
        CanvasRenderingContext2d::set_line_width(self, width);
    }

    fn set_font(&self, font: &str) {
        CanvasRenderingContext2d::set_font(self, font);
    }

    fn set_text_align(&self, align: &str) {
        CanvasRenderingContext2d::set_text_align(self, align);
    }

    fn set_text_baseline(&self, baseline: &str) {
        CanvasRenderingContext2d::set_text_baseline(self, baseline);
    }

    fn begin_path(&self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn close_path(&self) {
        CanvasRenderingContext2d::close_path(self);
    }

    fn move_to(&self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn stroke(&self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn fill(&self) {
        CanvasRenderingContext2d::fill(self);
    }

    fn arc(&self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) -> Result<(), DrawError> {
        Ok(CanvasRenderingContext2d::arc(self, x, y, radius, start_angle, end_angle)?)
    }

    fn ellipse(
        &self,
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<(), DrawError> {
        Ok(CanvasRenderingContext2d::ellipse(self, x, y, radius_x, radius_y, 0.0, start_angle, end_angle)?)
    }

    fn fill_text(&self, text: &str, x: f64, y: f64) -> Result<(), DrawError> {
        Ok(CanvasRenderingContext2d::fill_text(self, text, x, y)?)
    }
}
