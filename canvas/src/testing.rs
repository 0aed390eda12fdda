//! Test doubles for the platform seams: a recording draw context, a
//! scriptable surface, and a manually pumped frame scheduler.
//!
//! Compiled for this crate's tests and, with the `test-util` feature, for
//! downstream crates that test game modules against the engine.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::error::{DrawError, EngineError};
use crate::geom::{Point, Size};
use crate::input::InputEvent;
use crate::render::DrawContext;
use crate::surface::{FrameCallback, FrameScheduler, InputSink, Surface};

// =============================================================
// RecordingContext
// =============================================================

/// One recorded context call.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    ClearRect(f64, f64, f64, f64),
    FillStyle(String),
    StrokeStyle(String),
    LineWidth(f64),
    Font(String),
    TextAlign(String),
    TextBaseline(String),
    BeginPath,
    ClosePath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Stroke,
    Fill,
    Arc { x: f64, y: f64, radius: f64, start: f64, end: f64 },
    Ellipse { x: f64, y: f64, rx: f64, ry: f64, start: f64, end: f64 },
    FillText(String, f64, f64),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingContext {
    ops: Rc<RefCell<Vec<Op>>>,
}

impl RecordingContext {
    #[must_use]
    pub fn ops(&self) -> Vec<Op> {
        self.ops.borrow().clone()
    }

    pub fn clear(&self) {
        self.ops.borrow_mut().clear();
    }

    fn push(&self, op: Op) {
        self.ops.borrow_mut().push(op);
    }

    fn checked(&self, radius: f64, op: Op) -> Result<(), DrawError> {
        if radius < 0.0 {
            return Err(DrawError(format!("negative radius {radius}")));
        }
        self.push(op);
        Ok(())
    }
}

impl DrawContext for RecordingContext {
    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64) {
        self.push(Op::ClearRect(x, y, width, height));
    }

    fn set_fill_style(&self, color: &str) {
        self.push(Op::FillStyle(color.to_owned()));
    }

    fn set_stroke_style(&self, color: &str) {
        self.push(Op::StrokeStyle(color.to_owned()));
    }

    fn set_line_width(&self, width: f64) {
        self.push(Op::LineWidth(width));
    }

    fn set_font(&self, font: &str) {
        self.push(Op::Font(font.to_owned()));
    }

    fn set_text_align(&self, align: &str) {
        self.push(Op::TextAlign(align.to_owned()));
    }

    fn set_text_baseline(&self, baseline: &str) {
        self.push(Op::TextBaseline(baseline.to_owned()));
    }

    fn begin_path(&self) {
        self.push(Op::BeginPath);
    }

    fn close_path(&self) {
        self.push(Op::ClosePath);
    }

    fn move_to(&self, x: f64, y: f64) {
        self.push(Op::MoveTo(x, y));
    }

    fn line_to(&self, x: f64, y: f64) {
        self.push(Op::LineTo(x, y));
    }

    fn stroke(&self) {
        self.push(Op::Stroke);
    }

    fn fill(&self) {
        self.push(Op::Fill);
    }

    fn arc(&self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), DrawError> {
        self.checked(radius, Op::Arc { x, y, radius, start, end })
    }

    fn ellipse(&self, x: f64, y: f64, rx: f64, ry: f64, start: f64, end: f64) -> Result<(), DrawError> {
        self.checked(rx.min(ry), Op::Ellipse { x, y, rx, ry, start, end })
    }

    fn fill_text(&self, text: &str, x: f64, y: f64) -> Result<(), DrawError> {
        self.push(Op::FillText(text.to_owned(), x, y));
        Ok(())
    }
}

// =============================================================
// MockSurface
// =============================================================

#[derive(Default)]
struct SurfaceState {
    layout: Size,
    backing: Size,
    origin: Point,
    sink: Option<InputSink>,
    listen_calls: usize,
    detached: usize,
    no_context: bool,
    refuse_listeners: bool,
}

/// A surface whose layout box, origin, and input are scripted by the test.
#[derive(Clone, Default)]
pub struct MockSurface {
    state: Rc<RefCell<SurfaceState>>,
    ctx: RecordingContext,
}

impl MockSurface {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let surface = Self::default();
        surface.set_layout(width, height);
        surface
    }

    /// A surface that cannot produce a drawing context.
    #[must_use]
    pub fn without_context() -> Self {
        let surface = Self::new(10, 10);
        surface.state.borrow_mut().no_context = true;
        surface
    }

    /// A surface that refuses input listeners.
    #[must_use]
    pub fn refusing_listeners() -> Self {
        let surface = Self::new(10, 10);
        surface.state.borrow_mut().refuse_listeners = true;
        surface
    }

    #[must_use]
    pub fn recording(&self) -> RecordingContext {
        self.ctx.clone()
    }

    pub fn set_layout(&self, width: u32, height: u32) {
        self.state.borrow_mut().layout = Size::new(width, height);
    }

    pub fn set_origin(&self, x: f64, y: f64) {
        self.state.borrow_mut().origin = Point::new(x, y);
    }

    #[must_use]
    pub fn backing(&self) -> Size {
        self.state.borrow().backing
    }

    #[must_use]
    pub fn listen_calls(&self) -> usize {
        self.state.borrow().listen_calls
    }

    #[must_use]
    pub fn detached(&self) -> usize {
        self.state.borrow().detached
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.state.borrow().sink.is_some()
    }

    /// Deliver an input event the way the platform would.
    pub fn raise(&self, event: InputEvent) {
        let sink = self.state.borrow().sink.clone();
        if let Some(sink) = sink {
            sink(event);
        }
    }
}

/// Detaches the mock's input sink on drop.
pub struct MockListeners {
    state: Rc<RefCell<SurfaceState>>,
}

impl Drop for MockListeners {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.sink = None;
        state.detached += 1;
    }
}

impl Surface for MockSurface {
    type Context = RecordingContext;
    type Listeners = MockListeners;

    fn context(&self) -> Result<RecordingContext, EngineError> {
        if self.state.borrow().no_context {
            return Err(EngineError::Context("mock surface has no context".into()));
        }
        Ok(self.ctx.clone())
    }

    fn layout_size(&self) -> Size {
        self.state.borrow().layout
    }

    fn set_backing_size(&self, size: Size) {
        self.state.borrow_mut().backing = size;
    }

    fn origin(&self) -> Point {
        self.state.borrow().origin
    }

    fn listen(&self, sink: InputSink) -> Result<MockListeners, EngineError> {
        let mut state = self.state.borrow_mut();
        state.listen_calls += 1;
        if state.refuse_listeners {
            return Err(EngineError::Listener("mock surface refuses listeners".into()));
        }
        state.sink = Some(sink);
        Ok(MockListeners { state: Rc::clone(&self.state) })
    }
}

// =============================================================
// ManualScheduler
// =============================================================

/// Queues frame callbacks until the test pumps them.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<VecDeque<FrameCallback>>>,
    refuse: Rc<RefCell<bool>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn refuse(&self) {
        *self.refuse.borrow_mut() = true;
    }

    /// Run up to `n` queued frames, one at a time. Returns how many ran.
    pub fn run_frames(&self, n: usize) -> usize {
        let mut ran = 0;
        while ran < n {
            let next = self.queue.borrow_mut().pop_front();
            let Some(callback) = next else {
                break;
            };
            callback();
            ran += 1;
        }
        ran
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Result<(), EngineError> {
        if *self.refuse.borrow() {
            return Err(EngineError::Schedule("mock scheduler refuses frames".into()));
        }
        self.queue.borrow_mut().push_back(callback);
        Ok(())
    }
}
