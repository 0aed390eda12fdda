//! The canvas engine: one surface, its size, its pointer, and its frame loop.
//!
//! `Engine` is a cheap handle (`Clone` shares the same instance). It starts
//! `Uninitialized`, becomes `Running` when bound to a surface, and ends
//! `Stopped` after [`Engine::shutdown`]. While running it:
//!
//! - keeps `width`/`height` in sync with the surface layout box on `resize`,
//! - folds every pointer event into a single [`PointerSample`],
//! - clears the surface and publishes `tick` once per platform frame,
//!
//! and announces all of it on a [`CanvasBus`]. No engine borrow is held while
//! the bus delivers, so subscribers can read snapshots and draw from inside
//! their handlers.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::bus::{EventBus, SubscriberResult, SubscriptionId};
use crate::error::EngineError;
use crate::geom::{Point, Size};
use crate::input::{InputEvent, PointerPhase, PointerSample};
use crate::render::{DrawContext, Painter};
use crate::surface::{FrameScheduler, InputSink, Surface};

/// Channels published by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Init,
    Resize,
    Tick,
    PointerMove,
    PointerDown,
    PointerUp,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Self::Init,
        Self::Resize,
        Self::Tick,
        Self::PointerMove,
        Self::PointerDown,
        Self::PointerUp,
    ];

    /// Wire name of the channel.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Resize => "resize",
            Self::Tick => "tick",
            Self::PointerMove => "pointer-move",
            Self::PointerDown => "pointer-down",
            Self::PointerUp => "pointer-up",
        }
    }
}

/// A published engine event. Each variant belongs to exactly one [`Channel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    /// The engine was bound to a surface.
    Init,
    /// The surface was (re)measured; carries the new size.
    Resize(Size),
    /// A new frame started; the surface has just been cleared.
    Tick,
    PointerMove(PointerSample),
    PointerDown(PointerSample),
    PointerUp(PointerSample),
}

impl CanvasEvent {
    #[must_use]
    pub fn channel(&self) -> Channel {
        match self {
            Self::Init => Channel::Init,
            Self::Resize(_) => Channel::Resize,
            Self::Tick => Channel::Tick,
            Self::PointerMove(_) => Channel::PointerMove,
            Self::PointerDown(_) => Channel::PointerDown,
            Self::PointerUp(_) => Channel::PointerUp,
        }
    }

    /// The pointer sample carried by pointer events.
    #[must_use]
    pub fn pointer(&self) -> Option<PointerSample> {
        match self {
            Self::PointerMove(sample) | Self::PointerDown(sample) | Self::PointerUp(sample) => Some(*sample),
            Self::Init | Self::Resize(_) | Self::Tick => None,
        }
    }

    fn for_phase(phase: PointerPhase, sample: PointerSample) -> Self {
        match phase {
            PointerPhase::Move => Self::PointerMove(sample),
            PointerPhase::Down => Self::PointerDown(sample),
            PointerPhase::Up => Self::PointerUp(sample),
        }
    }
}

/// The bus type the engine publishes on.
pub type CanvasBus = EventBus<Channel, CanvasEvent>;

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Running,
    Stopped,
}

struct Binding<S: Surface> {
    surface: S,
    context: S::Context,
    size: Size,
    pointer: PointerSample,
    _listeners: S::Listeners,
}

enum Lifecycle<S: Surface> {
    Uninitialized,
    Running(Binding<S>),
    Stopped,
}

impl<S: Surface> Lifecycle<S> {
    fn state(&self) -> EngineState {
        match self {
            Self::Uninitialized => EngineState::Uninitialized,
            Self::Running(_) => EngineState::Running,
            Self::Stopped => EngineState::Stopped,
        }
    }

    fn ensure_unbound(&self) -> Result<(), EngineError> {
        match self {
            Self::Uninitialized => Ok(()),
            Self::Running(_) => Err(EngineError::AlreadyInitialized),
            Self::Stopped => Err(EngineError::Stopped),
        }
    }

    fn binding(&self) -> Result<&Binding<S>, EngineError> {
        match self {
            Self::Running(binding) => Ok(binding),
            Self::Uninitialized => Err(EngineError::NotInitialized),
            Self::Stopped => Err(EngineError::Stopped),
        }
    }

    fn binding_mut(&mut self) -> Result<&mut Binding<S>, EngineError> {
        match self {
            Self::Running(binding) => Ok(binding),
            Self::Uninitialized => Err(EngineError::NotInitialized),
            Self::Stopped => Err(EngineError::Stopped),
        }
    }
}

struct Shared<S: Surface, F> {
    scheduler: F,
    lifecycle: RefCell<Lifecycle<S>>,
    bus: Rc<CanvasBus>,
    frames: Cell<u64>,
}

/// Handle to a canvas engine bound to surfaces of type `S`, paced by `F`.
pub struct Engine<S: Surface, F: FrameScheduler> {
    shared: Rc<Shared<S, F>>,
}

impl<S: Surface, F: FrameScheduler> Clone for Engine<S, F> {
    fn clone(&self) -> Self {
        Self { shared: Rc::clone(&self.shared) }
    }
}

impl<S: Surface, F: FrameScheduler> Engine<S, F> {
    /// Create an unbound engine. Its bus exists immediately, so modules may
    /// subscribe (including to `init`) before [`Engine::initialize`].
    #[must_use]
    pub fn new(scheduler: F) -> Self {
        Self {
            shared: Rc::new(Shared {
                scheduler,
                lifecycle: RefCell::new(Lifecycle::Uninitialized),
                bus: Rc::new(CanvasBus::new()),
                frames: Cell::new(0),
            }),
        }
    }

    // --- Lifecycle ---

    /// Bind to `surface`: derive its context, attach input listeners,
    /// publish `init`, measure it (publishing `resize`), and start the frame
    /// loop.
    ///
    /// # Errors
    ///
    /// - [`EngineError::AlreadyInitialized`] on a running engine.
    /// - [`EngineError::Stopped`] after [`Engine::shutdown`].
    /// - [`EngineError::Context`] / [`EngineError::Listener`] if the surface
    ///   cannot be bound; the engine stays uninitialized.
    /// - [`EngineError::Schedule`] if the first frame cannot be requested.
    pub fn initialize(&self, surface: S) -> Result<(), EngineError> {
        self.shared.lifecycle.borrow().ensure_unbound()?;

        let context = surface.context()?;
        let listeners = surface.listen(self.input_sink())?;
        *self.shared.lifecycle.borrow_mut() = Lifecycle::Running(Binding {
            surface,
            context,
            size: Size::default(),
            pointer: PointerSample::default(),
            _listeners: listeners,
        });
        log::info!("canvas engine initialized");

        self.emit(CanvasEvent::Init);
        self.resize()?;
        self.schedule_frame()
    }

    /// Re-measure the surface, resize its backing store, and publish `resize`.
    ///
    /// Publishes even when the size did not change.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotInitialized`] or [`EngineError::Stopped`]
    /// when no surface is bound.
    pub fn resize(&self) -> Result<Size, EngineError> {
        let size = {
            let mut lifecycle = self.shared.lifecycle.borrow_mut();
            let binding = lifecycle.binding_mut()?;
            let size = binding.surface.layout_size();
            binding.surface.set_backing_size(size);
            binding.size = size;
            size
        };
        log::debug!("canvas resized to {}x{}", size.width, size.height);
        self.emit(CanvasEvent::Resize(size));
        Ok(size)
    }

    /// Detach input listeners, drop every subscriber, and stop the frame loop.
    ///
    /// The engine ends `Stopped` and cannot be bound again. Subscribers that
    /// captured an engine handle are released here, which breaks the
    /// reference cycle through the bus.
    pub fn shutdown(&self) {
        let previous = std::mem::replace(&mut *self.shared.lifecycle.borrow_mut(), Lifecycle::Stopped);
        let was_running = matches!(previous, Lifecycle::Running(_));
        drop(previous);
        self.shared.bus.unsubscribe();
        if was_running {
            log::info!("canvas engine stopped after {} frames", self.frame_count());
        }
    }

    // --- Input ---

    /// Fold one raw input event into the pointer and publish it.
    ///
    /// The surface's listeners call this; hosts may also call it to inject
    /// input directly.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotInitialized`] or [`EngineError::Stopped`]
    /// when no surface is bound.
    pub fn dispatch_input(&self, event: &InputEvent) -> Result<PointerSample, EngineError> {
        let sample = {
            let mut lifecycle = self.shared.lifecycle.borrow_mut();
            let binding = lifecycle.binding_mut()?;
            let origin = binding.surface.origin();
            binding.pointer.apply(event, origin);
            binding.pointer
        };
        self.emit(CanvasEvent::for_phase(event.phase, sample));
        Ok(sample)
    }

    fn input_sink(&self) -> InputSink {
        let weak: Weak<Shared<S, F>> = Rc::downgrade(&self.shared);
        Rc::new(move |event: InputEvent| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let engine = Engine { shared };
            if let Err(err) = engine.dispatch_input(&event) {
                log::debug!("input ignored: {err}");
            }
        })
    }

    // --- Frame loop ---

    fn schedule_frame(&self) -> Result<(), EngineError> {
        let weak: Weak<Shared<S, F>> = Rc::downgrade(&self.shared);
        self.shared.scheduler.request_frame(Box::new(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let engine = Engine { shared };
            if let Err(err) = engine.tick() {
                log::error!("frame loop stopped: {err}");
            }
        }))
    }

    /// One frame: clear the surface, publish `tick`, request the next frame.
    ///
    /// A frame that fires after shutdown does nothing and requests no successor.
    fn tick(&self) -> Result<(), EngineError> {
        {
            let lifecycle = self.shared.lifecycle.borrow();
            let Lifecycle::Running(binding) = &*lifecycle else {
                return Ok(());
            };
            binding.context.clear_rect(0.0, 0.0, binding.size.width_f64(), binding.size.height_f64());
        }
        self.shared.frames.set(self.shared.frames.get() + 1);
        self.emit(CanvasEvent::Tick);

        if self.is_running() {
            self.schedule_frame()
        } else {
            Ok(())
        }
    }

    fn emit(&self, event: CanvasEvent) {
        let channel = event.channel();
        log::trace!("publish {}", channel.name());
        self.shared.bus.publish(channel, &event);
    }

    // --- Subscriptions ---

    /// The engine's bus, for subscribing by [`Channel`] directly.
    #[must_use]
    pub fn bus(&self) -> Rc<CanvasBus> {
        Rc::clone(&self.shared.bus)
    }

    /// Drop every subscriber on every channel. The engine keeps running.
    pub fn unsubscribe(&self) {
        self.shared.bus.unsubscribe();
    }

    pub fn on_init<H>(&self, mut handler: H) -> SubscriptionId
    where
        H: FnMut() -> SubscriberResult + 'static,
    {
        self.shared.bus.subscribe(Channel::Init, move |_| handler())
    }

    pub fn on_resize<H>(&self, mut handler: H) -> SubscriptionId
    where
        H: FnMut(Size) -> SubscriberResult + 'static,
    {
        self.shared.bus.subscribe(Channel::Resize, move |event| {
            if let CanvasEvent::Resize(size) = event { handler(*size) } else { Ok(()) }
        })
    }

    pub fn on_tick<H>(&self, mut handler: H) -> SubscriptionId
    where
        H: FnMut() -> SubscriberResult + 'static,
    {
        self.shared.bus.subscribe(Channel::Tick, move |_| handler())
    }

    pub fn on_pointer_move<H>(&self, handler: H) -> SubscriptionId
    where
        H: FnMut(PointerSample) -> SubscriberResult + 'static,
    {
        self.shared.bus.subscribe(Channel::PointerMove, with_pointer(handler))
    }

    pub fn on_pointer_down<H>(&self, handler: H) -> SubscriptionId
    where
        H: FnMut(PointerSample) -> SubscriberResult + 'static,
    {
        self.shared.bus.subscribe(Channel::PointerDown, with_pointer(handler))
    }

    pub fn on_pointer_up<H>(&self, handler: H) -> SubscriptionId
    where
        H: FnMut(PointerSample) -> SubscriberResult + 'static,
    {
        self.shared.bus.subscribe(Channel::PointerUp, with_pointer(handler))
    }

    // --- Snapshots ---

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.shared.lifecycle.borrow().state()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == EngineState::Running
    }

    /// Current surface size; zero when no surface is bound.
    #[must_use]
    pub fn size(&self) -> Size {
        self.shared.lifecycle.borrow().binding().map_or(Size::default(), |binding| binding.size)
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.size().width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.size().height
    }

    /// Last known pointer sample.
    #[must_use]
    pub fn pointer(&self) -> PointerSample {
        self.shared.lifecycle.borrow().binding().map_or(PointerSample::default(), |binding| binding.pointer)
    }

    /// The bound surface, if running.
    #[must_use]
    pub fn surface(&self) -> Option<S> {
        match self.shared.lifecycle.borrow().binding() {
            Ok(binding) => Some(binding.surface.clone()),
            Err(_) => None,
        }
    }

    /// The bound drawing context, if running.
    #[must_use]
    pub fn context(&self) -> Option<S::Context> {
        match self.shared.lifecycle.borrow().binding() {
            Ok(binding) => Some(binding.context.clone()),
            Err(_) => None,
        }
    }

    /// Number of frames ticked so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.shared.frames.get()
    }

    // --- Drawing ---

    /// Drawing primitives over the current context.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotInitialized`] or [`EngineError::Stopped`]
    /// when no surface is bound.
    pub fn painter(&self) -> Result<Painter<S::Context>, EngineError> {
        let lifecycle = self.shared.lifecycle.borrow();
        Ok(Painter::new(lifecycle.binding()?.context.clone()))
    }

    /// See [`Painter::draw_line`].
    ///
    /// # Errors
    ///
    /// Fails when no surface is bound or the context rejects the call.
    pub fn draw_line(&self, from: Point, to: Point, color: Option<&str>, width: Option<f64>) -> Result<(), EngineError> {
        Ok(self.painter()?.draw_line(from, to, color, width)?)
    }

    /// See [`Painter::draw_circle`].
    ///
    /// # Errors
    ///
    /// Fails when no surface is bound or the context rejects the call.
    pub fn draw_circle(&self, x: f64, y: f64, radius: Option<f64>, color: Option<&str>) -> Result<(), EngineError> {
        Ok(self.painter()?.draw_circle(x, y, radius, color)?)
    }

    /// See [`Painter::draw_rect`].
    ///
    /// # Errors
    ///
    /// Fails when no surface is bound or the context rejects the call.
    pub fn draw_rect(
        &self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: Option<f64>,
        color: Option<&str>,
    ) -> Result<(), EngineError> {
        Ok(self.painter()?.draw_rect(x, y, width, height, radius, color)?)
    }

    /// See [`Painter::draw_text`].
    ///
    /// # Errors
    ///
    /// Fails when no surface is bound or the context rejects the call.
    pub fn draw_text(&self, text: &str, x: f64, y: f64, size: f64, color: Option<&str>) -> Result<(), EngineError> {
        Ok(self.painter()?.draw_text(text, x, y, size, color)?)
    }
}

fn with_pointer<H>(mut handler: H) -> impl FnMut(&CanvasEvent) -> SubscriberResult + 'static
where
    H: FnMut(PointerSample) -> SubscriberResult + 'static,
{
    move |event: &CanvasEvent| match event.pointer() {
        Some(sample) => handler(sample),
        None => Ok(()),
    }
}
