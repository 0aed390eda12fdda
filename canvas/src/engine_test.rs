#![allow(clippy::float_cmp)]

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::testing::{ManualScheduler, MockSurface, Op};

type TestEngine = Engine<MockSurface, ManualScheduler>;
type Events = Rc<RefCell<Vec<CanvasEvent>>>;

// =============================================================
// Helpers
// =============================================================

fn engine() -> (TestEngine, ManualScheduler) {
    let scheduler = ManualScheduler::default();
    (Engine::new(scheduler.clone()), scheduler)
}

fn running(width: u32, height: u32) -> (TestEngine, MockSurface, ManualScheduler) {
    let (engine, scheduler) = engine();
    let surface = MockSurface::new(width, height);
    assert!(engine.initialize(surface.clone()).is_ok());
    (engine, surface, scheduler)
}

/// Record every event on every channel, in publish order.
fn record(engine: &TestEngine) -> Events {
    let events = Events::default();
    let bus = engine.bus();
    for channel in Channel::ALL {
        let sink = Rc::clone(&events);
        bus.subscribe(channel, move |event: &CanvasEvent| {
            sink.borrow_mut().push(*event);
            Ok(())
        });
    }
    events
}

fn without_ticks(events: &Events) -> Vec<CanvasEvent> {
    events.borrow().iter().copied().filter(|e| *e != CanvasEvent::Tick).collect()
}

fn count(events: &Events, channel: Channel) -> usize {
    events.borrow().iter().filter(|e| e.channel() == channel).count()
}

fn tick_counter(engine: &TestEngine) -> Rc<RefCell<usize>> {
    let ticks = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&ticks);
    engine.on_tick(move || {
        *sink.borrow_mut() += 1;
        Ok(())
    });
    ticks
}

// =============================================================
// Channel / CanvasEvent
// =============================================================

#[test]
fn channel_names() {
    let names: Vec<&str> = Channel::ALL.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["init", "resize", "tick", "pointer-move", "pointer-down", "pointer-up"]);
}

#[test]
fn event_channel_mapping() {
    let sample = PointerSample::default();
    assert_eq!(CanvasEvent::Init.channel(), Channel::Init);
    assert_eq!(CanvasEvent::Resize(Size::new(1, 1)).channel(), Channel::Resize);
    assert_eq!(CanvasEvent::Tick.channel(), Channel::Tick);
    assert_eq!(CanvasEvent::PointerMove(sample).channel(), Channel::PointerMove);
    assert_eq!(CanvasEvent::PointerDown(sample).channel(), Channel::PointerDown);
    assert_eq!(CanvasEvent::PointerUp(sample).channel(), Channel::PointerUp);
}

#[test]
fn event_pointer_only_on_pointer_events() {
    let sample = PointerSample { x: 1.0, y: 2.0, is_pressed: true };
    assert_eq!(CanvasEvent::PointerDown(sample).pointer(), Some(sample));
    assert_eq!(CanvasEvent::Tick.pointer(), None);
    assert_eq!(CanvasEvent::Resize(Size::default()).pointer(), None);
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_engine_is_uninitialized() {
    let (engine, scheduler) = engine();
    assert_eq!(engine.state(), EngineState::Uninitialized);
    assert_eq!(engine.size(), Size::default());
    assert_eq!(engine.pointer(), PointerSample::default());
    assert_eq!(engine.frame_count(), 0);
    assert!(engine.surface().is_none());
    assert!(engine.context().is_none());
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn operations_before_initialize_fail() {
    let (engine, _) = engine();
    assert!(matches!(engine.resize(), Err(EngineError::NotInitialized)));
    assert!(matches!(engine.painter(), Err(EngineError::NotInitialized)));
    assert!(matches!(engine.draw_circle(0.0, 0.0, None, None), Err(EngineError::NotInitialized)));
    let input = InputEvent::mouse(PointerPhase::Move, 1.0, 1.0);
    assert!(matches!(engine.dispatch_input(&input), Err(EngineError::NotInitialized)));
}

#[test]
fn clones_share_one_engine() {
    let (engine, _) = engine();
    let other = engine.clone();
    assert!(engine.initialize(MockSurface::new(30, 20)).is_ok());
    assert!(other.is_running());
    assert_eq!(other.size(), Size::new(30, 20));
}

// =============================================================
// initialize
// =============================================================

#[test]
fn initialize_publishes_init_then_resize() {
    let (engine, _) = engine();
    let events = record(&engine);

    assert!(engine.initialize(MockSurface::new(300, 150)).is_ok());

    assert_eq!(*events.borrow(), vec![CanvasEvent::Init, CanvasEvent::Resize(Size::new(300, 150))]);
}

#[test]
fn initialize_measures_surface() {
    let (engine, surface, _) = running(300, 150);
    assert_eq!(engine.state(), EngineState::Running);
    assert_eq!(engine.width(), 300);
    assert_eq!(engine.height(), 150);
    assert_eq!(surface.backing(), Size::new(300, 150));
}

#[test]
fn initialize_attaches_listeners_and_starts_loop() {
    let (engine, surface, scheduler) = running(10, 10);
    assert!(surface.is_listening());
    assert_eq!(surface.listen_calls(), 1);
    assert_eq!(scheduler.pending(), 1);
    assert_eq!(engine.frame_count(), 0);
}

#[test]
fn initialize_exposes_surface_and_context() {
    let (engine, _, _) = running(10, 10);
    assert!(engine.surface().is_some());
    assert!(engine.context().is_some());
}

#[test]
fn initialize_without_context_fails() {
    let (engine, scheduler) = engine();
    let events = record(&engine);

    let result = engine.initialize(MockSurface::without_context());

    assert!(matches!(result, Err(EngineError::Context(_))));
    assert_eq!(engine.state(), EngineState::Uninitialized);
    assert!(events.borrow().is_empty());
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn initialize_with_refused_listeners_fails() {
    let (engine, _) = engine();
    let result = engine.initialize(MockSurface::refusing_listeners());
    assert!(matches!(result, Err(EngineError::Listener(_))));
    assert_eq!(engine.state(), EngineState::Uninitialized);
}

#[test]
fn initialize_can_retry_after_failure() {
    let (engine, _) = engine();
    assert!(engine.initialize(MockSurface::without_context()).is_err());
    assert!(engine.initialize(MockSurface::new(5, 5)).is_ok());
    assert!(engine.is_running());
}

#[test]
fn second_initialize_is_rejected() {
    let (engine, surface, scheduler) = running(10, 10);
    let events = record(&engine);

    let result = engine.initialize(surface.clone());

    assert!(matches!(result, Err(EngineError::AlreadyInitialized)));
    assert_eq!(surface.listen_calls(), 1);
    assert_eq!(scheduler.pending(), 1);
    assert!(events.borrow().is_empty());
}

#[test]
fn initialize_after_shutdown_is_rejected() {
    let (engine, _, _) = running(10, 10);
    engine.shutdown();
    let result = engine.initialize(MockSurface::new(10, 10));
    assert!(matches!(result, Err(EngineError::Stopped)));
}

#[test]
fn initialize_reports_refused_first_frame() {
    let (engine, scheduler) = engine();
    scheduler.refuse();
    let result = engine.initialize(MockSurface::new(10, 10));
    assert!(matches!(result, Err(EngineError::Schedule(_))));
}

// =============================================================
// resize
// =============================================================

#[test]
fn resize_tracks_layout_box() {
    let (engine, surface, _) = running(300, 150);
    surface.set_layout(640, 480);

    let size = engine.resize();

    assert!(matches!(size, Ok(s) if s == Size::new(640, 480)));
    assert_eq!(engine.width(), 640);
    assert_eq!(engine.height(), 480);
    assert_eq!(surface.backing(), Size::new(640, 480));
}

#[test]
fn resize_publishes_exactly_once() {
    let (engine, surface, _) = running(300, 150);
    let events = record(&engine);
    surface.set_layout(600, 300);

    assert!(engine.resize().is_ok());

    assert_eq!(*events.borrow(), vec![CanvasEvent::Resize(Size::new(600, 300))]);
}

#[test]
fn resize_republishes_when_unchanged() {
    let (engine, _, _) = running(300, 150);
    let events = record(&engine);

    assert!(engine.resize().is_ok());
    assert!(engine.resize().is_ok());

    assert_eq!(count(&events, Channel::Resize), 2);
}

#[test]
fn on_resize_receives_size() {
    let (engine, _) = engine();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    engine.on_resize(move |size| {
        sink.borrow_mut().push(size);
        Ok(())
    });

    assert!(engine.initialize(MockSurface::new(12, 34)).is_ok());

    assert_eq!(*seen.borrow(), vec![Size::new(12, 34)]);
}

// =============================================================
// Frame loop
// =============================================================

#[test]
fn each_frame_publishes_one_tick() {
    let (engine, _, scheduler) = running(10, 10);
    let ticks = tick_counter(&engine);

    assert_eq!(scheduler.run_frames(5), 5);

    assert_eq!(*ticks.borrow(), 5);
    assert_eq!(engine.frame_count(), 5);
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn each_tick_follows_full_clear() {
    let (engine, surface, scheduler) = running(300, 150);
    let ctx = surface.recording();
    let probe = engine.clone();
    engine.on_tick(move || {
        probe.draw_circle(1.0, 1.0, Some(1.0), None)?;
        Ok(())
    });

    scheduler.run_frames(3);

    let ops = ctx.ops();
    let clears: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| matches!(op, Op::ClearRect(..)))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(clears.len(), 3);
    for i in clears {
        assert_eq!(ops[i], Op::ClearRect(0.0, 0.0, 300.0, 150.0));
        assert_eq!(ops[i + 1], Op::FillStyle("#000000".into()));
    }
}

#[test]
fn clear_uses_current_size() {
    let (engine, surface, scheduler) = running(300, 150);
    surface.set_layout(50, 40);
    assert!(engine.resize().is_ok());

    scheduler.run_frames(1);

    assert_eq!(surface.recording().ops(), vec![Op::ClearRect(0.0, 0.0, 50.0, 40.0)]);
}

#[test]
fn ticks_run_in_subscription_order() {
    let (engine, _, scheduler) = running(10, 10);
    let order = Rc::new(RefCell::new(Vec::new()));
    for name in ["board", "overlay", "hud"] {
        let sink = Rc::clone(&order);
        engine.on_tick(move || {
            sink.borrow_mut().push(name);
            Ok(())
        });
    }

    scheduler.run_frames(1);

    assert_eq!(*order.borrow(), vec!["board", "overlay", "hud"]);
}

#[test]
fn failing_tick_subscriber_does_not_stop_loop() {
    let (engine, _, scheduler) = running(10, 10);
    engine.on_tick(|| Err("broken module".into()));
    let ticks = tick_counter(&engine);

    scheduler.run_frames(3);

    assert_eq!(*ticks.borrow(), 3);
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn panicking_tick_subscriber_does_not_stop_loop() {
    let (engine, _, scheduler) = running(10, 10);
    let probe = engine.clone();
    engine.on_tick(move || {
        assert!(probe.width() > 1000, "module expected a wide surface");
        Ok(())
    });
    let ticks = tick_counter(&engine);

    scheduler.run_frames(2);

    assert_eq!(*ticks.borrow(), 2);
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn tick_subscriber_can_read_snapshots() {
    let (engine, _, scheduler) = running(64, 48);
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    let probe = engine.clone();
    engine.on_tick(move || {
        *sink.borrow_mut() = Some((probe.width(), probe.height(), probe.pointer()));
        Ok(())
    });

    scheduler.run_frames(1);

    assert_eq!(*seen.borrow(), Some((64, 48, PointerSample::default())));
}

#[test]
fn tick_subscriber_can_subscribe() {
    let (engine, _, scheduler) = running(10, 10);
    let late = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&late);
    let probe = engine.clone();
    let mut added = false;
    engine.on_tick(move || {
        if !added {
            added = true;
            let sink = Rc::clone(&sink);
            probe.on_tick(move || {
                *sink.borrow_mut() += 1;
                Ok(())
            });
        }
        Ok(())
    });

    scheduler.run_frames(3);

    assert_eq!(*late.borrow(), 2);
}

#[test]
fn refused_frame_ends_loop() {
    let (engine, _, scheduler) = running(10, 10);
    scheduler.refuse();
    scheduler.run_frames(1);
    assert_eq!(engine.frame_count(), 1);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn dropping_engine_stops_loop() {
    let (engine, _, scheduler) = running(10, 10);
    drop(engine);
    assert_eq!(scheduler.run_frames(1), 1);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn platform_callbacks_rebuild_the_engine_handle() {
    let (engine, surface, scheduler) = running(10, 10);
    let ticks = tick_counter(&engine);
    let observer = engine.clone();
    drop(engine);

    surface.raise(InputEvent::mouse(PointerPhase::Down, 3.0, 4.0));
    assert_eq!(scheduler.run_frames(2), 2);

    assert_eq!(observer.pointer(), PointerSample { x: 3.0, y: 4.0, is_pressed: true });
    assert_eq!(*ticks.borrow(), 2);
    assert_eq!(observer.frame_count(), 2);
}

// =============================================================
// Pointer input
// =============================================================

#[test]
fn mouse_move_is_surface_local() {
    let (engine, surface, _) = running(300, 150);
    surface.set_origin(10.0, 20.0);
    let events = record(&engine);

    surface.raise(InputEvent::mouse(PointerPhase::Move, 50.0, 80.0));

    let expected = PointerSample { x: 40.0, y: 60.0, is_pressed: false };
    assert_eq!(engine.pointer(), expected);
    assert_eq!(*events.borrow(), vec![CanvasEvent::PointerMove(expected)]);
}

#[test]
fn touch_start_presses_pointer() {
    let (engine, surface, _) = running(300, 150);
    surface.set_origin(10.0, 20.0);
    let events = record(&engine);

    surface.raise(InputEvent::touch(PointerPhase::Down, vec![Point::new(110.0, 220.0)], vec![]));

    let expected = PointerSample { x: 100.0, y: 200.0, is_pressed: true };
    assert_eq!(engine.pointer(), expected);
    assert_eq!(*events.borrow(), vec![CanvasEvent::PointerDown(expected)]);
}

#[test]
fn touch_cancel_releases_pointer() {
    let (engine, surface, _) = running(300, 150);
    surface.raise(InputEvent::touch(PointerPhase::Down, vec![Point::new(5.0, 5.0)], vec![]));
    let events = record(&engine);

    surface.raise(InputEvent::touch(PointerPhase::Up, vec![], vec![Point::new(6.0, 7.0)]));

    let expected = PointerSample { x: 6.0, y: 7.0, is_pressed: false };
    assert_eq!(*events.borrow(), vec![CanvasEvent::PointerUp(expected)]);
}

#[test]
fn empty_touch_keeps_coordinates() {
    let (engine, surface, _) = running(300, 150);
    surface.raise(InputEvent::mouse(PointerPhase::Move, 30.0, 40.0));
    let events = record(&engine);

    surface.raise(InputEvent::touch(PointerPhase::Move, vec![], vec![]));

    let expected = PointerSample { x: 30.0, y: 40.0, is_pressed: false };
    assert_eq!(engine.pointer(), expected);
    assert_eq!(*events.borrow(), vec![CanvasEvent::PointerMove(expected)]);
}

#[test]
fn pointer_is_recomputed_against_current_origin() {
    let (engine, surface, _) = running(300, 150);
    surface.raise(InputEvent::mouse(PointerPhase::Move, 50.0, 50.0));
    surface.set_origin(25.0, 25.0);
    surface.raise(InputEvent::mouse(PointerPhase::Move, 50.0, 50.0));
    assert_eq!(engine.pointer().position(), Point::new(25.0, 25.0));
}

#[test]
fn typed_pointer_handlers() {
    let (engine, surface, _) = running(300, 150);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let (down, moved, up) = (Rc::clone(&seen), Rc::clone(&seen), Rc::clone(&seen));
    engine.on_pointer_down(move |p| {
        down.borrow_mut().push(("down", p.is_pressed));
        Ok(())
    });
    engine.on_pointer_move(move |p| {
        moved.borrow_mut().push(("move", p.is_pressed));
        Ok(())
    });
    engine.on_pointer_up(move |p| {
        up.borrow_mut().push(("up", p.is_pressed));
        Ok(())
    });

    surface.raise(InputEvent::mouse(PointerPhase::Down, 1.0, 1.0));
    surface.raise(InputEvent::mouse(PointerPhase::Move, 2.0, 2.0));
    surface.raise(InputEvent::mouse(PointerPhase::Up, 3.0, 3.0));

    assert_eq!(*seen.borrow(), vec![("down", true), ("move", true), ("up", false)]);
}

#[test]
fn dispatch_input_returns_sample() {
    let (engine, _, _) = running(300, 150);
    let sample = engine.dispatch_input(&InputEvent::mouse(PointerPhase::Down, 9.0, 8.0));
    assert!(matches!(sample, Ok(s) if s == PointerSample { x: 9.0, y: 8.0, is_pressed: true }));
}

// =============================================================
// Subscriptions
// =============================================================

#[test]
fn subscribers_before_initialize_see_init() {
    let (engine, _) = engine();
    let inits = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&inits);
    engine.on_init(move || {
        *sink.borrow_mut() += 1;
        Ok(())
    });

    assert!(engine.initialize(MockSurface::new(1, 1)).is_ok());

    assert_eq!(*inits.borrow(), 1);
}

#[test]
fn unsubscribe_silences_bus_but_keeps_running() {
    let (engine, _, scheduler) = running(10, 10);
    let ticks = tick_counter(&engine);

    engine.unsubscribe();
    scheduler.run_frames(2);

    assert_eq!(*ticks.borrow(), 0);
    assert!(engine.is_running());
    assert_eq!(engine.frame_count(), 2);
}

// =============================================================
// shutdown
// =============================================================

#[test]
fn shutdown_stops_loop_and_clears_bus() {
    let (engine, surface, scheduler) = running(10, 10);
    let ticks = tick_counter(&engine);
    scheduler.run_frames(2);

    engine.shutdown();
    scheduler.run_frames(5);

    assert_eq!(*ticks.borrow(), 2);
    assert_eq!(engine.frame_count(), 2);
    assert_eq!(scheduler.pending(), 0);
    assert_eq!(engine.state(), EngineState::Stopped);
    assert!(engine.bus().is_empty());
    assert_eq!(surface.detached(), 1);
}

#[test]
fn shutdown_detaches_input() {
    let (engine, surface, _) = running(10, 10);
    let events = record(&engine);
    engine.shutdown();

    surface.raise(InputEvent::mouse(PointerPhase::Down, 1.0, 1.0));

    assert!(!surface.is_listening());
    assert!(events.borrow().is_empty());
    assert_eq!(engine.pointer(), PointerSample::default());
}

#[test]
fn shutdown_from_tick_handler() {
    let (engine, _, scheduler) = running(10, 10);
    let probe = engine.clone();
    engine.on_tick(move || {
        probe.shutdown();
        Ok(())
    });

    scheduler.run_frames(1);

    assert_eq!(engine.state(), EngineState::Stopped);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn shutdown_from_pointer_handler() {
    let (engine, surface, _) = running(10, 10);
    let probe = engine.clone();
    engine.on_pointer_up(move |_| {
        probe.shutdown();
        Ok(())
    });

    surface.raise(InputEvent::mouse(PointerPhase::Up, 1.0, 1.0));

    assert_eq!(engine.state(), EngineState::Stopped);
    assert_eq!(surface.detached(), 1);
}

#[test]
fn shutdown_before_initialize_is_terminal() {
    let (engine, _) = engine();
    engine.shutdown();
    assert_eq!(engine.state(), EngineState::Stopped);
    assert!(matches!(engine.resize(), Err(EngineError::Stopped)));
}

// =============================================================
// Drawing through the engine
// =============================================================

#[test]
fn engine_primitives_draw_on_bound_context() {
    let (engine, surface, _) = running(100, 100);
    let ctx = surface.recording();

    assert!(engine.draw_line(Point::new(0.0, 0.0), Point::new(1.0, 1.0), None, None).is_ok());
    assert!(engine.draw_rect(0.0, 0.0, 10.0, 10.0, Some(2.0), Some("#fff")).is_ok());
    assert!(engine.draw_text("A", 5.0, 5.0, 10.0, None).is_ok());

    let ops = ctx.ops();
    assert!(ops.contains(&Op::Stroke));
    assert!(ops.contains(&Op::FillStyle("#fff".into())));
    assert!(ops.contains(&Op::FillText("A".into(), 5.0, 5.0)));
}

// =============================================================
// End to end
// =============================================================

#[test]
fn init_resize_then_press() {
    let (engine, scheduler) = engine();
    let events = record(&engine);
    let surface = MockSurface::new(300, 150);
    surface.set_origin(10.0, 20.0);

    assert!(engine.initialize(surface.clone()).is_ok());
    scheduler.run_frames(2);
    surface.set_layout(600, 300);
    assert!(engine.resize().is_ok());
    surface.raise(InputEvent::mouse(PointerPhase::Down, 60.0, 70.0));

    assert_eq!(
        without_ticks(&events),
        vec![
            CanvasEvent::Init,
            CanvasEvent::Resize(Size::new(300, 150)),
            CanvasEvent::Resize(Size::new(600, 300)),
            CanvasEvent::PointerDown(PointerSample { x: 50.0, y: 50.0, is_pressed: true }),
        ]
    );
    assert_eq!(count(&events, Channel::Tick), 2);
}
