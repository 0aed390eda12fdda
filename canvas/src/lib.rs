//! Canvas render-and-input engine for the word-search game.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns one
//! drawing surface: it keeps the surface sized to its layout box, runs a
//! continuous frame loop, folds mouse and touch input into a single pointer,
//! and announces all of it on a publish/subscribe bus. Game modules hook the
//! bus (`init`, `resize`, `tick`, `pointer-*`) and paint with the engine's
//! drawing primitives from their `tick` handlers, without knowing about each
//! other.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`bus`] | Generic named-channel publish/subscribe register |
//! | [`engine`] | Engine lifecycle, frame loop, channels and events |
//! | [`input`] | Raw mouse/touch input and pointer normalization |
//! | [`render`] | `DrawContext` seam and the drawing primitives |
//! | [`surface`] | Platform seams: `Surface` and `FrameScheduler` |
//! | [`web`] | `web_sys` implementations of the seams |
//! | [`geom`] | Points and sizes |
//! | [`error`] | Engine and drawing errors |
//! | [`consts`] | Drawing defaults |
//! | `testing` | Recording context, scripted surface, manual scheduler (`test-util`) |

pub mod bus;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geom;
pub mod input;
pub mod render;
pub mod surface;
pub mod web;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;
