//! Word search: a letter-grid game drawn on the [`canvas`] engine.
//!
//! The engine owns the `<canvas>`, the frame loop and pointer input; this
//! crate is everything the player sees on top of it.
//!
//! | Module | Role |
//! |--------|------|
//! | [`app`] | `wasm-bindgen` entry point (`WordSearch`) |
//! | [`board`] | Board layout, drag selection, painting, engine wiring |
//! | [`grid`] | Letter grids with hidden words |
//! | [`words`] | Random word picks and grid selection |
//! | [`games`] | Game catalog |
//! | [`config`] | Start-up configuration |
//! | [`locale`] | UI strings |
//! | [`menu`] | Site menu |
//! | [`routes`] | Route table |
//! | [`error`] | `AppError` |

pub mod app;
pub mod board;
pub mod config;
pub mod error;
pub mod games;
pub mod grid;
pub mod locale;
pub mod menu;
pub mod routes;
pub mod words;

pub use app::WordSearch;
