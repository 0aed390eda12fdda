//! The word-search board: a game module drawn on the canvas engine.
//!
//! DESIGN
//! ======
//! `Board` is plain state (grid, layout, current drag, found words) and paints
//! itself through any [`DrawContext`], so selection and drawing are tested
//! without a browser. [`attach`] is the only place that knows about the
//! engine: it maps `resize` to a new layout, `tick` to a repaint, and the
//! pointer channels to a drag that ends in a word check.
//!
//! Drags snap to straight lines. While the pointer wanders off a row, column
//! or diagonal through the anchor, the selection keeps its last straight head.

#[cfg(test)]
#[path = "board_test.rs"]
mod board_test;

use std::cell::RefCell;
use std::rc::Rc;

use canvas::engine::Engine;
use canvas::error::DrawError;
use canvas::geom::{Point, Size};
use canvas::render::{DrawContext, Painter};
use canvas::surface::{FrameScheduler, Surface};

use crate::games::GameEntry;
use crate::grid::{Cell, Grid, Placement, line};

/// Share of the shorter surface side the grid occupies.
pub const FILL_RATIO: f64 = 0.9;
/// Cell corner radius, relative to the cell side.
const CORNER_RATIO: f64 = 0.2;
/// Inset of each cell tile, relative to the cell side.
const GAP_RATIO: f64 = 0.06;
/// Selection stroke width, relative to the cell side.
const STROKE_RATIO: f64 = 0.6;
/// Alpha suffix for selection strokes (half opacity).
const HIGHLIGHT_ALPHA: &str = "80";

// =============================================================================
// Layout
// =============================================================================

/// Square grid placement on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    /// Top-left corner of the grid.
    pub origin: Point,
    /// Side of one cell, in pixels.
    pub cell: f64,
    /// Cells per side.
    pub cells: usize,
}

#[allow(clippy::cast_precision_loss)]
impl Layout {
    /// Center a grid of `cells × cells` in `size`, using [`FILL_RATIO`] of
    /// the shorter side.
    #[must_use]
    pub fn fit(size: Size, cells: usize) -> Self {
        let side = size.width_f64().min(size.height_f64()) * FILL_RATIO;
        let cell = if cells == 0 { 0.0 } else { side / cells as f64 };
        let side = cell * cells as f64;
        let origin = Point::new((size.width_f64() - side) / 2.0, (size.height_f64() - side) / 2.0);
        Self { origin, cell, cells }
    }

    #[must_use]
    pub fn side(&self) -> f64 {
        self.cell * self.cells as f64
    }

    /// The cell under `point`, if any.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn cell_at(&self, point: Point) -> Option<Cell> {
        if self.cell <= 0.0 {
            return None;
        }
        let local = point.relative_to(self.origin);
        let col = (local.x / self.cell).floor();
        let row = (local.y / self.cell).floor();
        let bounds = 0.0..self.cells as f64;
        if !bounds.contains(&col) || !bounds.contains(&row) {
            return None;
        }
        Some(Cell::new(col as usize, row as usize))
    }

    #[must_use]
    pub fn cell_origin(&self, cell: Cell) -> Point {
        Point::new(self.origin.x + cell.col as f64 * self.cell, self.origin.y + cell.row as f64 * self.cell)
    }

    #[must_use]
    pub fn center_of(&self, cell: Cell) -> Point {
        let corner = self.cell_origin(cell);
        Point::new(corner.x + self.cell / 2.0, corner.y + self.cell / 2.0)
    }
}

// =============================================================================
// Theme
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub color: String,
    pub contrast: String,
    pub background: String,
}

impl Theme {
    /// The contrast color at half opacity. Only `#rrggbb` and `#rgb` get an
    /// alpha channel; anything else is used as is.
    #[must_use]
    pub fn highlight(&self) -> String {
        match self.contrast.len() {
            7 if self.contrast.starts_with('#') => format!("{}{HIGHLIGHT_ALPHA}", self.contrast),
            4 if self.contrast.starts_with('#') => format!("{}8", self.contrast),
            _ => self.contrast.clone(),
        }
    }
}

impl From<&GameEntry> for Theme {
    fn from(game: &GameEntry) -> Self {
        Self { color: game.color.clone(), contrast: game.contrast.clone(), background: game.background.clone() }
    }
}

// =============================================================================
// Board
// =============================================================================

/// An in-progress selection from the cell where the press began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drag {
    pub anchor: Cell,
    pub head: Cell,
}

#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    theme: Theme,
    layout: Layout,
    drag: Option<Drag>,
    /// Indices into `grid.words()`, in the order they were found.
    found: Vec<usize>,
}

impl Board {
    /// A board with no layout yet; call [`Board::resize`] before input.
    #[must_use]
    pub fn new(grid: Grid, theme: Theme) -> Self {
        Self { grid, theme, layout: Layout::default(), drag: None, found: Vec::new() }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[must_use]
    pub fn drag(&self) -> Option<Drag> {
        self.drag
    }

    pub fn resize(&mut self, size: Size) {
        self.layout = Layout::fit(size, self.grid.size());
    }

    /// Start a drag on the cell under `point`. Presses outside the grid
    /// cancel any drag.
    pub fn press(&mut self, point: Point) -> Option<Cell> {
        let cell = self.layout.cell_at(point);
        self.drag = cell.map(|cell| Drag { anchor: cell, head: cell });
        cell
    }

    /// Extend the drag toward `point` if that keeps it a straight line.
    pub fn drag_to(&mut self, point: Point) {
        let Some(cell) = self.layout.cell_at(point) else { return };
        if let Some(drag) = &mut self.drag {
            if line(drag.anchor, cell).is_some() {
                drag.head = cell;
            }
        }
    }

    /// Finish the drag at `point`. Returns the hidden word it covered, the
    /// first time that word is found.
    pub fn release(&mut self, point: Point) -> Option<&Placement> {
        self.drag_to(point);
        let drag = self.drag.take()?;
        let index = self.grid.placement_between(drag.anchor, drag.head)?;
        if self.found.contains(&index) {
            return None;
        }
        self.found.push(index);
        self.grid.words().get(index)
    }

    /// Cells under the current drag, anchor first.
    #[must_use]
    pub fn selection(&self) -> Vec<Cell> {
        self.drag.and_then(|drag| line(drag.anchor, drag.head)).unwrap_or_default()
    }

    /// Letters under the current drag.
    #[must_use]
    pub fn selected_word(&self) -> Option<String> {
        let drag = self.drag?;
        self.grid.word_between(drag.anchor, drag.head)
    }

    /// Found words, in the order they were found.
    #[must_use]
    pub fn found_words(&self) -> Vec<&str> {
        self.found.iter().filter_map(|index| self.grid.words().get(*index)).map(|p| p.word.as_str()).collect()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.grid.words().len() - self.found.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.grid.words().is_empty() && self.remaining() == 0
    }

    /// Paint one frame: background, cell tiles, found and in-progress
    /// selections, then letters on top.
    ///
    /// # Errors
    ///
    /// Propagates the first drawing call the context rejects.
    pub fn paint<C: DrawContext>(&self, painter: &Painter<C>, size: Size) -> Result<(), DrawError> {
        painter.draw_rect(0.0, 0.0, size.width_f64(), size.height_f64(), None, Some(&self.theme.background))?;
        let side = self.layout.cell;
        if side <= 0.0 {
            return Ok(());
        }

        let gap = side * GAP_RATIO;
        for cell in self.grid.cells() {
            let corner = self.layout.cell_origin(cell);
            let tile = side - 2.0 * gap;
            painter.draw_rect(corner.x + gap, corner.y + gap, tile, tile, Some(side * CORNER_RATIO), Some(&self.theme.color))?;
        }

        let highlight = self.theme.highlight();
        for placement in self.found.iter().filter_map(|index| self.grid.words().get(*index)) {
            self.stroke(painter, placement.start, placement.end, &highlight)?;
        }
        if let Some(drag) = self.drag {
            self.stroke(painter, drag.anchor, drag.head, &highlight)?;
        }

        for cell in self.grid.cells() {
            if let Some(letter) = self.grid.letter(cell) {
                let center = self.layout.center_of(cell);
                painter.draw_text(&letter.to_string(), center.x, center.y, side, Some(&self.theme.contrast))?;
            }
        }
        Ok(())
    }

    /// A thick segment between two cell centers with round caps.
    fn stroke<C: DrawContext>(&self, painter: &Painter<C>, from: Cell, to: Cell, color: &str) -> Result<(), DrawError> {
        let width = self.layout.cell * STROKE_RATIO;
        let (a, b) = (self.layout.center_of(from), self.layout.center_of(to));
        painter.draw_line(a, b, Some(color), Some(width))?;
        painter.draw_circle(a.x, a.y, Some(width / 2.0), Some(color))?;
        painter.draw_circle(b.x, b.y, Some(width / 2.0), Some(color))
    }
}

// =============================================================================
// Engine wiring
// =============================================================================

/// Subscribe `board` to `engine`'s resize, tick and pointer channels.
///
/// The tick handler keeps an engine handle, which ties the engine and the
/// board together until [`Engine::shutdown`] clears the bus.
pub fn attach<S: Surface, F: FrameScheduler>(engine: &Engine<S, F>, board: &Rc<RefCell<Board>>) {
    let shared = Rc::clone(board);
    engine.on_resize(move |size| {
        shared.borrow_mut().resize(size);
        Ok(())
    });

    let shared = Rc::clone(board);
    let handle = engine.clone();
    engine.on_tick(move || {
        let painter = handle.painter()?;
        shared.borrow().paint(&painter, handle.size())?;
        Ok(())
    });

    let shared = Rc::clone(board);
    engine.on_pointer_down(move |sample| {
        shared.borrow_mut().press(sample.position());
        Ok(())
    });

    let shared = Rc::clone(board);
    engine.on_pointer_move(move |sample| {
        if sample.is_pressed {
            shared.borrow_mut().drag_to(sample.position());
        }
        Ok(())
    });

    let shared = Rc::clone(board);
    engine.on_pointer_up(move |sample| {
        let mut board = shared.borrow_mut();
        if let Some(word) = board.release(sample.position()).map(|placement| placement.word.clone()) {
            log::info!("board: found {word:?}, {} left", board.remaining());
            if board.is_complete() {
                log::info!("board: all words found");
            }
        }
        Ok(())
    });
}
