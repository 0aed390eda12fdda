//! Drawing primitives.
//!
//! [`DrawContext`] is the slice of the 2D canvas API the engine needs; it is
//! implemented for [`web_sys::CanvasRenderingContext2d`] in [`crate::web`] and
//! by a recording mock in tests. [`Painter`] wraps a context and exposes the
//! game-facing primitives. Painters hold no state of their own beyond what
//! they set on the context (fill/stroke style, line width, font).
//!
//! Fallible context calls propagate as [`DrawError`].

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::{FRAC_PI_2, PI};

use crate::consts::{DEFAULT_CIRCLE_RADIUS, DEFAULT_COLOR, DEFAULT_LINE_WIDTH, FONT_FAMILY, FONT_SCALE};
use crate::error::DrawError;
use crate::geom::Point;

/// The 2D drawing operations used by the engine and its primitives.
pub trait DrawContext {
    fn clear_rect(&self, x: f64, y: f64, width: f64, height: f64);
    fn set_fill_style(&self, color: &str);
    fn set_stroke_style(&self, color: &str);
    fn set_line_width(&self, width: f64);
    fn set_font(&self, font: &str);
    fn set_text_align(&self, align: &str);
    fn set_text_baseline(&self, baseline: &str);
    fn begin_path(&self);
    fn close_path(&self);
    fn move_to(&self, x: f64, y: f64);
    fn line_to(&self, x: f64, y: f64);
    fn stroke(&self);
    fn fill(&self);

    /// Circular arc around `(x, y)`, angles in radians.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the context rejects the arc (e.g. negative radius).
    fn arc(&self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) -> Result<(), DrawError>;

    /// Unrotated elliptical arc around `(x, y)`, angles in radians.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the context rejects the arc (e.g. negative radius).
    fn ellipse(
        &self,
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<(), DrawError>;

    /// # Errors
    ///
    /// Returns `Err` if the context rejects the call.
    fn fill_text(&self, text: &str, x: f64, y: f64) -> Result<(), DrawError>;
}

/// Effective corner radii of a rounded rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerRadii {
    pub horizontal: f64,
    pub vertical: f64,
}

/// Clamp a requested corner radius to a `width` × `height` rectangle.
///
/// Each axis clamps on its own: the horizontal radius never exceeds half the
/// width and the vertical radius never exceeds half the height, so flat or
/// narrow rectangles still get non-overlapping elliptical corners.
#[must_use]
pub fn corner_radii(width: f64, height: f64, radius: f64) -> CornerRadii {
    let radius = radius.max(0.0);
    CornerRadii {
        horizontal: radius.min(width.abs() / 2.0),
        vertical: radius.min(height.abs() / 2.0),
    }
}

/// CSS font shorthand for text drawn at `size`.
#[must_use]
pub fn font_for_size(size: f64) -> String {
    format!("bold {}px {FONT_FAMILY}", size * FONT_SCALE)
}

/// Game-facing drawing primitives over a context.
#[derive(Debug, Clone)]
pub struct Painter<C> {
    ctx: C,
}

impl<C: DrawContext> Painter<C> {
    #[must_use]
    pub fn new(ctx: C) -> Self {
        Self { ctx }
    }

    /// The wrapped context, for drawing the primitives don't cover.
    #[must_use]
    pub fn context(&self) -> &C {
        &self.ctx
    }

    /// Stroke a straight segment. Defaults: black, 1 unit wide.
    ///
    /// # Errors
    ///
    /// None; the signature matches the other primitives.
    pub fn draw_line(&self, from: Point, to: Point, color: Option<&str>, width: Option<f64>) -> Result<(), DrawError> {
        self.ctx.set_stroke_style(color.unwrap_or(DEFAULT_COLOR));
        self.ctx.set_line_width(width.unwrap_or(DEFAULT_LINE_WIDTH));
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
        Ok(())
    }

    /// Fill a disk centered on `(x, y)`. Defaults: radius 1, black.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the context rejects the arc.
    pub fn draw_circle(&self, x: f64, y: f64, radius: Option<f64>, color: Option<&str>) -> Result<(), DrawError> {
        self.ctx.set_fill_style(color.unwrap_or(DEFAULT_COLOR));
        self.ctx.begin_path();
        self.ctx.arc(x, y, radius.unwrap_or(DEFAULT_CIRCLE_RADIUS).abs(), 0.0, 2.0 * PI)?;
        self.ctx.fill();
        Ok(())
    }

    /// Fill an axis-aligned rectangle with optionally rounded corners.
    ///
    /// Defaults: sharp corners, black. See [`corner_radii`] for clamping.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the context rejects a corner arc.
    pub fn draw_rect(
        &self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: Option<f64>,
        color: Option<&str>,
    ) -> Result<(), DrawError> {
        // Normalize so (x, y) is the top-left corner.
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
        let CornerRadii { horizontal: rx, vertical: ry } = corner_radii(width, height, radius.unwrap_or(0.0));
        let (right, bottom) = (x + width, y + height);

        self.ctx.set_fill_style(color.unwrap_or(DEFAULT_COLOR));
        self.ctx.begin_path();
        self.ctx.move_to(x + rx, y);
        self.ctx.line_to(right - rx, y);
        self.ctx.ellipse(right - rx, y + ry, rx, ry, -FRAC_PI_2, 0.0)?;
        self.ctx.line_to(right, bottom - ry);
        self.ctx.ellipse(right - rx, bottom - ry, rx, ry, 0.0, FRAC_PI_2)?;
        self.ctx.line_to(x + rx, bottom);
        self.ctx.ellipse(x + rx, bottom - ry, rx, ry, FRAC_PI_2, PI)?;
        self.ctx.line_to(x, y + ry);
        self.ctx.ellipse(x + rx, y + ry, rx, ry, PI, PI + FRAC_PI_2)?;
        self.ctx.close_path();
        self.ctx.fill();
        Ok(())
    }

    /// Draw bold text centered on `(x, y)`; the font is `0.6 × size` pixels.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the context rejects the text.
    pub fn draw_text(&self, text: &str, x: f64, y: f64, size: f64, color: Option<&str>) -> Result<(), DrawError> {
        self.ctx.set_fill_style(color.unwrap_or(DEFAULT_COLOR));
        self.ctx.set_font(&font_for_size(size));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.fill_text(text, x, y)
    }
}
