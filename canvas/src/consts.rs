//! Shared constants for the canvas crate.

// ── Drawing defaults ────────────────────────────────────────────

/// Fill/stroke color used when a primitive is called without one.
pub const DEFAULT_COLOR: &str = "#000000";

/// Stroke width for `draw_line` when none is given.
pub const DEFAULT_LINE_WIDTH: f64 = 1.0;

/// Disk radius for `draw_circle` when none is given.
pub const DEFAULT_CIRCLE_RADIUS: f64 = 1.0;

// ── Text ────────────────────────────────────────────────────────

/// Font pixel size as a fraction of the requested text size.
pub const FONT_SCALE: f64 = 0.6;

/// Font family for `draw_text`.
pub const FONT_FAMILY: &str = "Arial";
