#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in surface-local or page/client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Express `self` relative to `origin`.
    #[must_use]
    pub fn relative_to(self, origin: Point) -> Point {
        Point { x: self.x - origin.x, y: self.y - origin.y }
    }
}

/// Surface dimensions in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width as a drawing coordinate.
    #[must_use]
    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as a drawing coordinate.
    #[must_use]
    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }

    /// Center of a surface of this size.
    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width_f64() * 0.5, self.height_f64() * 0.5)
    }
}
