//! Viewport geometry used by region analysis.
//!
//! Unlike recorded pointer data elsewhere, gaze coordinates are not
//! normalized: they are pixels, and the viewport size is read at
//! analysis time.

use serde::{Deserialize, Serialize};

/// Size of the tracked viewport in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A viewport with a non-positive or non-finite side cannot be partitioned.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// A 2D point in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
