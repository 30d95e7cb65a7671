//! Proximity binning of gaze samples.

use serde::{Deserialize, Serialize};

/// Discrete bin identifier: the sample position snapped to the nearest
/// multiple of the bin radius on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BinKey {
    pub x: i64,
    pub y: i64,
}

impl BinKey {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Maps continuous coordinates to bin keys with a fixed radius.
///
/// The radius cannot change after construction; two samples share a bin
/// iff their snapped coordinates match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialBinner {
    radius: f64,
}

impl SpatialBinner {
    /// Create a binner. Callers validate `radius > 0` beforehand.
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Snap `(x, y)` to its bin. Inputs must be finite.
    pub fn bin(&self, x: f64, y: f64) -> BinKey {
        BinKey {
            x: self.snap(x),
            y: self.snap(y),
        }
    }

    fn snap(&self, v: f64) -> i64 {
        // JS-style rounding (half toward +inf) so -20 with R=40 lands on 0
        ((v / self.radius + 0.5).floor() * self.radius).round() as i64
    }
}

impl Default for SpatialBinner {
    fn default() -> Self {
        Self::new(40.0)
    }
}
