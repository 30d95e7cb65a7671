//! Display-ready projections of the accumulation store.

use serde::{Deserialize, Serialize};

use gazemap_gaze_model::Snapshot;

use crate::store::AccumulationStore;

/// One point handed to the heatmap surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

/// `{max, data}` payload accepted by a heatmap rendering surface.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Normalization ceiling for intensity.
    pub max: f64,
    pub data: Vec<RenderPoint>,
}

impl RenderFrame {
    /// Scale used when replaying a stopped session's raw points.
    pub const REVIEW_MAX: f64 = 10.0;

    /// Project the live store. Never mutates it.
    ///
    /// `max` is floored at 1 so an empty or faint store does not
    /// normalize against zero.
    pub fn sample(store: &AccumulationStore) -> Self {
        let data = store
            .records()
            .map(|r| RenderPoint {
                x: r.x,
                y: r.y,
                value: r.value,
            })
            .collect();

        Self {
            max: store.global_max().max(1.0),
            data,
        }
    }

    /// Build the review overlay for a stopped session: every raw sample
    /// at unit weight, pixel-rounded, against a fixed scale.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let data = snapshot
            .points()
            .map(|p| RenderPoint {
                x: p.x.round(),
                y: p.y.round(),
                value: 1.0,
            })
            .collect();

        Self {
            max: Self::REVIEW_MAX,
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Largest point value in the frame (0 when empty).
    pub fn peak(&self) -> f64 {
        self.data.iter().map(|p| p.value).fold(0.0_f64, f64::max)
    }
}
