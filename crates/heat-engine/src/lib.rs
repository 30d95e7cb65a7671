//! GazeMap Heat Engine
//!
//! Turns a noisy, high-frequency gaze stream into a stable intensity field
//! and summarizes where attention went:
//! - **Binning:** Merge nearby samples into proximity bins
//! - **Accumulation:** Grow bin intensity on every hit, track the global max
//! - **Decay:** Fade bins that are no longer looked at, evict faded ones
//! - **Render frames:** Read-only `{max, data}` projections for a heatmap surface
//! - **Region analysis:** 3×3 attention distribution, quadrants, hotspots, insights
//!
//! This crate is pure computation: no timers, no I/O, no platform
//! dependencies. Time enters only as sample timestamps and the `now`
//! passed to a decay tick.

pub mod active;
pub mod binner;
pub mod insights;
pub mod regions;
pub mod render;
pub mod store;

pub use active::ActiveSpot;
pub use binner::{BinKey, SpatialBinner};
pub use insights::{AnalysisReport, Insight, InsightKind};
pub use regions::{Region, RegionAnalyzer};
pub use render::{RenderFrame, RenderPoint};
pub use store::{AccumulationStore, DecayReport, IntensityRecord};
