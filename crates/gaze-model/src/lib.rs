//! GazeMap Gaze Model
//!
//! Defines the core data contracts shared by the engine and its consumers:
//! - **Samples:** Timestamped gaze coordinates in viewport pixels
//! - **Snapshot:** The immutable raw sample list captured when tracking stops
//! - **Viewport:** Screen dimensions used by region analysis
//!
//! Coordinates are CSS/screen pixels relative to the top-left corner of
//! the tracked viewport, exactly as the gaze source reports them.

pub mod sample;
pub mod snapshot;
pub mod viewport;

pub use sample::*;
pub use snapshot::*;
pub use viewport::*;
