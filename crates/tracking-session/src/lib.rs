//! GazeMap Tracking Session
//!
//! Owns one accumulation store per session and drives it:
//! - **State machine:** `Idle → Calibrating → Tracking → Reviewing`
//! - **Loops:** Scheduled decay and render tasks with guaranteed cancellation
//! - **Surface:** The [`RenderSurface`] seam the heatmap renderer plugs into
//!
//! Samples come in through [`GazeSession::ingest`]; the terminal
//! [`Snapshot`](gazemap_gaze_model::Snapshot) comes out of
//! [`GazeSession::stop`].

pub mod loops;
pub mod session;
pub mod surface;

pub use session::{GazeSession, SessionState, SessionStats};
pub use surface::{FrameRecorder, RenderSurface, SharedSurface};
