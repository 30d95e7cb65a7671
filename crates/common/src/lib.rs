//! GazeMap Common Utilities
//!
//! Shared infrastructure for all GazeMap crates:
//! - Error types and result aliases
//! - Session clock and tick rate utilities
//! - Tracing/logging initialization
//! - Configuration loading (engine tuning, analysis, logging)

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
