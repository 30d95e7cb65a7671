//! Clock and timing utilities for gaze sessions.
//!
//! Every sample in a session is stamped with monotonic nanoseconds since
//! the session epoch. Decay staleness checks and replay scheduling are
//! expressed in the same unit so that live and recorded streams share
//! one code path.

/// Wall-clock anchor of a session, recorded in stream headers.
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

/// Fixed-period tick gate, used to drive decay and render passes when
/// replaying a recorded stream against its own timestamps.
#[derive(Debug)]
pub struct RateController {
    interval_ns: u64,
    last_tick_ns: Option<u64>,
}

impl RateController {
    /// Create a controller firing once per `interval_ms`.
    pub fn every_ms(interval_ms: u64) -> Self {
        Self {
            interval_ns: interval_ms.max(1).saturating_mul(1_000_000),
            last_tick_ns: None,
        }
    }

    /// Arm the controller so the first tick fires one interval after `start_ns`.
    pub fn anchored_at(mut self, start_ns: u64) -> Self {
        self.last_tick_ns = Some(start_ns);
        self
    }

    /// Returns true (and advances) if a tick is due at `current_ns`.
    /// An unanchored controller fires on its first call.
    pub fn should_tick(&mut self, current_ns: u64) -> bool {
        match self.last_tick_ns {
            None => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            Some(last) if current_ns >= last.saturating_add(self.interval_ns) => {
                self.last_tick_ns = Some(last.saturating_add(self.interval_ns));
                true
            }
            _ => false,
        }
    }

    /// Timestamp of the last tick fired, if any.
    pub fn last_tick_ns(&self) -> Option<u64> {
        self.last_tick_ns
    }
}
