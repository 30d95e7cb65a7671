//! Active-spot tracking: which bin is currently being looked at.

use gazemap_gaze_model::TimestampNs;

use crate::binner::BinKey;

/// Two-state machine for the bin receiving gaze.
///
/// The active bin is exempt from decay. It is released only by a decay
/// tick that observes no sample for longer than the gaze timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveSpot {
    #[default]
    Idle,
    Active {
        key: BinKey,
        last_sample_ns: TimestampNs,
    },
}

impl ActiveSpot {
    /// Any ingest activates (or moves) the spot.
    pub fn on_ingest(&mut self, key: BinKey, timestamp_ns: TimestampNs) {
        *self = ActiveSpot::Active {
            key,
            last_sample_ns: timestamp_ns,
        };
    }

    /// Release the spot if the last sample is older than `timeout_ns`.
    /// Returns true when a release happened on this tick.
    pub fn on_decay_tick(&mut self, now_ns: TimestampNs, timeout_ns: u64) -> bool {
        match *self {
            ActiveSpot::Active { last_sample_ns, .. }
                if now_ns.saturating_sub(last_sample_ns) > timeout_ns =>
            {
                *self = ActiveSpot::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn key(&self) -> Option<BinKey> {
        match self {
            ActiveSpot::Active { key, .. } => Some(*key),
            ActiveSpot::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: u64 = 200_000_000;

    #[test]
    fn test_idle_to_active_on_ingest() {
        let mut spot = ActiveSpot::default();
        assert_eq!(spot.key(), None);
        spot.on_ingest(BinKey::new(40, 40), 0);
        assert_eq!(spot.key(), Some(BinKey::new(40, 40)));
    }

    #[test]
    fn test_ingest_to_other_bin_moves_spot() {
        let mut spot = ActiveSpot::default();
        spot.on_ingest(BinKey::new(40, 40), 0);
        spot.on_ingest(BinKey::new(80, 40), 10);
        assert_eq!(spot.key(), Some(BinKey::new(80, 40)));
    }

    #[test]
    fn test_tick_within_timeout_keeps_spot() {
        let mut spot = ActiveSpot::default();
        spot.on_ingest(BinKey::new(0, 0), 1_000_000_000);
        assert!(!spot.on_decay_tick(1_000_000_000 + TIMEOUT, TIMEOUT));
        assert!(spot.key().is_some());
    }

    #[test]
    fn test_tick_after_timeout_releases_spot() {
        let mut spot = ActiveSpot::default();
        spot.on_ingest(BinKey::new(0, 0), 1_000_000_000);
        assert!(spot.on_decay_tick(1_000_000_000 + TIMEOUT + 1, TIMEOUT));
        assert_eq!(spot, ActiveSpot::Idle);
        // Already idle: nothing further to release
        assert!(!spot.on_decay_tick(u64::MAX, TIMEOUT));
    }

    #[test]
    fn test_tick_before_last_sample_does_not_underflow() {
        let mut spot = ActiveSpot::default();
        spot.on_ingest(BinKey::new(0, 0), 5_000_000_000);
        assert!(!spot.on_decay_tick(0, TIMEOUT));
    }
}
