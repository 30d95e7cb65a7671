//! The accumulation store: bin intensities, global max, and decay.
//!
//! # Algorithm
//!
//! 1. **Ingest** snaps each sample to a bin. A new bin starts at `1.0`;
//!    a re-hit adds `accumulation_rate` and moves the bin's point to the
//!    latest raw coordinates (last-wins, not averaged).
//! 2. **Global max** follows the largest value ever reached and only
//!    drops on [`AccumulationStore::reset`].
//! 3. **Decay ticks** release a stale active spot, multiply every other
//!    bin by `decay_rate`, and evict bins below `min_value`.

use std::collections::HashMap;

use serde::Serialize;

use gazemap_common::config::EngineConfig;
use gazemap_common::error::GazemapResult;
use gazemap_gaze_model::{GazeSample, TimestampNs};

use crate::active::ActiveSpot;
use crate::binner::{BinKey, SpatialBinner};

/// Accumulated intensity for one bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntensityRecord {
    /// Last raw x seen in this bin.
    pub x: f64,
    /// Last raw y seen in this bin.
    pub y: f64,
    /// Accumulated weight.
    pub value: f64,
}

/// Outcome of a single decay tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DecayReport {
    /// Bins attenuated on this tick.
    pub decayed: usize,
    /// Bins removed for falling below the visible threshold.
    pub evicted: usize,
    /// Whether the active spot was released because gaze went stale.
    pub released_active: bool,
    /// Bins remaining after the tick.
    pub live: usize,
}

/// Mapping from bin to intensity, owning the active spot and global max.
#[derive(Debug, Clone)]
pub struct AccumulationStore {
    config: EngineConfig,
    binner: SpatialBinner,
    records: HashMap<BinKey, IntensityRecord>,
    global_max: f64,
    active: ActiveSpot,
}

impl AccumulationStore {
    /// Create a store after validating the engine configuration.
    pub fn new(config: EngineConfig) -> GazemapResult<Self> {
        config.validate()?;
        Ok(Self {
            binner: SpatialBinner::new(config.bin_radius),
            config,
            records: HashMap::new(),
            global_max: 0.0,
            active: ActiveSpot::Idle,
        })
    }

    /// Create a store with default tuning.
    pub fn with_defaults() -> Self {
        let config = EngineConfig::default();
        Self {
            binner: SpatialBinner::new(config.bin_radius),
            config,
            records: HashMap::new(),
            global_max: 0.0,
            active: ActiveSpot::Idle,
        }
    }

    /// Accumulate one sample. Returns the bin it landed in.
    ///
    /// Samples must be finite; filtering happens at the session boundary.
    pub fn ingest(&mut self, sample: &GazeSample) -> BinKey {
        let key = self.binner.bin(sample.x, sample.y);
        let rate = self.config.accumulation_rate;

        let record = self
            .records
            .entry(key)
            .and_modify(|r| {
                r.value += rate;
                r.x = sample.x;
                r.y = sample.y;
            })
            .or_insert(IntensityRecord {
                x: sample.x,
                y: sample.y,
                value: 1.0,
            });

        self.global_max = self.global_max.max(record.value);
        self.active.on_ingest(key, sample.timestamp_ns);
        key
    }

    /// Run one decay pass at `now_ns`.
    pub fn decay_tick(&mut self, now_ns: TimestampNs) -> DecayReport {
        let released_active = self
            .active
            .on_decay_tick(now_ns, self.config.gaze_timeout_ns());
        let active_key = self.active.key();
        let decay_rate = self.config.decay_rate;
        let min_value = self.config.min_value;

        let mut decayed = 0;
        for (key, record) in self.records.iter_mut() {
            if Some(*key) == active_key {
                continue;
            }
            record.value *= decay_rate;
            decayed += 1;
        }

        let before = self.records.len();
        self.records.retain(|_, r| r.value >= min_value);
        let evicted = before - self.records.len();

        let report = DecayReport {
            decayed,
            evicted,
            released_active,
            live: self.records.len(),
        };
        tracing::debug!(
            decayed = report.decayed,
            evicted = report.evicted,
            released_active = report.released_active,
            live = report.live,
            "Decay tick"
        );
        report
    }

    /// Drop all bins, the active spot, and the global max.
    pub fn reset(&mut self) {
        self.records.clear();
        self.global_max = 0.0;
        self.active = ActiveSpot::Idle;
    }

    pub fn get(&self, key: &BinKey) -> Option<&IntensityRecord> {
        self.records.get(key)
    }

    /// Record for the bin `(x, y)` falls into.
    pub fn record_at(&self, x: f64, y: f64) -> Option<&IntensityRecord> {
        self.records.get(&self.binner.bin(x, y))
    }

    pub fn records(&self) -> impl Iterator<Item = &IntensityRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn global_max(&self) -> f64 {
        self.global_max
    }

    pub fn active_key(&self) -> Option<BinKey> {
        self.active.key()
    }
}

impl Default for AccumulationStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}
