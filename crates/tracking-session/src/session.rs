//! Gaze tracking session management.

use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use tokio::time::Instant;

use gazemap_common::clock::SessionClock;
use gazemap_common::config::{AnalysisConfig, EngineConfig};
use gazemap_common::error::{GazemapError, GazemapResult};
use gazemap_gaze_model::{
    GazeSample, RawGaze, SampleStreamHeader, Snapshot, TimestampNs, ViewportSize,
};
use gazemap_heat_engine::{AccumulationStore, AnalysisReport, BinKey, RegionAnalyzer, RenderFrame};

use crate::loops::{elapsed_ns, lock, EngineLoops, EngineState, SharedEngine};
use crate::surface::{present, SharedSurface};

/// Lifecycle of a session. Transitions only move forward, except
/// `reset` (back to Tracking) and `recalibrate` (back to Calibrating).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, nothing started.
    Idle,
    /// Calibration in progress; samples are not accumulated.
    Calibrating,
    /// Samples accumulate; decay and render loops are running.
    Tracking,
    /// Tracking stopped; the snapshot is frozen for review and analysis.
    Reviewing,
}

/// Point-in-time counters for a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStats {
    pub state: SessionState,
    pub samples_accepted: usize,
    pub samples_rejected: u64,
    pub live_bins: usize,
    pub global_max: f64,
    pub active_bin: Option<BinKey>,
}

/// A gaze session: one accumulation store, its loops, and its snapshot.
pub struct GazeSession {
    engine_config: EngineConfig,
    analyzer: RegionAnalyzer,
    state: SessionState,
    engine: SharedEngine,
    surface: SharedSurface,
    clock: SessionClock,
    epoch: Instant,
    loops: Option<EngineLoops>,
    snapshot: Option<Snapshot>,
    heatmap_visible: bool,
}

impl GazeSession {
    /// Create a session. Fails only on invalid engine configuration.
    pub fn new(
        engine_config: EngineConfig,
        analysis_config: AnalysisConfig,
        surface: SharedSurface,
    ) -> GazemapResult<Self> {
        let store = AccumulationStore::new(engine_config)?;
        Ok(Self {
            engine_config,
            analyzer: RegionAnalyzer::new(analysis_config),
            state: SessionState::Idle,
            engine: Arc::new(Mutex::new(EngineState::new(store))),
            surface,
            clock: SessionClock::start(),
            epoch: Instant::now(),
            loops: None,
            snapshot: None,
            heatmap_visible: false,
        })
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Idle → Calibrating.
    pub fn begin_calibration(&mut self) -> GazemapResult<()> {
        if self.state != SessionState::Idle {
            return Err(GazemapError::session(format!(
                "Cannot calibrate from {:?}",
                self.state
            )));
        }
        self.state = SessionState::Calibrating;
        tracing::info!("Calibration started");
        Ok(())
    }

    /// Calibrating → Tracking. Starts the decay and render loops.
    pub fn finish_calibration(&mut self) -> GazemapResult<()> {
        if self.state != SessionState::Calibrating {
            return Err(GazemapError::session(format!(
                "Cannot finish calibration from {:?}",
                self.state
            )));
        }
        self.start_tracking()
    }

    /// Tracking | Reviewing → Calibrating. Accumulated data is kept until
    /// the next reset; loops stop while calibrating.
    pub async fn recalibrate(&mut self) -> GazemapResult<()> {
        match self.state {
            SessionState::Tracking | SessionState::Reviewing => {
                self.cancel_loops().await;
                self.snapshot = None;
                self.heatmap_visible = false;
                self.state = SessionState::Calibrating;
                tracing::info!("Recalibration requested");
                Ok(())
            }
            other => Err(GazemapError::session(format!(
                "Cannot recalibrate from {other:?}"
            ))),
        }
    }

    /// Accept a gaze prediction stamped with the session clock.
    ///
    /// Returns whether the sample was accumulated. Tracking loss (`None`),
    /// non-finite coordinates, and samples outside Tracking are dropped.
    pub fn ingest(&self, raw: Option<RawGaze>) -> bool {
        self.ingest_at(raw, elapsed_ns(self.epoch))
    }

    /// Accept a gaze prediction with an explicit timestamp.
    pub fn ingest_at(&self, raw: Option<RawGaze>, timestamp_ns: TimestampNs) -> bool {
        if self.state != SessionState::Tracking {
            return false;
        }
        let mut engine = lock(&self.engine);
        match GazeSample::from_raw(raw, timestamp_ns) {
            Some(sample) => {
                engine.store.ingest(&sample);
                engine.samples.push(sample);
                true
            }
            None => {
                if raw.is_some() {
                    engine.rejected += 1;
                    tracing::trace!(?raw, "Dropped non-finite gaze sample");
                }
                false
            }
        }
    }

    /// Tracking → Reviewing. Cancels both loops, then freezes the raw
    /// sample list. Calling again returns the same snapshot.
    pub async fn stop(&mut self) -> GazemapResult<Snapshot> {
        match self.state {
            SessionState::Reviewing => {
                if let Some(snapshot) = &self.snapshot {
                    return Ok(snapshot.clone());
                }
                Err(GazemapError::session("Reviewing without a snapshot"))
            }
            SessionState::Tracking => {
                self.cancel_loops().await;

                let snapshot = Snapshot::new(lock(&self.engine).samples.clone());
                self.snapshot = Some(snapshot.clone());
                self.state = SessionState::Reviewing;
                self.heatmap_visible = true;
                present(&self.surface, &RenderFrame::from_snapshot(&snapshot));

                tracing::info!(samples = snapshot.len(), "Tracking stopped");
                Ok(snapshot)
            }
            other => Err(GazemapError::session(format!(
                "Cannot stop from {other:?}: not tracking"
            ))),
        }
    }

    /// Clear all accumulated data and resume tracking.
    pub async fn reset(&mut self) -> GazemapResult<()> {
        match self.state {
            SessionState::Tracking | SessionState::Reviewing => {
                self.cancel_loops().await;
                {
                    let mut engine = lock(&self.engine);
                    engine.store.reset();
                    engine.samples.clear();
                    engine.rejected = 0;
                }
                present(&self.surface, &RenderFrame::sample(&lock(&self.engine).store));
                tracing::info!("Session reset");
                self.start_tracking()
            }
            other => Err(GazemapError::session(format!(
                "Cannot reset from {other:?}"
            ))),
        }
    }

    /// Flip heatmap visibility while reviewing. Returns the new visibility.
    pub fn toggle_heatmap(&mut self) -> GazemapResult<bool> {
        if self.state != SessionState::Reviewing {
            return Err(GazemapError::session("Heatmap can only be toggled while reviewing"));
        }
        self.heatmap_visible = !self.heatmap_visible;
        if self.heatmap_visible {
            if let Some(snapshot) = &self.snapshot {
                present(&self.surface, &RenderFrame::from_snapshot(snapshot));
            }
        }
        Ok(self.heatmap_visible)
    }

    pub fn heatmap_visible(&self) -> bool {
        self.heatmap_visible
    }

    /// The frozen snapshot, once tracking has stopped.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Region analysis of the snapshot. `None` before stop or when empty.
    pub fn analyze(&self, viewport: ViewportSize) -> Option<AnalysisReport> {
        let snapshot = self.snapshot.as_ref()?;
        self.analyzer.analyze_snapshot(snapshot, viewport)
    }

    /// Persist the snapshot as JSONL.
    pub fn save_snapshot(&self, path: &Path, viewport: ViewportSize) -> GazemapResult<()> {
        let snapshot = self
            .snapshot
            .as_ref()
            .ok_or_else(|| GazemapError::session("No snapshot to save: tracking not stopped"))?;
        let header =
            SampleStreamHeader::new(self.clock.epoch_wall(), viewport.width, viewport.height);
        snapshot
            .save_jsonl(path, &header)
            .map_err(|e| GazemapError::model(format!("Failed to save snapshot: {e}")))?;
        tracing::info!(path = %path.display(), samples = snapshot.len(), "Snapshot saved");
        Ok(())
    }

    /// Current live render frame (read-only projection of the store).
    pub fn current_frame(&self) -> RenderFrame {
        RenderFrame::sample(&lock(&self.engine).store)
    }

    pub fn stats(&self) -> SessionStats {
        let engine = lock(&self.engine);
        SessionStats {
            state: self.state,
            samples_accepted: engine.samples.len(),
            samples_rejected: engine.rejected,
            live_bins: engine.store.len(),
            global_max: engine.store.global_max(),
            active_bin: engine.store.active_key(),
        }
    }

    fn start_tracking(&mut self) -> GazemapResult<()> {
        let loops = EngineLoops::spawn(
            self.engine.clone(),
            self.surface.clone(),
            self.epoch,
            &self.engine_config,
        )?;
        self.loops = Some(loops);
        // A snapshot only exists between stop and the next tracking run
        self.snapshot = None;
        self.heatmap_visible = false;
        self.state = SessionState::Tracking;
        tracing::info!(
            bin_radius = self.engine_config.bin_radius,
            decay_ms = self.engine_config.decay_interval_ms,
            render_ms = self.engine_config.render_interval_ms,
            "Tracking started"
        );
        Ok(())
    }

    async fn cancel_loops(&mut self) {
        if let Some(loops) = self.loops.take() {
            loops.cancel().await;
        }
    }
}
