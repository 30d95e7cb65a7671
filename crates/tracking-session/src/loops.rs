//! Scheduled decay and render loops.
//!
//! Both loops run as tokio tasks on fixed periods, independent of how fast
//! samples arrive. They share the engine through one mutex that is never
//! held across an await, so an ingest, a decay tick, and a render read
//! never interleave mid-operation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use gazemap_common::config::EngineConfig;
use gazemap_common::error::{GazemapError, GazemapResult};
use gazemap_gaze_model::GazeSample;
use gazemap_heat_engine::{AccumulationStore, RenderFrame};

use crate::surface::{present, SharedSurface};

/// Everything the loops and the ingest path mutate.
#[derive(Debug)]
pub struct EngineState {
    pub store: AccumulationStore,
    /// Every accepted raw sample, in arrival order.
    pub samples: Vec<GazeSample>,
    pub rejected: u64,
}

impl EngineState {
    pub fn new(store: AccumulationStore) -> Self {
        Self {
            store,
            samples: Vec::new(),
            rejected: 0,
        }
    }
}

pub type SharedEngine = Arc<Mutex<EngineState>>;

pub(crate) fn lock(engine: &SharedEngine) -> MutexGuard<'_, EngineState> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Nanoseconds since `epoch` on the tokio clock.
pub(crate) fn elapsed_ns(epoch: Instant) -> u64 {
    u64::try_from(epoch.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

/// Handles to the running decay and render tasks.
///
/// Dropping the handles aborts both tasks, so every exit path of the
/// owning session cancels its loops.
#[derive(Debug)]
pub struct EngineLoops {
    decay: JoinHandle<()>,
    render: JoinHandle<()>,
}

impl EngineLoops {
    /// Spawn both loops on the current tokio runtime.
    pub fn spawn(
        engine: SharedEngine,
        surface: SharedSurface,
        epoch: Instant,
        config: &EngineConfig,
    ) -> GazemapResult<Self> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| GazemapError::session(format!("No async runtime for engine loops: {e}")))?;

        let decay_period = config.decay_interval();
        let render_period = config.render_interval();
        let start = Instant::now();

        let decay_engine = engine.clone();
        let decay = runtime.spawn(async move {
            let mut ticker = interval_at(start + decay_period, decay_period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let now_ns = elapsed_ns(epoch);
                lock(&decay_engine).store.decay_tick(now_ns);
            }
        });

        let render = runtime.spawn(async move {
            let mut ticker = interval_at(start + render_period, render_period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let frame = RenderFrame::sample(&lock(&engine).store);
                present(&surface, &frame);
            }
        });

        tracing::debug!(
            decay_ms = decay_period.as_millis() as u64,
            render_ms = render_period.as_millis() as u64,
            "Engine loops started"
        );
        Ok(Self { decay, render })
    }

    /// Abort both loops and wait until neither can run again.
    pub async fn cancel(mut self) {
        self.decay.abort();
        self.render.abort();
        // Cancellation errors are the expected outcome here.
        let _ = (&mut self.decay).await;
        let _ = (&mut self.render).await;
        tracing::debug!("Engine loops cancelled");
    }
}

impl Drop for EngineLoops {
    fn drop(&mut self) {
        self.decay.abort();
        self.render.abort();
    }
}
