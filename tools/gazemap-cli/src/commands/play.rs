//! Play a recorded stream through a live tracking session.

use std::path::PathBuf;
use std::time::Duration;

use gazemap_common::config::AppConfig;
use gazemap_gaze_model::RawGaze;
use gazemap_heat_engine::RenderFrame;
use gazemap_tracking_session::surface::shared;
use gazemap_tracking_session::{GazeSession, RenderSurface};

use super::{load_stream, print_report, resolve_viewport};

/// Surface that reports each frame to the log instead of drawing it.
#[derive(Debug, Default)]
struct LogSurface {
    frames: u64,
    last_bins: usize,
    last_max: f64,
}

impl RenderSurface for LogSurface {
    fn set_data(&mut self, frame: &RenderFrame) {
        self.frames += 1;
        self.last_bins = frame.len();
        self.last_max = frame.max;
    }

    fn repaint(&mut self) {
        tracing::debug!(
            frame = self.frames,
            bins = self.last_bins,
            max = self.last_max,
            "Frame"
        );
    }
}

pub async fn run(
    config: &AppConfig,
    path: PathBuf,
    speed: f64,
    width: Option<f64>,
    height: Option<f64>,
) -> anyhow::Result<()> {
    if !(speed.is_finite() && speed > 0.0) {
        return Err(anyhow::anyhow!("Speed must be a positive number, got {speed}"));
    }

    let (samples, header) = load_stream(&path)?;
    println!("Playing {} samples from: {}", samples.len(), path.display());
    println!("  Speed: {speed}x");

    let mut session = GazeSession::new(config.engine, config.analysis, shared(LogSurface::default()))
        .map_err(|e| anyhow::anyhow!("Failed to create session: {e}"))?;
    session
        .begin_calibration()
        .and_then(|_| session.finish_calibration())
        .map_err(|e| anyhow::anyhow!("Failed to start tracking: {e}"))?;

    let start = tokio::time::Instant::now();
    let first_ns = samples.first().map(|s| s.timestamp_ns).unwrap_or(0);
    for sample in &samples {
        let offset_ns = sample.timestamp_ns.saturating_sub(first_ns) as f64 / speed;
        tokio::time::sleep_until(start + Duration::from_nanos(offset_ns as u64)).await;
        session.ingest(Some(RawGaze::new(sample.x, sample.y)));
    }

    let stats = session.stats();
    let snapshot = session
        .stop()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to stop session: {e}"))?;

    println!(
        "  Accepted {} samples ({} rejected), {} live bins, max intensity {:.2}",
        stats.samples_accepted, stats.samples_rejected, stats.live_bins, stats.global_max
    );
    println!(
        "  Snapshot: {} points, captured {}",
        snapshot.len(),
        snapshot.captured_at().to_rfc3339()
    );

    let Some(viewport) = resolve_viewport(width, height, header.as_ref()) else {
        println!("  No viewport size known; pass --width/--height for analysis.");
        return Ok(());
    };
    match session.analyze(viewport) {
        Some(report) => print_report(&report),
        None => println!("  No analysis available."),
    }

    Ok(())
}
