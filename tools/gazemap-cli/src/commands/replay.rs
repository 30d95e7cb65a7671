//! Replay a recorded stream through the engine against its own timestamps.

use std::path::PathBuf;

use gazemap_common::clock::{RateController, SessionClock};
use gazemap_common::config::AppConfig;
use gazemap_gaze_model::{SampleStreamHeader, Snapshot, ViewportSize};
use gazemap_heat_engine::{AccumulationStore, RegionAnalyzer, RenderFrame};

use super::{load_stream, print_report, resolve_viewport};

pub fn run(
    config: &AppConfig,
    path: PathBuf,
    width: Option<f64>,
    height: Option<f64>,
    snapshot_out: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let (samples, header) = load_stream(&path)?;
    if !json {
        println!("Replaying {} samples from: {}", samples.len(), path.display());
    }

    let samples: Vec<_> = samples.into_iter().filter(|s| s.is_finite()).collect();
    let Some(start_ns) = samples.first().map(|s| s.timestamp_ns) else {
        println!("  No samples to replay.");
        return Ok(());
    };

    let mut store = AccumulationStore::new(config.engine)
        .map_err(|e| anyhow::anyhow!("Invalid engine config: {e}"))?;
    let mut decay = RateController::every_ms(config.engine.decay_interval_ms).anchored_at(start_ns);
    let mut render =
        RateController::every_ms(config.engine.render_interval_ms).anchored_at(start_ns);

    let mut decay_ticks = 0u64;
    let mut evicted = 0usize;
    let mut frames = 0u64;
    let mut peak_bins = 0usize;

    for sample in &samples {
        while decay.should_tick(sample.timestamp_ns) {
            let at = decay.last_tick_ns().unwrap_or(sample.timestamp_ns);
            evicted += store.decay_tick(at).evicted;
            decay_ticks += 1;
        }
        while render.should_tick(sample.timestamp_ns) {
            peak_bins = peak_bins.max(RenderFrame::sample(&store).len());
            frames += 1;
        }
        store.ingest(sample);
    }
    let frame = RenderFrame::sample(&store);

    tracing::info!(
        samples = samples.len(),
        decay_ticks,
        evicted,
        frames,
        live_bins = store.len(),
        "Replay finished"
    );

    let snapshot = Snapshot::new(samples);
    let viewport = resolve_viewport(width, height, header.as_ref());
    let report = viewport.and_then(|vp| {
        RegionAnalyzer::new(config.analysis).analyze_snapshot(&snapshot, vp)
    });

    if let Some(out) = snapshot_out {
        let header = header.clone().unwrap_or_else(|| {
            let vp = viewport.unwrap_or(ViewportSize::new(0.0, 0.0));
            SampleStreamHeader::new(SessionClock::start().epoch_wall(), vp.width, vp.height)
        });
        snapshot
            .save_jsonl(&out, &header)
            .map_err(|e| anyhow::anyhow!("Failed to write snapshot: {e}"))?;
        if !json {
            println!("  Snapshot written to: {}", out.display());
        }
    }

    if json {
        let output = serde_json::json!({
            "frame": frame,
            "decay_ticks": decay_ticks,
            "evicted": evicted,
            "frames": frames,
            "peak_bins": peak_bins,
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "  Duration: {:.1}s, {} decay ticks, {} render frames",
        snapshot.duration_ns() as f64 / 1_000_000_000.0,
        decay_ticks,
        frames
    );
    println!(
        "  Live bins: {} (peak {}, evicted {}), max intensity {:.2}, hottest live bin {:.2}",
        store.len(),
        peak_bins,
        evicted,
        frame.max,
        frame.peak()
    );

    match (viewport, report) {
        (None, _) => println!("  No viewport size known; pass --width/--height for analysis."),
        (Some(_), None) => println!("  No analysis available."),
        (Some(_), Some(report)) => print_report(&report),
    }

    Ok(())
}
