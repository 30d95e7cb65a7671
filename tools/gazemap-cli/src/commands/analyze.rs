//! Region analysis of a saved snapshot.

use std::path::PathBuf;

use gazemap_common::config::AppConfig;
use gazemap_gaze_model::Snapshot;
use gazemap_heat_engine::RegionAnalyzer;

use super::{print_report, resolve_viewport};

pub fn run(
    config: &AppConfig,
    path: PathBuf,
    width: Option<f64>,
    height: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    let (snapshot, header) =
        Snapshot::load_jsonl(&path).map_err(|e| anyhow::anyhow!("Failed to load snapshot: {e}"))?;

    let viewport = resolve_viewport(width, height, header.as_ref()).ok_or_else(|| {
        anyhow::anyhow!("Snapshot has no viewport header; pass --width and --height")
    })?;

    let analyzer = RegionAnalyzer::new(config.analysis);
    let Some(report) = analyzer.analyze_snapshot(&snapshot, viewport) else {
        if json {
            println!("null");
        } else {
            println!("No gaze data to analyze in {}", path.display());
        }
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Analyzing snapshot at: {}", path.display());
    println!(
        "  Viewport: {}x{}, {} points",
        viewport.width, viewport.height, report.total_points
    );
    print_report(&report);

    if !report.breakdown.hotspots.is_empty() {
        println!("\n  Hotspots:");
        for hotspot in &report.breakdown.hotspots {
            println!(
                "    ({:>5.0}, {:>5.0})  {:>5} pts  {:>3}%",
                hotspot.x, hotspot.y, hotspot.count, hotspot.percentage
            );
        }
    }

    Ok(())
}
