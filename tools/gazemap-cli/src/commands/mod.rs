pub mod analyze;
pub mod config;
pub mod play;
pub mod replay;

use std::path::Path;

use gazemap_gaze_model::{parse_header, parse_samples, GazeSample, SampleStreamHeader, ViewportSize};
use gazemap_heat_engine::AnalysisReport;

/// Load a JSONL sample stream and its optional header.
pub(crate) fn load_stream(
    path: &Path,
) -> anyhow::Result<(Vec<GazeSample>, Option<SampleStreamHeader>)> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let header = parse_header(&content);
    let samples = parse_samples(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse samples: {e}"))?;
    Ok((samples, header))
}

/// Explicit flags win over the stream header.
pub(crate) fn resolve_viewport(
    width: Option<f64>,
    height: Option<f64>,
    header: Option<&SampleStreamHeader>,
) -> Option<ViewportSize> {
    let width = width.or(header.map(|h| h.viewport_width))?;
    let height = height.or(header.map(|h| h.viewport_height))?;
    Some(ViewportSize::new(width, height))
}

pub(crate) fn print_report(report: &AnalysisReport) {
    println!("\n{}", report.summary);
    println!("\n  Regions:");
    for stats in &report.breakdown.regions {
        println!(
            "    {:<14} {:>6} pts  {:>3}%",
            stats.region.label(),
            stats.count,
            stats.percentage
        );
    }
    println!("\n  Insights:");
    for insight in &report.insights {
        println!("    [{:?}] {}: {}", insight.kind, insight.title, insight.description);
    }
}
