use gazemap_gaze_model::{GazeSample, Point2D, Snapshot, ViewportSize};
use gazemap_heat_engine::{AccumulationStore, RegionAnalyzer, RenderFrame};

const MS: u64 = 1_000_000;
const SEC: u64 = 1_000 * MS;

/// Feed a 30 Hz stream into the store, running decay every 10 s of
/// stream time the way the live scheduler does.
fn replay(store: &mut AccumulationStore, samples: &[GazeSample]) -> usize {
    let mut next_decay = 10 * SEC;
    let mut ticks = 0;
    for sample in samples {
        while sample.timestamp_ns >= next_decay {
            store.decay_tick(next_decay);
            next_decay += 10 * SEC;
            ticks += 1;
        }
        store.ingest(sample);
    }
    ticks
}

fn fixation(start_ns: u64, duration_ns: u64, x: f64, y: f64) -> Vec<GazeSample> {
    let step = 33 * MS;
    (0..duration_ns / step)
        .map(|i| GazeSample::new(start_ns + i * step, x, y))
        .collect()
}

#[test]
fn sustained_fixation_is_never_decayed() {
    let mut store = AccumulationStore::with_defaults();
    let samples = fixation(0, 35 * SEC, 640.0, 360.0);
    let ticks = replay(&mut store, &samples);
    assert_eq!(ticks, 3);

    let record = store.record_at(640.0, 360.0).unwrap();
    let expected = 1.0 + 0.3 * (samples.len() as f64 - 1.0);
    assert!((record.value - expected).abs() < 1e-6);
    assert!((store.global_max() - expected).abs() < 1e-6);
}

#[test]
fn abandoned_spot_fades_while_new_spot_grows() {
    let mut store = AccumulationStore::with_defaults();
    let mut samples = fixation(0, 2 * SEC, 100.0, 100.0);
    samples.extend(fixation(2 * SEC, 40 * SEC, 900.0, 500.0));
    replay(&mut store, &samples);

    let old = store.record_at(100.0, 100.0).unwrap();
    let new = store.record_at(900.0, 500.0).unwrap();
    assert!(new.value > old.value);
    // 4 decay ticks (10s..40s) touched the abandoned bin
    let peak_old = 1.0 + 0.3 * (fixation(0, 2 * SEC, 0.0, 0.0).len() as f64 - 1.0);
    assert!((old.value - peak_old * 0.9f64.powi(4)).abs() < 1e-6);
}

#[test]
fn brief_glance_is_evicted_after_enough_quiet_ticks() {
    let mut store = AccumulationStore::with_defaults();
    store.ingest(&GazeSample::new(0, 50.0, 50.0));
    for tick in 1..=22u64 {
        store.decay_tick(tick * 10 * SEC);
    }
    assert!(store.record_at(50.0, 50.0).is_none());
    // max stays pinned to the peak ever seen
    let frame = RenderFrame::sample(&store);
    assert_eq!(frame.max, 1.0);
    assert!(frame.is_empty());
}

#[test]
fn snapshot_analysis_uses_raw_points_not_bins() {
    let mut store = AccumulationStore::with_defaults();
    let samples = fixation(0, 3 * SEC, 150.0, 150.0);
    replay(&mut store, &samples);
    assert_eq!(store.len(), 1);

    let snapshot = Snapshot::new(samples.clone());
    let report = RegionAnalyzer::with_defaults()
        .analyze_snapshot(&snapshot, ViewportSize::new(900.0, 900.0))
        .unwrap();
    assert_eq!(report.total_points, samples.len());
    assert_eq!(report.breakdown.hottest.count, samples.len());
}

#[test]
fn empty_snapshot_has_no_analysis() {
    let analyzer = RegionAnalyzer::with_defaults();
    assert!(analyzer
        .analyze_snapshot(&Snapshot::empty(), ViewportSize::new(1920.0, 1080.0))
        .is_none());
    assert!(analyzer
        .analyze(&Vec::<Point2D>::new(), ViewportSize::new(1920.0, 1080.0))
        .is_none());
}
