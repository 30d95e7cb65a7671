use std::time::Duration;

use gazemap_common::config::{AnalysisConfig, EngineConfig};
use gazemap_gaze_model::{RawGaze, Snapshot, ViewportSize};
use gazemap_tracking_session::surface::shared;
use gazemap_tracking_session::{FrameRecorder, GazeSession, SessionState};

fn tracking_session() -> (GazeSession, FrameRecorder) {
    let recorder = FrameRecorder::new();
    let mut session = GazeSession::new(
        EngineConfig::default(),
        AnalysisConfig::default(),
        shared(recorder.clone()),
    )
    .expect("default config is valid");
    session.begin_calibration().unwrap();
    session.finish_calibration().unwrap();
    assert_eq!(session.state(), SessionState::Tracking);
    (session, recorder)
}

#[tokio::test(start_paused = true)]
async fn render_loop_publishes_accumulated_field() {
    let (session, recorder) = tracking_session();
    for _ in 0..100 {
        assert!(session.ingest(Some(RawGaze::new(500.0, 500.0))));
    }

    tokio::time::sleep(Duration::from_millis(120)).await;

    assert!(recorder.frames() >= 2);
    assert_eq!(recorder.frames(), recorder.repaints());
    let frame = recorder.last_frame().unwrap();
    assert_eq!(frame.data.len(), 1);
    assert!((frame.max - 30.7).abs() < 1e-9);
    assert!((frame.data[0].value - 30.7).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn decay_loop_fades_stale_gaze_but_not_max() {
    let (session, _recorder) = tracking_session();
    for _ in 0..100 {
        session.ingest(Some(RawGaze::new(500.0, 500.0)));
    }

    tokio::time::sleep(Duration::from_millis(10_100)).await;

    let frame = session.current_frame();
    assert!((frame.data[0].value - 30.7 * 0.9).abs() < 1e-9);
    assert!((frame.max - 30.7).abs() < 1e-9);
    assert_eq!(session.stats().active_bin, None);
}

#[tokio::test(start_paused = true)]
async fn active_gaze_is_exempt_from_decay() {
    let (session, _recorder) = tracking_session();
    let mut hits = 0;
    for _ in 0..105 {
        session.ingest(Some(RawGaze::new(200.0, 200.0)));
        hits += 1;
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    let stats = session.stats();
    assert!(stats.active_bin.is_some());
    let frame = session.current_frame();
    let expected = 1.0 + 0.3 * (hits as f64 - 1.0);
    assert!((frame.data[0].value - expected).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn malformed_samples_are_dropped() {
    let (session, _recorder) = tracking_session();
    assert!(!session.ingest(None));
    assert!(!session.ingest(Some(RawGaze::new(f64::NAN, 1.0))));
    assert!(session.ingest(Some(RawGaze::new(0.0, 0.0))));

    let stats = session.stats();
    assert_eq!(stats.samples_accepted, 1);
    assert_eq!(stats.samples_rejected, 1);
    assert_eq!(stats.live_bins, 1);
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_loops_and_is_idempotent() {
    let (mut session, recorder) = tracking_session();
    session.ingest(Some(RawGaze::new(100.0, 100.0)));
    session.ingest(Some(RawGaze::new(800.0, 600.0)));

    let first = session.stop().await.unwrap();
    assert_eq!(session.state(), SessionState::Reviewing);
    assert!(session.heatmap_visible());
    assert_eq!(first.len(), 2);

    // The review overlay is the last thing pushed to the surface
    let review = recorder.last_frame().unwrap();
    assert_eq!(review.max, 10.0);
    let frames_after_stop = recorder.frames();
    let bins_after_stop = session.current_frame();

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(recorder.frames(), frames_after_stop);
    assert_eq!(session.current_frame(), bins_after_stop);

    let second = session.stop().await.unwrap();
    assert!(first.shares_buffer_with(&second));
    assert_eq!(first, second);

    assert!(!session.ingest(Some(RawGaze::new(1.0, 1.0))));
    assert_eq!(session.stop().await.unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn analysis_runs_on_frozen_snapshot() {
    let (mut session, _recorder) = tracking_session();
    assert!(session.analyze(ViewportSize::new(900.0, 900.0)).is_none());

    for row in 0..3 {
        for col in 0..3 {
            session.ingest(Some(RawGaze::new(
                150.0 + col as f64 * 300.0,
                150.0 + row as f64 * 300.0,
            )));
        }
    }
    session.stop().await.unwrap();

    let report = session.analyze(ViewportSize::new(900.0, 900.0)).unwrap();
    assert_eq!(report.total_points, 9);
    assert!(report
        .breakdown
        .regions
        .iter()
        .all(|r| r.percentage == 11 || r.percentage == 12));
    assert!(!report.has_insight("Primary Attention Hotspot"));
}

#[tokio::test(start_paused = true)]
async fn empty_session_has_no_analysis() {
    let (mut session, _recorder) = tracking_session();
    let snapshot = session.stop().await.unwrap();
    assert!(snapshot.is_empty());
    assert!(session.analyze(ViewportSize::new(1280.0, 720.0)).is_none());
}

#[tokio::test(start_paused = true)]
async fn reset_clears_everything_and_resumes_tracking() {
    let (mut session, recorder) = tracking_session();
    for _ in 0..10 {
        session.ingest(Some(RawGaze::new(300.0, 300.0)));
    }
    session.stop().await.unwrap();

    session.reset().await.unwrap();
    assert_eq!(session.state(), SessionState::Tracking);
    assert!(session.snapshot().is_none());
    assert!(!session.heatmap_visible());
    let stats = session.stats();
    assert_eq!(stats.samples_accepted, 0);
    assert_eq!(stats.live_bins, 0);
    assert_eq!(stats.global_max, 0.0);

    assert!(session.ingest(Some(RawGaze::new(10.0, 10.0))));
    tokio::time::sleep(Duration::from_millis(60)).await;
    let frame = recorder.last_frame().unwrap();
    assert_eq!(frame.max, 1.0);
    assert_eq!(frame.data.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn toggle_heatmap_only_while_reviewing() {
    let (mut session, _recorder) = tracking_session();
    assert!(session.toggle_heatmap().is_err());
    session.ingest(Some(RawGaze::new(10.0, 10.0)));
    session.stop().await.unwrap();

    assert!(!session.toggle_heatmap().unwrap());
    assert!(session.toggle_heatmap().unwrap());
}

#[tokio::test(start_paused = true)]
async fn recalibration_pauses_loops_and_keeps_data() {
    let (mut session, recorder) = tracking_session();
    session.ingest(Some(RawGaze::new(50.0, 50.0)));
    tokio::time::sleep(Duration::from_millis(60)).await;

    session.recalibrate().await.unwrap();
    assert_eq!(session.state(), SessionState::Calibrating);
    let frames = recorder.frames();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(recorder.frames(), frames);
    assert!(!session.ingest(Some(RawGaze::new(50.0, 50.0))));

    session.finish_calibration().unwrap();
    assert_eq!(session.stats().samples_accepted, 1);
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(recorder.frames() > frames);
}

#[tokio::test(start_paused = true)]
async fn resuming_after_recalibration_discards_old_snapshot() {
    let (mut session, _recorder) = tracking_session();
    session.ingest(Some(RawGaze::new(150.0, 150.0)));
    session.stop().await.unwrap();
    assert!(session.snapshot().is_some());

    session.recalibrate().await.unwrap();
    assert!(session.snapshot().is_none());
    session.finish_calibration().unwrap();
    assert_eq!(session.state(), SessionState::Tracking);
    assert!(session.ingest(Some(RawGaze::new(450.0, 450.0))));

    let viewport = ViewportSize::new(900.0, 900.0);
    assert!(session.snapshot().is_none());
    assert!(!session.heatmap_visible());
    assert!(session.analyze(viewport).is_none());
    let path = std::env::temp_dir().join("gazemap-never-written.jsonl");
    assert!(session.save_snapshot(&path, viewport).is_err());

    // data kept across recalibration lands in the next snapshot
    let snapshot = session.stop().await.unwrap();
    assert_eq!(snapshot.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn dropping_session_cancels_loops() {
    let (session, recorder) = tracking_session();
    tokio::time::sleep(Duration::from_millis(120)).await;
    drop(session);
    let frames = recorder.frames();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(recorder.frames(), frames);
}

#[tokio::test(start_paused = true)]
async fn saved_snapshot_loads_back() {
    let (mut session, _recorder) = tracking_session();
    session.ingest(Some(RawGaze::new(12.0, 34.0)));
    session.ingest(Some(RawGaze::new(56.0, 78.0)));
    let snapshot = session.stop().await.unwrap();

    let path = std::env::temp_dir()
        .join(format!("gazemap-session-{}", std::process::id()))
        .join("snapshot.jsonl");
    session
        .save_snapshot(&path, ViewportSize::new(1280.0, 720.0))
        .unwrap();

    let (loaded, header) = Snapshot::load_jsonl(&path).unwrap();
    assert_eq!(loaded.samples(), snapshot.samples());
    let header = header.unwrap();
    assert_eq!(header.viewport_width, 1280.0);
    let _ = std::fs::remove_file(path);
}
