//! Terminal snapshots of a tracking session.
//!
//! A snapshot is the full raw sample list captured at the moment tracking
//! stops. It is shared, never mutated, and outlives the session that
//! produced it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::sample::{parse_header, parse_samples, serialize_samples, GazeSample, SampleStreamHeader};
use crate::viewport::Point2D;

/// Errors raised while persisting or loading snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable copy of the raw samples recorded during a session.
///
/// Cloning is cheap; clones share the same sample buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    samples: Arc<[GazeSample]>,
    captured_at: DateTime<Utc>,
}

impl Snapshot {
    /// Freeze a sample list.
    pub fn new(samples: Vec<GazeSample>) -> Self {
        Self {
            samples: samples.into(),
            captured_at: Utc::now(),
        }
    }

    /// An empty snapshot (nothing was tracked).
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn samples(&self) -> &[GazeSample] {
        &self.samples
    }

    /// Raw sample positions, in arrival order.
    pub fn points(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.samples.iter().map(|s| Point2D::new(s.x, s.y))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Whether two handles refer to the same frozen buffer.
    pub fn shares_buffer_with(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.samples, &other.samples)
    }

    /// Time covered by the snapshot, first to last sample (ns).
    pub fn duration_ns(&self) -> u64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.timestamp_ns.saturating_sub(first.timestamp_ns),
            _ => 0,
        }
    }

    /// Write the snapshot as JSONL with a `#` header line.
    pub fn save_jsonl(&self, path: &Path, header: &SampleStreamHeader) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "# {}", serde_json::to_string(header)?)?;
        writer.write_all(serialize_samples(&self.samples)?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Load a JSONL snapshot, returning its header when present.
    pub fn load_jsonl(path: &Path) -> Result<(Self, Option<SampleStreamHeader>), SnapshotError> {
        let content = std::fs::read_to_string(path)?;
        let header = parse_header(&content);
        let samples = parse_samples(&content)?;
        Ok((Self::new(samples), header))
    }
}

impl From<Vec<GazeSample>> for Snapshot {
    fn from(samples: Vec<GazeSample>) -> Self {
        Self::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("gazemap-snapshot-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_clone_shares_buffer() {
        let snap = Snapshot::new(vec![GazeSample::new(0, 1.0, 2.0)]);
        let copy = snap.clone();
        assert!(snap.shares_buffer_with(&copy));
        assert_eq!(snap, copy);
    }

    #[test]
    fn test_duration() {
        let snap = Snapshot::new(vec![
            GazeSample::new(1_000, 0.0, 0.0),
            GazeSample::new(9_000, 0.0, 0.0),
        ]);
        assert_eq!(snap.duration_ns(), 8_000);
        assert_eq!(Snapshot::empty().duration_ns(), 0);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip.jsonl");
        let snap = Snapshot::new(vec![
            GazeSample::new(0, 10.0, 20.0),
            GazeSample::new(33_000_000, 12.0, 21.0),
        ]);
        let header = SampleStreamHeader::new("2026-01-01T00:00:00Z", 800.0, 600.0);
        snap.save_jsonl(&path, &header).unwrap();

        let (loaded, loaded_header) = Snapshot::load_jsonl(&path).unwrap();
        assert_eq!(loaded.samples(), snap.samples());
        assert_eq!(loaded_header, Some(header));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Snapshot::load_jsonl(Path::new("/nonexistent/snap.jsonl")).unwrap_err();
        assert!(matches!(err, SnapshotError::Io(_)));
    }
}
