//! Region analysis over a terminal snapshot of raw gaze points.
//!
//! # Algorithm
//!
//! 1. **Partition** the viewport into a 3×3 grid of equal regions.
//! 2. **Count** each point into exactly one region. Bounds are half-open
//!    `[x0, x1) × [y0, y1)`; the right and bottom viewport edges are closed.
//! 3. **Aggregate** regions into overlapping quadrants (the center region
//!    belongs to all four), disjoint top/bottom and left/right splits, and
//!    center vs periphery.
//! 4. **Hotspots**: rank cells of a coarse fixed-size grid by point count.
//!
//! Analysis works on raw samples, not the decayed bins, and keeps no
//! state between calls.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use gazemap_common::config::AnalysisConfig;
use gazemap_gaze_model::{Point2D, Snapshot, ViewportSize};

use crate::insights::AnalysisReport;

/// One cell of the 3×3 viewport grid, in declaration (row-major) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Region {
    pub const ALL: [Region; 9] = [
        Region::TopLeft,
        Region::TopCenter,
        Region::TopRight,
        Region::MiddleLeft,
        Region::MiddleCenter,
        Region::MiddleRight,
        Region::BottomLeft,
        Region::BottomCenter,
        Region::BottomRight,
    ];

    pub fn from_cell(col: usize, row: usize) -> Option<Region> {
        if col > 2 || row > 2 {
            return None;
        }
        Some(Self::ALL[row * 3 + col])
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable name, e.g. "Middle Center".
    pub fn label(self) -> &'static str {
        match self {
            Region::TopLeft => "Top Left",
            Region::TopCenter => "Top Center",
            Region::TopRight => "Top Right",
            Region::MiddleLeft => "Middle Left",
            Region::MiddleCenter => "Middle Center",
            Region::MiddleRight => "Middle Right",
            Region::BottomLeft => "Bottom Left",
            Region::BottomCenter => "Bottom Center",
            Region::BottomRight => "Bottom Right",
        }
    }
}

/// Quadrants built from four overlapping regions each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// The 2×2 block of regions making up this quadrant.
    pub fn regions(self) -> [Region; 4] {
        use Region::*;
        match self {
            Quadrant::TopLeft => [TopLeft, TopCenter, MiddleLeft, MiddleCenter],
            Quadrant::TopRight => [TopRight, TopCenter, MiddleRight, MiddleCenter],
            Quadrant::BottomLeft => [BottomLeft, BottomCenter, MiddleLeft, MiddleCenter],
            Quadrant::BottomRight => [BottomRight, BottomCenter, MiddleRight, MiddleCenter],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quadrant::TopLeft => "Top-Left",
            Quadrant::TopRight => "Top-Right",
            Quadrant::BottomLeft => "Bottom-Left",
            Quadrant::BottomRight => "Bottom-Right",
        }
    }
}

/// Point count and rounded share for one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionStats {
    pub region: Region,
    pub count: usize,
    pub percentage: u32,
}

/// Rounded percentage shares per quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuadrantShares {
    pub top_left: u32,
    pub top_right: u32,
    pub bottom_left: u32,
    pub bottom_right: u32,
}

impl QuadrantShares {
    pub fn get(&self, quadrant: Quadrant) -> u32 {
        match quadrant {
            Quadrant::TopLeft => self.top_left,
            Quadrant::TopRight => self.top_right,
            Quadrant::BottomLeft => self.bottom_left,
            Quadrant::BottomRight => self.bottom_right,
        }
    }

    /// Highest-share quadrant; ties resolve to the earlier quadrant.
    pub fn dominant(&self) -> (Quadrant, u32) {
        let mut best = (Quadrant::TopLeft, self.top_left);
        for quadrant in Quadrant::ALL {
            let share = self.get(quadrant);
            if share > best.1 {
                best = (quadrant, share);
            }
        }
        best
    }
}

/// Top two rows vs bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopBottom {
    pub top: u32,
    pub bottom: u32,
}

/// Left column vs right column; the center column belongs to neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeftRight {
    pub left: u32,
    pub right: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CenterPeriphery {
    pub center: u32,
    pub periphery: u32,
}

/// A cell of the coarse hotspot grid. `(x, y)` is the cell's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
    pub count: usize,
    pub percentage: u32,
}

/// All numeric results of one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionBreakdown {
    pub total_points: usize,
    /// Per-region stats in declaration order.
    pub regions: Vec<RegionStats>,
    pub hottest: RegionStats,
    pub coldest: RegionStats,
    pub quadrants: QuadrantShares,
    pub top_bottom: TopBottom,
    pub left_right: LeftRight,
    pub center_periphery: CenterPeriphery,
    pub hotspots: Vec<Hotspot>,
}

impl RegionBreakdown {
    /// Regions ordered by count, highest first; ties keep declaration order.
    pub fn ranked(&self) -> Vec<RegionStats> {
        let mut ranked = self.regions.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }
}

/// Rounded share of `count` in `total`, 0 when `total` is 0.
pub fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}

/// Stateless region analyzer.
#[derive(Debug, Clone, Default)]
pub struct RegionAnalyzer {
    config: AnalysisConfig,
}

impl RegionAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(AnalysisConfig::default())
    }

    /// Full analysis with insights. `None` when there is nothing to analyze.
    pub fn analyze(&self, points: &[Point2D], viewport: ViewportSize) -> Option<AnalysisReport> {
        let breakdown = self.breakdown(points, viewport)?;
        Some(AnalysisReport::from_breakdown(breakdown))
    }

    /// Convenience wrapper over a session snapshot.
    pub fn analyze_snapshot(
        &self,
        snapshot: &Snapshot,
        viewport: ViewportSize,
    ) -> Option<AnalysisReport> {
        let points: Vec<Point2D> = snapshot.points().collect();
        self.analyze(&points, viewport)
    }

    /// Which region a point falls in, if it lies inside the viewport.
    pub fn classify(&self, point: Point2D, viewport: ViewportSize) -> Option<Region> {
        let col = grid_index(point.x, viewport.width)?;
        let row = grid_index(point.y, viewport.height)?;
        Region::from_cell(col, row)
    }

    /// Numeric breakdown without insight generation.
    pub fn breakdown(&self, points: &[Point2D], viewport: ViewportSize) -> Option<RegionBreakdown> {
        if points.is_empty() {
            return None;
        }
        if viewport.is_degenerate() {
            tracing::warn!(
                width = viewport.width,
                height = viewport.height,
                "Viewport cannot be partitioned, skipping region analysis"
            );
            return None;
        }

        let total = points.len();
        let mut counts = [0usize; 9];
        let mut outside = 0usize;
        for point in points {
            match self.classify(*point, viewport) {
                Some(region) => counts[region.index()] += 1,
                None => outside += 1,
            }
        }
        if outside > 0 {
            tracing::debug!(outside, total, "Points outside viewport excluded from regions");
        }

        let regions: Vec<RegionStats> = Region::ALL
            .iter()
            .map(|&region| RegionStats {
                region,
                count: counts[region.index()],
                percentage: percent(counts[region.index()], total),
            })
            .collect();

        let hottest = regions.iter().fold(
            RegionStats {
                region: Region::MiddleCenter,
                count: 0,
                percentage: 0,
            },
            |best, r| if r.count > best.count { *r } else { best },
        );
        let coldest = regions
            .iter()
            .skip(1)
            .fold(regions[0], |best, r| if r.count < best.count { *r } else { best });

        let sum = |set: &[Region]| set.iter().map(|r| counts[r.index()]).sum::<usize>();
        let quadrant_share = |q: Quadrant| percent(sum(&q.regions()), total);
        let quadrants = QuadrantShares {
            top_left: quadrant_share(Quadrant::TopLeft),
            top_right: quadrant_share(Quadrant::TopRight),
            bottom_left: quadrant_share(Quadrant::BottomLeft),
            bottom_right: quadrant_share(Quadrant::BottomRight),
        };

        use Region::*;
        let top_bottom = TopBottom {
            top: percent(
                sum(&[TopLeft, TopCenter, TopRight, MiddleLeft, MiddleCenter, MiddleRight]),
                total,
            ),
            bottom: percent(sum(&[BottomLeft, BottomCenter, BottomRight]), total),
        };
        let left_right = LeftRight {
            left: percent(sum(&[TopLeft, MiddleLeft, BottomLeft]), total),
            right: percent(sum(&[TopRight, MiddleRight, BottomRight]), total),
        };
        let center = percent(counts[MiddleCenter.index()], total);
        let center_periphery = CenterPeriphery {
            center,
            periphery: 100u32.saturating_sub(center),
        };

        let hotspots = self.hotspots(points, total);

        Some(RegionBreakdown {
            total_points: total,
            regions,
            hottest,
            coldest,
            quadrants,
            top_bottom,
            left_right,
            center_periphery,
            hotspots,
        })
    }

    /// Top cells of the coarse hotspot grid. Ties keep first-seen order.
    pub fn hotspots(&self, points: &[Point2D], total: usize) -> Vec<Hotspot> {
        let cell = self.config.hotspot_cell;
        if !(cell.is_finite() && cell > 0.0) {
            return Vec::new();
        }

        let mut index: HashMap<(i64, i64), usize> = HashMap::new();
        let mut cells: Vec<((i64, i64), usize)> = Vec::new();
        for point in points.iter().filter(|p| p.x.is_finite() && p.y.is_finite()) {
            let key = (
                (point.x / cell).floor() as i64,
                (point.y / cell).floor() as i64,
            );
            match index.get(&key) {
                Some(&i) => cells[i].1 += 1,
                None => {
                    index.insert(key, cells.len());
                    cells.push((key, 1));
                }
            }
        }

        cells.sort_by(|a, b| b.1.cmp(&a.1));
        cells
            .into_iter()
            .take(self.config.hotspot_count)
            .map(|((cx, cy), count)| Hotspot {
                x: cx as f64 * cell,
                y: cy as f64 * cell,
                count,
                percentage: percent(count, total),
            })
            .collect()
    }
}

/// Column/row index of `v` along an axis of length `extent`, or `None`
/// outside `[0, extent]`.
fn grid_index(v: f64, extent: f64) -> Option<usize> {
    if !(v >= 0.0 && v <= extent) {
        return None;
    }
    let step = extent / 3.0;
    if v < step {
        Some(0)
    } else if v < step * 2.0 {
        Some(1)
    } else {
        Some(2)
    }
}
