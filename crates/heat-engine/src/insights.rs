//! Structured attention insights derived from a region breakdown.

use serde::{Deserialize, Serialize};

use crate::regions::{Hotspot, Quadrant, Region, RegionBreakdown, RegionStats};

/// Hottest region must hold more than this share of points to be called out.
pub const PRIMARY_HOTSPOT_SHARE: f64 = 0.15;
/// Dominant quadrant threshold, in percent.
pub const DOMINANT_QUADRANT_PCT: u32 = 30;
/// Center focus threshold, in percent.
pub const CENTER_FOCUS_PCT: u32 = 40;
/// Top-heavy threshold, in percent.
pub const TOP_HEAVY_PCT: u32 = 60;
/// Minimum left/right difference (percentage points) for a dominance note.
pub const SIDE_DOMINANCE_SPLIT: u32 = 15;
/// Top hotspot threshold, in percent.
pub const HOTSPOT_PCT: u32 = 5;
/// Regions below this share of points get a low-engagement warning.
pub const LOW_ENGAGEMENT_SHARE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Primary,
    Pattern,
    Warning,
}

/// Machine-readable payload backing an insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InsightData {
    Region {
        region: Region,
        percentage: u32,
        count: usize,
    },
    Distribution {
        regions: Vec<RegionStats>,
    },
    Quadrant {
        quadrant: Quadrant,
        percentage: u32,
    },
    CenterPeriphery {
        center: u32,
        periphery: u32,
    },
    TopBottom {
        top: u32,
        bottom: u32,
    },
    LeftRight {
        left: u32,
        right: u32,
    },
    Hotspots {
        hotspots: Vec<Hotspot>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub recommendation: String,
    pub data: InsightData,
}

/// Result of a full region analysis: numbers, insights, and a summary line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub total_points: usize,
    pub breakdown: RegionBreakdown,
    pub insights: Vec<Insight>,
    pub summary: String,
}

impl AnalysisReport {
    pub fn from_breakdown(breakdown: RegionBreakdown) -> Self {
        let insights = build_insights(&breakdown);
        let (quadrant, quadrant_pct) = breakdown.quadrants.dominant();
        let summary = format!(
            "Analyzed {} gaze points. Primary hotspot: {} ({}%). Top region: {} ({}%).",
            breakdown.total_points,
            breakdown.hottest.region.label(),
            breakdown.hottest.percentage,
            quadrant.label(),
            quadrant_pct,
        );

        Self {
            total_points: breakdown.total_points,
            breakdown,
            insights,
            summary,
        }
    }

    /// Insights of one kind, in emission order.
    pub fn insights_of(&self, kind: InsightKind) -> impl Iterator<Item = &Insight> {
        self.insights.iter().filter(move |i| i.kind == kind)
    }

    pub fn has_insight(&self, title: &str) -> bool {
        self.insights.iter().any(|i| i.title == title)
    }
}

/// Generate insights in a fixed order: primary hotspot, distribution,
/// quadrant, center, top/bottom, left/right, coordinates, warnings.
pub fn build_insights(b: &RegionBreakdown) -> Vec<Insight> {
    let total = b.total_points as f64;
    let mut insights = Vec::new();

    if b.hottest.count as f64 > total * PRIMARY_HOTSPOT_SHARE {
        insights.push(Insight {
            kind: InsightKind::Primary,
            title: "Primary Attention Hotspot".to_string(),
            description: format!(
                "{}% of gaze time spent in {} region ({} points).",
                b.hottest.percentage,
                b.hottest.region.label(),
                b.hottest.count
            ),
            recommendation: "This is your highest engagement area. Place critical content, CTAs, or key information here.".to_string(),
            data: InsightData::Region {
                region: b.hottest.region,
                percentage: b.hottest.percentage,
                count: b.hottest.count,
            },
        });
    }

    let top_regions = b
        .ranked()
        .iter()
        .take(3)
        .map(|r| format!("{} ({}%)", r.region.label(), r.percentage))
        .collect::<Vec<_>>()
        .join(", ");
    insights.push(Insight {
        kind: InsightKind::Pattern,
        title: "Screen Region Distribution".to_string(),
        description: format!("Top regions: {top_regions}"),
        recommendation:
            "Use this distribution to optimize content placement across screen regions."
                .to_string(),
        data: InsightData::Distribution {
            regions: b.regions.clone(),
        },
    });

    let (quadrant, quadrant_pct) = b.quadrants.dominant();
    if quadrant_pct > DOMINANT_QUADRANT_PCT {
        insights.push(Insight {
            kind: InsightKind::Pattern,
            title: "Dominant Quadrant".to_string(),
            description: format!(
                "{quadrant_pct}% of attention in {} quadrant.",
                quadrant.label()
            ),
            recommendation: "Users are primarily focused in this area. Consider this when designing layout hierarchy.".to_string(),
            data: InsightData::Quadrant {
                quadrant,
                percentage: quadrant_pct,
            },
        });
    }

    let cp = b.center_periphery;
    if cp.center > CENTER_FOCUS_PCT {
        insights.push(Insight {
            kind: InsightKind::Pattern,
            title: "Center-Focused Pattern".to_string(),
            description: format!(
                "{}% center, {}% periphery. Users follow natural reading patterns.",
                cp.center, cp.periphery
            ),
            recommendation: "Center content receives most attention. Place primary information in the center region.".to_string(),
            data: InsightData::CenterPeriphery {
                center: cp.center,
                periphery: cp.periphery,
            },
        });
    }

    let tb = b.top_bottom;
    if tb.top > TOP_HEAVY_PCT {
        insights.push(Insight {
            kind: InsightKind::Pattern,
            title: "Top-Heavy Attention".to_string(),
            description: format!("{}% top half, {}% bottom half.", tb.top, tb.bottom),
            recommendation: "Users scan top-to-bottom. Place navigation and primary content in the upper section.".to_string(),
            data: InsightData::TopBottom {
                top: tb.top,
                bottom: tb.bottom,
            },
        });
    }

    let lr = b.left_right;
    if lr.left.abs_diff(lr.right) > SIDE_DOMINANCE_SPLIT {
        let (dominant, dominant_pct, other, other_pct) = if lr.left > lr.right {
            ("Left", lr.left, "right", lr.right)
        } else {
            ("Right", lr.right, "left", lr.left)
        };
        insights.push(Insight {
            kind: InsightKind::Pattern,
            title: format!("{dominant} Side Dominance"),
            description: format!(
                "{dominant_pct}% {} side, {other_pct}% {other} side.",
                dominant.to_lowercase()
            ),
            recommendation: format!(
                "Users favor the {} side. Consider this for content layout and navigation.",
                dominant.to_lowercase()
            ),
            data: InsightData::LeftRight {
                left: lr.left,
                right: lr.right,
            },
        });
    }

    if let Some(top) = b.hotspots.first() {
        if top.percentage > HOTSPOT_PCT {
            let coords = b
                .hotspots
                .iter()
                .map(|h| format!("({}, {}) - {}%", h.x, h.y, h.percentage))
                .collect::<Vec<_>>()
                .join(", ");
            insights.push(Insight {
                kind: InsightKind::Primary,
                title: "Top Gaze Hotspots".to_string(),
                description: format!("Most viewed coordinates: {coords}"),
                recommendation: "These specific coordinates receive the most attention. Consider placing important elements near these points.".to_string(),
                data: InsightData::Hotspots {
                    hotspots: b.hotspots.clone(),
                },
            });
        }
    }

    for stats in b
        .regions
        .iter()
        .filter(|r| (r.count as f64) < total * LOW_ENGAGEMENT_SHARE)
    {
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: "Low Engagement Area".to_string(),
            description: format!(
                "{} region: {}% attention ({} points).",
                stats.region.label(),
                stats.percentage,
                stats.count
            ),
            recommendation: "This area receives minimal attention. Consider repositioning important content or improving visual hierarchy.".to_string(),
            data: InsightData::Region {
                region: stats.region,
                percentage: stats.percentage,
                count: stats.count,
            },
        });
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::RegionAnalyzer;
    use gazemap_gaze_model::{Point2D, ViewportSize};

    fn report(points: &[Point2D], w: f64, h: f64) -> AnalysisReport {
        RegionAnalyzer::with_defaults()
            .analyze(points, ViewportSize::new(w, h))
            .unwrap()
    }

    #[test]
    fn test_uniform_regions_have_no_primary_hotspot() {
        let points: Vec<Point2D> = (0..3)
            .flat_map(|row| (0..3).map(move |col| Point2D::new(150.0 + col as f64 * 300.0, 150.0 + row as f64 * 300.0)))
            .collect();
        let report = report(&points, 900.0, 900.0);

        for stats in &report.breakdown.regions {
            assert!(stats.percentage == 11 || stats.percentage == 12);
        }
        assert!(!report.has_insight("Primary Attention Hotspot"));
        assert!(report.has_insight("Screen Region Distribution"));
        assert!(report.has_insight("Dominant Quadrant"));
        assert!(report.has_insight("Top-Heavy Attention"));
        assert!(report.has_insight("Top Gaze Hotspots"));
        assert!(!report.has_insight("Center-Focused Pattern"));
        assert_eq!(report.insights_of(InsightKind::Warning).count(), 0);
        assert_eq!(
            report.summary,
            "Analyzed 9 gaze points. Primary hotspot: Top Left (11%). Top region: Top-Left (44%)."
        );
    }

    #[test]
    fn test_center_stare_triggers_center_and_primary() {
        let points = vec![Point2D::new(450.0, 450.0); 20];
        let report = report(&points, 900.0, 900.0);

        let primary = report.insights_of(InsightKind::Primary).next().unwrap();
        assert_eq!(primary.title, "Primary Attention Hotspot");
        assert_eq!(
            primary.description,
            "100% of gaze time spent in Middle Center region (20 points)."
        );
        assert!(report.has_insight("Center-Focused Pattern"));
        // every region except the center is under 5%
        assert_eq!(report.insights_of(InsightKind::Warning).count(), 8);
    }

    #[test]
    fn test_left_dominance_reports_both_sides() {
        let mut points = vec![Point2D::new(100.0, 100.0); 8];
        points.extend(vec![Point2D::new(800.0, 100.0); 2]);
        let report = report(&points, 900.0, 900.0);

        let side = report
            .insights
            .iter()
            .find(|i| i.title == "Left Side Dominance")
            .unwrap();
        assert_eq!(side.description, "80% left side, 20% right side.");
        assert_eq!(side.data, InsightData::LeftRight { left: 80, right: 20 });
    }

    #[test]
    fn test_insight_order_is_stable() {
        let points = vec![Point2D::new(450.0, 450.0); 20];
        let report = report(&points, 900.0, 900.0);
        let titles: Vec<&str> = report.insights.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles[0], "Primary Attention Hotspot");
        assert_eq!(titles[1], "Screen Region Distribution");
        assert_eq!(titles[2], "Dominant Quadrant");
        assert_eq!(titles[3], "Center-Focused Pattern");
        assert_eq!(titles[4], "Top-Heavy Attention");
        assert_eq!(titles[5], "Top Gaze Hotspots");
        assert_eq!(titles[6], "Low Engagement Area");
    }

    #[test]
    fn test_report_serializes() {
        let report = report(&[Point2D::new(10.0, 10.0)], 900.0, 900.0);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_points"], 1);
        assert_eq!(json["insights"][0]["kind"], "primary");
        assert_eq!(json["insights"][0]["data"]["type"], "region");
        assert_eq!(json["insights"][0]["data"]["region"], "top_left");
    }
}
