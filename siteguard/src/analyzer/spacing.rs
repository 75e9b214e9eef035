//! Adjacency Spacing Extraction
//!
//! Measures gaps between footprints that face each other: when two
//! footprints overlap on one axis, the gap is measured along the other.
//! Diagonally offset pairs are never measured here; see `nearest` for the
//! center-distance fallback.
//!
//! Pairwise O(n^2). Fine for the few hundred objects a site holds.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::analyzer::alignment::Axis;
use crate::analyzer::nearest::{FallbackPair, NearestNeighborFallback};
use crate::compliance::spacing_rules::{ComplianceVerdict, SpacingRulesEngine};
use crate::geometry::Footprint;
use crate::scene::schema::{PlacedObject, Point2};

/// Gaps at or below this are treated as touching (m)
pub const MIN_GAP_M: f64 = 0.2;

/// Gaps at or above this are long-range and dropped (m)
pub const MAX_GAP_M: f64 = 30.0;

/// Duplicate detection: midpoint tolerance per axis (m)
const DEDUP_MIDPOINT_TOLERANCE_M: f64 = 2.0;

/// Duplicate detection: distance and endpoint tolerance (m)
const DEDUP_DISTANCE_TOLERANCE_M: f64 = 0.5;

/// Gap between two facing footprints. `object_a` is the one on the lower
/// side of `axis`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpacingMeasurement {
    pub object_a: String,
    pub object_b: String,
    pub axis: Axis,
    pub gap_distance: f64,
    pub midpoint: Point2,
    pub start: Point2,
    pub end: Point2,
}

impl SpacingMeasurement {
    pub fn involves(&self, id: &str) -> bool {
        self.object_a == id || self.object_b == id
    }

    /// Same unordered pair of objects.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.object_a == a && self.object_b == b) || (self.object_a == b && self.object_b == a)
    }

    fn is_duplicate_of(&self, other: &SpacingMeasurement) -> bool {
        let same_midpoint = (self.midpoint.x - other.midpoint.x).abs() < DEDUP_MIDPOINT_TOLERANCE_M
            && (self.midpoint.z - other.midpoint.z).abs() < DEDUP_MIDPOINT_TOLERANCE_M
            && (self.gap_distance - other.gap_distance).abs() < DEDUP_DISTANCE_TOLERANCE_M;

        let close = |p: &Point2, q: &Point2| p.distance(q) < DEDUP_DISTANCE_TOLERANCE_M;
        let same_endpoints = (close(&self.start, &other.start) && close(&self.end, &other.end))
            || (close(&self.start, &other.end) && close(&self.end, &other.start));

        same_midpoint || same_endpoints
    }
}

/// A classified adjacency gap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnotatedSpacing {
    pub measurement: SpacingMeasurement,
    pub verdict: ComplianceVerdict,
}

/// Everything the renderer needs to draw spacing dimensions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SpacingAnnotations {
    pub adjacency: Vec<AnnotatedSpacing>,
    /// Center-distance pairs; labelled with a distance only, never classified
    pub fallback: Vec<FallbackPair>,
}

pub struct SpacingAnalyzer;

impl SpacingAnalyzer {
    /// Deduplicated adjacency gaps under `MAX_GAP_M`, shortest first.
    pub fn extract(objects: &[PlacedObject]) -> Vec<SpacingMeasurement> {
        let footprints: Vec<Footprint> = objects.iter().map(Footprint::of).collect();
        let mut raw = Vec::new();

        for i in 0..objects.len() {
            if footprints[i].is_degenerate() {
                continue;
            }
            for j in (i + 1)..objects.len() {
                if footprints[j].is_degenerate() {
                    continue;
                }
                let a = (&objects[i], &footprints[i]);
                let b = (&objects[j], &footprints[j]);

                if footprints[i].overlaps_z(&footprints[j]) {
                    raw.extend(Self::measure(a, b, Axis::X));
                }
                if footprints[i].overlaps_x(&footprints[j]) {
                    raw.extend(Self::measure(a, b, Axis::Z));
                }
            }
        }

        let found = raw.len();
        let mut measurements: Vec<SpacingMeasurement> = Self::deduplicate(raw)
            .into_iter()
            .filter(|m| m.gap_distance < MAX_GAP_M)
            .collect();
        measurements.sort_by(|a, b| a.gap_distance.total_cmp(&b.gap_distance));

        tracing::debug!(
            "Adjacency: {} raw gaps, {} after dedup and range filter",
            found,
            measurements.len()
        );
        measurements
    }

    /// Keep the first of every group of duplicates. Running it on its own
    /// output removes nothing.
    pub fn deduplicate(measurements: Vec<SpacingMeasurement>) -> Vec<SpacingMeasurement> {
        let mut kept: Vec<SpacingMeasurement> = Vec::with_capacity(measurements.len());
        for m in measurements {
            if !kept.iter().any(|k| k.is_duplicate_of(&m)) {
                kept.push(m);
            }
        }
        kept
    }

    /// Extract, classify and add fallback pairs.
    pub fn annotate(
        objects: &[PlacedObject],
        rules: &SpacingRulesEngine,
        include_fallback: bool,
    ) -> SpacingAnnotations {
        let measurements = Self::extract(objects);

        let mut by_id: HashMap<&str, &PlacedObject> = HashMap::with_capacity(objects.len());
        for obj in objects {
            by_id.entry(obj.id.as_str()).or_insert(obj);
        }

        let fallback = if include_fallback {
            NearestNeighborFallback::find(objects, &measurements)
        } else {
            Vec::new()
        };

        let adjacency = measurements
            .into_iter()
            .filter_map(|m| {
                let a = by_id.get(m.object_a.as_str())?;
                let b = by_id.get(m.object_b.as_str())?;
                let verdict = rules.classify(m.gap_distance, &a.category, &b.category);
                Some(AnnotatedSpacing { measurement: m, verdict })
            })
            .collect();

        SpacingAnnotations { adjacency, fallback }
    }

    /// Gap along `axis` between two footprints already known to overlap on
    /// the other axis.
    fn measure(
        a: (&PlacedObject, &Footprint),
        b: (&PlacedObject, &Footprint),
        axis: Axis,
    ) -> Option<SpacingMeasurement> {
        let (center_a, center_b) = match axis {
            Axis::X => (a.0.center_position.x, b.0.center_position.x),
            Axis::Z => (a.0.center_position.z, b.0.center_position.z),
        };
        let (low, high) = if center_a <= center_b { (a, b) } else { (b, a) };
        let (lo_fp, hi_fp) = (low.1, high.1);

        let gap = match axis {
            Axis::X => hi_fp.min_x - lo_fp.max_x,
            Axis::Z => hi_fp.min_z - lo_fp.max_z,
        };
        if !(gap > MIN_GAP_M) {
            return None;
        }

        let (start, end) = match axis {
            Axis::X => {
                let z = (lo_fp.min_z.max(hi_fp.min_z) + lo_fp.max_z.min(hi_fp.max_z)) / 2.0;
                (Point2::new(lo_fp.max_x, z), Point2::new(hi_fp.min_x, z))
            }
            Axis::Z => {
                let x = (lo_fp.min_x.max(hi_fp.min_x) + lo_fp.max_x.min(hi_fp.max_x)) / 2.0;
                (Point2::new(x, lo_fp.max_z), Point2::new(x, hi_fp.min_z))
            }
        };

        Some(SpacingMeasurement {
            object_a: low.0.id.clone(),
            object_b: high.0.id.clone(),
            axis,
            gap_distance: gap,
            midpoint: start.midpoint(&end),
            start,
            end,
        })
    }
}
