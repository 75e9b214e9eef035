//! Nearest-Neighbor Fallback
//!
//! Objects with no facing neighbour still get one distance label: the
//! closest other object by center distance.

use serde::{Deserialize, Serialize};

use crate::analyzer::spacing::SpacingMeasurement;
use crate::scene::schema::{PlacedObject, Point2};

/// Neighbours at or beyond this center distance are not labelled (m)
pub const MAX_FALLBACK_DISTANCE_M: f64 = 25.0;

/// Center-to-center pair on the ground plane. Not classified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FallbackPair {
    pub object_a: String,
    pub object_b: String,
    pub distance: f64,
    pub midpoint: Point2,
}

impl FallbackPair {
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.object_a == a && self.object_b == b) || (self.object_a == b && self.object_b == a)
    }
}

pub struct NearestNeighborFallback;

impl NearestNeighborFallback {
    pub fn find(objects: &[PlacedObject], adjacency: &[SpacingMeasurement]) -> Vec<FallbackPair> {
        let mut pairs: Vec<FallbackPair> = Vec::new();

        for (i, obj) in objects.iter().enumerate() {
            if adjacency.iter().any(|m| m.involves(&obj.id)) {
                continue;
            }

            let Some((nearest, distance)) = Self::nearest(objects, i) else {
                continue;
            };

            let already_paired = adjacency.iter().any(|m| m.connects(&obj.id, &nearest.id))
                || pairs.iter().any(|p| p.connects(&obj.id, &nearest.id));
            if already_paired {
                continue;
            }

            pairs.push(FallbackPair {
                object_a: obj.id.clone(),
                object_b: nearest.id.clone(),
                distance,
                midpoint: obj.ground_position().midpoint(&nearest.ground_position()),
            });
        }

        tracing::debug!("Fallback: {} nearest-neighbour pairs", pairs.len());
        pairs
    }

    /// Closest other object within range; first in input order wins ties.
    fn nearest(objects: &[PlacedObject], index: usize) -> Option<(&PlacedObject, f64)> {
        let origin = &objects[index];
        let mut best: Option<(&PlacedObject, f64)> = None;

        for (j, other) in objects.iter().enumerate() {
            if j == index {
                continue;
            }
            let d = origin.distance_to(other);
            if !d.is_finite() || d >= MAX_FALLBACK_DISTANCE_M {
                continue;
            }
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((other, d)),
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::spacing::SpacingAnalyzer;
    use crate::scene::schema::Extents;

    fn block(id: &str, x: f64, z: f64) -> PlacedObject {
        PlacedObject::new(id, "pdu", x, z, Extents::new(1000.0, 1000.0, 1000.0))
    }

    #[test]
    fn test_diagonal_pair_added_once() {
        let objects = vec![block("a", 0.0, 0.0), block("b", 3.0, 4.0)];
        let adjacency = SpacingAnalyzer::extract(&objects);
        assert!(adjacency.is_empty());

        let pairs = NearestNeighborFallback::find(&objects, &adjacency);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].object_a, "a");
        assert_eq!(pairs[0].object_b, "b");
        assert!((pairs[0].distance - 5.0).abs() < 1e-12);
        assert_eq!(pairs[0].midpoint, Point2::new(1.5, 2.0));
    }

    #[test]
    fn test_distance_symmetric() {
        let forward = vec![block("a", 0.0, 0.0), block("b", 6.0, 8.0)];
        let reverse = vec![block("b", 6.0, 8.0), block("a", 0.0, 0.0)];
        let f = NearestNeighborFallback::find(&forward, &[]);
        let r = NearestNeighborFallback::find(&reverse, &[]);
        assert_eq!(f[0].distance, r[0].distance);
    }

    #[test]
    fn test_covered_objects_skipped() {
        let objects = vec![
            block("a", 0.0, 0.0),
            block("b", 3.0, 0.0),  // faces a
            block("c", 10.0, 10.0), // diagonal from both
        ];
        let adjacency = SpacingAnalyzer::extract(&objects);
        assert_eq!(adjacency.len(), 1);

        let pairs = NearestNeighborFallback::find(&objects, &adjacency);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].object_a, "c");
        assert_eq!(pairs[0].object_b, "b");
    }

    #[test]
    fn test_non_finite_positions_never_nearest() {
        let objects = vec![
            block("a", 0.0, 0.0),
            block("b", 3.0, 4.0),
            block("n", f64::NAN, 0.0),
        ];
        let pairs = NearestNeighborFallback::find(&objects, &[]);

        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].connects("a", "b"));
        assert!((pairs[0].distance - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_ignored() {
        let objects = vec![block("a", 0.0, 0.0), block("b", 20.0, 15.0)];
        assert!(NearestNeighborFallback::find(&objects, &[]).is_empty());
    }

    #[test]
    fn test_degenerate_object_still_paired() {
        let objects = vec![
            PlacedObject::new("ghost", "pdu", 0.0, 0.0, Extents::new(0.0, 0.0, 0.0)),
            block("b", 2.0, 0.0),
        ];
        let pairs = NearestNeighborFallback::find(&objects, &[]);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].object_a, "ghost");
    }

    #[test]
    fn test_single_object() {
        assert!(NearestNeighborFallback::find(&[block("a", 0.0, 0.0)], &[]).is_empty());
    }
}
