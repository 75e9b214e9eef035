//! Ground-plane footprints
//!
//! Converts an object's center, nominal dimensions (mm) and scale into an
//! axis-aligned rectangle in meters.

use serde::{Deserialize, Serialize};

use crate::scene::schema::PlacedObject;

const MM_PER_M: f64 = 1000.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Footprint {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Footprint {
    /// Footprint of a placed object. Zero or negative dimensions collapse to
    /// a zero-width span around the center.
    pub fn of(obj: &PlacedObject) -> Self {
        let width = (obj.extents.width * obj.scale.x / MM_PER_M).max(0.0);
        let depth = (obj.extents.depth * obj.scale.z / MM_PER_M).max(0.0);
        let cx = obj.center_position.x;
        let cz = obj.center_position.z;

        Self {
            min_x: cx - width / 2.0,
            max_x: cx + width / 2.0,
            min_z: cz - depth / 2.0,
            max_z: cz + depth / 2.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f64 {
        self.max_z - self.min_z
    }

    /// True when the footprint has no area. NaN dimensions count as degenerate.
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.depth() > 0.0)
    }

    /// Projections onto the Z axis share at least one point.
    pub fn overlaps_z(&self, other: &Footprint) -> bool {
        !(self.max_z < other.min_z || other.max_z < self.min_z)
    }

    /// Projections onto the X axis share at least one point.
    pub fn overlaps_x(&self, other: &Footprint) -> bool {
        !(self.max_x < other.min_x || other.max_x < self.min_x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::schema::{Extents, Scale};

    #[test]
    fn test_footprint_in_meters() {
        let obj = PlacedObject::new("c", "container", 10.0, 0.0, Extents::container_40ft());
        let fp = Footprint::of(&obj);
        assert!((fp.min_x - 3.904).abs() < 1e-9);
        assert!((fp.max_x - 16.096).abs() < 1e-9);
        assert!((fp.depth() - 2.438).abs() < 1e-9);
        assert!(!fp.is_degenerate());
    }

    #[test]
    fn test_scale_applies_per_axis() {
        let obj = PlacedObject::new("c", "pdu", 0.0, 0.0, Extents::new(2000.0, 2000.0, 1000.0))
            .with_scale(Scale { x: 2.0, y: 5.0, z: 0.5 });
        let fp = Footprint::of(&obj);
        assert!((fp.width() - 4.0).abs() < 1e-9);
        assert!((fp.depth() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_negative_dimensions_degenerate() {
        let obj = PlacedObject::new("bad", "pdu", 1.0, 2.0, Extents::new(-500.0, 100.0, 0.0));
        let fp = Footprint::of(&obj);
        assert_eq!(fp.min_x, 1.0);
        assert_eq!(fp.max_x, 1.0);
        assert!(fp.is_degenerate());
    }

    #[test]
    fn test_touching_edges_overlap() {
        let a = Footprint { min_x: 0.0, max_x: 1.0, min_z: 0.0, max_z: 1.0 };
        let b = Footprint { min_x: 5.0, max_x: 6.0, min_z: 1.0, max_z: 2.0 };
        assert!(a.overlaps_z(&b));
        assert!(!a.overlaps_x(&b));
    }
}
