//! Alignment Grouping
//!
//! Buckets row-eligible objects into columns (shared X) and rows (shared Z)
//! on a 0.5m tolerance grid, and computes the bounds of the guide-line grid.
//! Advisory only; nothing here feeds compliance.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::compliance::equipment::EquipmentClassifier;
use crate::scene::schema::PlacedObject;

/// Tolerance grid cell size (m)
pub const ALIGNMENT_GRID_M: f64 = 0.5;

/// Padding around the objects for the guide-line grid (m)
pub const GRID_MARGIN_M: f64 = 5.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Z,
}

/// Objects sharing a rounded coordinate. Axis `X` is a column, `Z` a row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlignmentGroup {
    pub axis: Axis,
    pub coordinate: f64,
    pub member_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GridBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlignmentGroups {
    pub groups: Vec<AlignmentGroup>,
    pub bounds: Option<GridBounds>,
}

impl AlignmentGroups {
    pub fn columns(&self) -> impl Iterator<Item = &AlignmentGroup> {
        self.groups.iter().filter(|g| g.axis == Axis::X)
    }

    pub fn rows(&self) -> impl Iterator<Item = &AlignmentGroup> {
        self.groups.iter().filter(|g| g.axis == Axis::Z)
    }
}

pub struct AlignmentAnalyzer;

impl AlignmentAnalyzer {
    pub fn analyze(objects: &[PlacedObject]) -> AlignmentGroups {
        let eligible: Vec<&PlacedObject> = objects
            .iter()
            .filter(|o| EquipmentClassifier::is_row_eligible(o))
            .collect();

        let mut groups = Vec::new();
        if eligible.len() >= 2 {
            groups.extend(Self::bucket(&eligible, Axis::X));
            groups.extend(Self::bucket(&eligible, Axis::Z));
        }

        tracing::debug!(
            "Alignment: {} eligible objects, {} groups",
            eligible.len(),
            groups.len()
        );

        AlignmentGroups {
            groups,
            bounds: Self::grid_bounds(objects),
        }
    }

    /// Padded min/max of all object centers; `None` when nothing is placed.
    pub fn grid_bounds(objects: &[PlacedObject]) -> Option<GridBounds> {
        let mut bounds: Option<GridBounds> = None;

        for obj in objects {
            let (x, z) = (obj.center_position.x, obj.center_position.z);
            if !x.is_finite() || !z.is_finite() {
                continue;
            }
            bounds = Some(match bounds {
                None => GridBounds { min_x: x, max_x: x, min_z: z, max_z: z },
                Some(b) => GridBounds {
                    min_x: b.min_x.min(x),
                    max_x: b.max_x.max(x),
                    min_z: b.min_z.min(z),
                    max_z: b.max_z.max(z),
                },
            });
        }

        bounds.map(|b| GridBounds {
            min_x: b.min_x - GRID_MARGIN_M,
            max_x: b.max_x + GRID_MARGIN_M,
            min_z: b.min_z - GRID_MARGIN_M,
            max_z: b.max_z + GRID_MARGIN_M,
        })
    }

    fn bucket(objects: &[&PlacedObject], axis: Axis) -> Vec<AlignmentGroup> {
        let mut cells: BTreeMap<i64, Vec<String>> = BTreeMap::new();

        for obj in objects {
            let value = match axis {
                Axis::X => obj.center_position.x,
                Axis::Z => obj.center_position.z,
            };
            if !value.is_finite() {
                continue;
            }
            let cell = (value / ALIGNMENT_GRID_M).round() as i64;
            cells.entry(cell).or_default().push(obj.id.clone());
        }

        cells
            .into_iter()
            .filter(|(_, members)| members.len() >= 2)
            .map(|(cell, member_ids)| AlignmentGroup {
                axis,
                coordinate: cell as f64 * ALIGNMENT_GRID_M,
                member_ids,
            })
            .collect()
    }
}
