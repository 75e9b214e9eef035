use serde::{Deserialize, Serialize};

/// Equipment placed in the site layout by the scene editor.
///
/// The engine only ever reads these; ids must be unique within a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacedObject {
    pub id: String,
    pub category: String,               // "container", "transformer", "pdu", ...
    #[serde(default)]
    pub name: Option<String>,           // Free-text display name
    #[serde(alias = "position")]
    pub center_position: Position3D,    // Meters; y is vertical
    #[serde(alias = "dimensions")]
    pub extents: Extents,               // Millimeters
    #[serde(default)]
    pub scale: Scale,
}

impl PlacedObject {
    pub fn new(id: &str, category: &str, x: f64, z: f64, extents: Extents) -> Self {
        Self {
            id: id.to_string(),
            category: category.to_string(),
            name: None,
            center_position: Position3D { x, y: 0.0, z },
            extents,
            scale: Scale::default(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    /// Category and name joined for keyword matching.
    pub fn search_text(&self) -> String {
        match &self.name {
            Some(name) => format!("{} {}", self.category, name),
            None => self.category.clone(),
        }
    }

    /// Center projected onto the ground plane.
    pub fn ground_position(&self) -> Point2 {
        Point2 {
            x: self.center_position.x,
            z: self.center_position.z,
        }
    }

    /// Center-to-center distance on the ground plane.
    pub fn distance_to(&self, other: &PlacedObject) -> f64 {
        self.ground_position().distance(&other.ground_position())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position3D {
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    pub z: f64,
}

/// Nominal dimensions in millimeters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Extents {
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    pub depth: f64,
}

impl Extents {
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self { width, height, depth }
    }

    /// 40ft ISO container.
    pub fn container_40ft() -> Self {
        Self::new(12192.0, 2896.0, 2438.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0, z: 1.0 }
    }
}

/// A point on the ground plane (x, z).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub z: f64,
}

impl Point2 {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    pub fn midpoint(&self, other: &Point2) -> Point2 {
        Point2 {
            x: (self.x + other.x) / 2.0,
            z: (self.z + other.z) / 2.0,
        }
    }
}

/// Serialized snapshot: either a bare array or `{ "objects": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum SnapshotDocument {
    Bare(Vec<PlacedObject>),
    Wrapped { objects: Vec<PlacedObject> },
}

impl SnapshotDocument {
    pub(crate) fn into_objects(self) -> Vec<PlacedObject> {
        match self {
            SnapshotDocument::Bare(objects) => objects,
            SnapshotDocument::Wrapped { objects } => objects,
        }
    }
}
