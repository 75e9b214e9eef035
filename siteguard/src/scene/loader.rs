//! Snapshot loading
//!
//! Reads the object snapshot exported by the scene editor. The engine itself
//! never touches the filesystem; this is the edge where callers hand it data.

use std::collections::HashSet;
use std::path::Path;

use crate::core::SiteGuardError;
use crate::scene::schema::{PlacedObject, SnapshotDocument};

pub struct SnapshotLoader;

impl SnapshotLoader {
    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Vec<PlacedObject>, SiteGuardError> {
        let content = std::fs::read_to_string(path)?;
        let objects = Self::parse_str(&content).map_err(|e| match e {
            SiteGuardError::Parse(msg) => {
                SiteGuardError::Parse(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        tracing::debug!("Loaded {} objects from {}", objects.len(), path.display());
        Ok(objects)
    }

    /// Parse a snapshot from JSON text.
    pub fn parse_str(json: &str) -> Result<Vec<PlacedObject>, SiteGuardError> {
        let document: SnapshotDocument = serde_json::from_str(json)?;
        let objects = document.into_objects();

        let mut seen = HashSet::new();
        for obj in &objects {
            if !seen.insert(obj.id.as_str()) {
                tracing::warn!("Duplicate object id in snapshot: {}", obj.id);
            }
        }

        Ok(objects)
    }
}
