//! Equipment Classification
//!
//! Classifies placed objects from their free-text category/name using
//! case-insensitive keyword matching. Upstream data is unstructured, so
//! anything unrecognized degrades to `Other` (or no power role) instead of
//! being rejected.

use serde::{Deserialize, Serialize};

use crate::scene::schema::PlacedObject;

/// Containers and their cooling/immersion variants
pub const CONTAINER_PATTERNS: &[&str] = &["container", "cooling", "antspace"];

/// Transformers for spacing purposes
pub const TRANSFORMER_PATTERNS: &[&str] = &["transformer"];

/// Ring main units look like transformers by name but are switchgear
pub const RMU_EXCLUSION: &str = "rmu";

/// Power source patterns (topology)
pub const SOURCE_PATTERNS: &[&str] = &["transformer", "transfo"];

/// Distribution unit patterns (topology)
pub const DISTRIBUTION_PATTERNS: &[&str] = &["pdu", "distribution", "skid", "switchboard"];

/// Load patterns (topology)
pub const LOAD_PATTERNS: &[&str] = &["container", "hd5", "antspace"];

/// Spacing-rule class of a category string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentClass {
    ContainerLike,
    TransformerLike,
    Other,
}

/// Inferred electrical role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PowerRole {
    Source,
    Distribution,
    Load,
}

pub struct EquipmentClassifier;

impl EquipmentClassifier {
    /// Spacing class of a single category label.
    pub fn classify_category(category: &str) -> EquipmentClass {
        let lower = category.to_lowercase();
        if Self::matches_patterns(&lower, CONTAINER_PATTERNS) {
            EquipmentClass::ContainerLike
        } else if Self::is_transformer_text(&lower) {
            EquipmentClass::TransformerLike
        } else {
            EquipmentClass::Other
        }
    }

    pub fn is_container_like(category: &str) -> bool {
        Self::matches_patterns(&category.to_lowercase(), CONTAINER_PATTERNS)
    }

    pub fn is_transformer_like(category: &str) -> bool {
        Self::is_transformer_text(&category.to_lowercase())
    }

    /// Whether the object takes part in row/column alignment.
    pub fn is_row_eligible(obj: &PlacedObject) -> bool {
        Self::matches_patterns(&obj.search_text().to_lowercase(), CONTAINER_PATTERNS)
    }

    /// Electrical role from category and name. Source beats distribution
    /// beats load when several keywords are present.
    pub fn power_role(obj: &PlacedObject) -> Option<PowerRole> {
        let text = obj.search_text().to_lowercase();

        if Self::matches_patterns(&text, SOURCE_PATTERNS) && !text.contains(RMU_EXCLUSION) {
            return Some(PowerRole::Source);
        }
        if Self::matches_patterns(&text, DISTRIBUTION_PATTERNS) {
            return Some(PowerRole::Distribution);
        }
        if Self::matches_patterns(&text, LOAD_PATTERNS) {
            return Some(PowerRole::Load);
        }
        None
    }

    fn is_transformer_text(lower: &str) -> bool {
        Self::matches_patterns(lower, TRANSFORMER_PATTERNS) && !lower.contains(RMU_EXCLUSION)
    }

    /// Check if lowercase text contains any pattern
    fn matches_patterns(text: &str, patterns: &[&str]) -> bool {
        patterns.iter().any(|p| text.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::schema::Extents;

    fn object(category: &str, name: Option<&str>) -> PlacedObject {
        let obj = PlacedObject::new("id", category, 0.0, 0.0, Extents::new(1000.0, 1000.0, 1000.0));
        match name {
            Some(n) => obj.with_name(n),
            None => obj,
        }
    }

    #[test]
    fn test_container_classification() {
        assert_eq!(EquipmentClassifier::classify_category("Container"), EquipmentClass::ContainerLike);
        assert_eq!(EquipmentClassifier::classify_category("dry-cooling"), EquipmentClass::ContainerLike);
        assert_eq!(EquipmentClassifier::classify_category("ANTSPACE HK3"), EquipmentClass::ContainerLike);
    }

    #[test]
    fn test_transformer_excludes_rmu() {
        assert_eq!(EquipmentClassifier::classify_category("Transformer"), EquipmentClass::TransformerLike);
        assert_eq!(EquipmentClassifier::classify_category("RMU transformer"), EquipmentClass::Other);
        // "transfo" only counts for topology
        assert_eq!(EquipmentClassifier::classify_category("transfo"), EquipmentClass::Other);
    }

    #[test]
    fn test_unknown_falls_back_to_other() {
        assert_eq!(EquipmentClassifier::classify_category(""), EquipmentClass::Other);
        assert_eq!(EquipmentClassifier::classify_category("generator"), EquipmentClass::Other);
    }

    #[test]
    fn test_power_roles() {
        assert_eq!(EquipmentClassifier::power_role(&object("Transfo 2MVA", None)), Some(PowerRole::Source));
        assert_eq!(EquipmentClassifier::power_role(&object("equipment", Some("Main Switchboard"))), Some(PowerRole::Distribution));
        assert_eq!(EquipmentClassifier::power_role(&object("PDU", None)), Some(PowerRole::Distribution));
        assert_eq!(EquipmentClassifier::power_role(&object("HD5 miner", None)), Some(PowerRole::Load));
        assert_eq!(EquipmentClassifier::power_role(&object("cooling", None)), None);
        assert_eq!(EquipmentClassifier::power_role(&object("transformer", Some("RMU-1"))), None);
    }

    #[test]
    fn test_source_takes_precedence() {
        let obj = object("transformer skid", None);
        assert_eq!(EquipmentClassifier::power_role(&obj), Some(PowerRole::Source));
    }

    #[test]
    fn test_row_eligibility_uses_name() {
        assert!(EquipmentClassifier::is_row_eligible(&object("module", Some("Antspace #4"))));
        assert!(!EquipmentClassifier::is_row_eligible(&object("pdu", None)));
    }
}
