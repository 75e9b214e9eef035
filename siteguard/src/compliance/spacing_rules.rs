//! Spacing Compliance Rules
//!
//! Maps a measured gap between two objects to a verdict using ordered rules.
//! The first rule that applies decides; the standard spacing rule is the
//! catch-all and always applies.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

use crate::compliance::equipment::EquipmentClassifier;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceStatus {
    Ok,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplianceVerdict {
    pub rule_id: String,
    pub rule: String,
    pub description: String,
    pub status: ComplianceStatus,
}

impl ComplianceVerdict {
    fn new(rule: &dyn SpacingRule, description: String, status: ComplianceStatus) -> Self {
        Self {
            rule_id: rule.id().to_string(),
            rule: rule.name().to_string(),
            description,
            status,
        }
    }
}

/// Distance thresholds in meters. Every field falls back to its default when
/// omitted from a config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpacingThresholds {
    pub main_aisle_m: f64,
    pub container_ok_m: f64,
    pub container_warning_m: f64,
    pub transformer_ok_m: f64,
    pub transformer_warning_m: f64,
    pub standard_ok_m: f64,
    pub standard_warning_m: f64,
}

impl Default for SpacingThresholds {
    fn default() -> Self {
        Self {
            main_aisle_m: 15.0,
            container_ok_m: 3.9,
            container_warning_m: 2.0,
            transformer_ok_m: 5.0,
            transformer_warning_m: 3.0,
            standard_ok_m: 3.0,
            standard_warning_m: 1.0,
        }
    }
}

pub trait SpacingRule: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    /// One-line summary of thresholds, for listings.
    fn summary(&self) -> String;
    fn applies(&self, distance: f64, category_a: &str, category_b: &str) -> bool;
    fn evaluate(&self, distance: f64) -> ComplianceVerdict;
}

/// Wide aisles satisfy vehicle and fire access whatever sits on either side.
pub struct MainAisleRule {
    min_m: f64,
}

impl SpacingRule for MainAisleRule {
    fn id(&self) -> &str {
        "main_aisle"
    }

    fn name(&self) -> &str {
        "Main aisle"
    }

    fn summary(&self) -> String {
        format!("Any pair at >= {}m is ok", self.min_m)
    }

    fn applies(&self, distance: f64, _a: &str, _b: &str) -> bool {
        distance >= self.min_m
    }

    fn evaluate(&self, _distance: f64) -> ComplianceVerdict {
        ComplianceVerdict::new(
            self,
            format!("Main aisle (>= {}m): heavy-vehicle and fire access clearance", self.min_m),
            ComplianceStatus::Ok,
        )
    }
}

pub struct ContainerSpacingRule {
    ok_m: f64,
    warning_m: f64,
}

impl SpacingRule for ContainerSpacingRule {
    fn id(&self) -> &str {
        "container_spacing"
    }

    fn name(&self) -> &str {
        "Container spacing"
    }

    fn summary(&self) -> String {
        format!(
            "Container-to-container: ok >= {}m, warning >= {}m, error below",
            self.ok_m, self.warning_m
        )
    }

    fn applies(&self, _distance: f64, a: &str, b: &str) -> bool {
        EquipmentClassifier::is_container_like(a) && EquipmentClassifier::is_container_like(b)
    }

    fn evaluate(&self, distance: f64) -> ComplianceVerdict {
        if distance >= self.ok_m {
            ComplianceVerdict::new(
                self,
                format!("Container spacing (>= {}m)", self.ok_m),
                ComplianceStatus::Ok,
            )
        } else if distance >= self.warning_m {
            ComplianceVerdict::new(
                self,
                "Reduced spacing - maintenance access limited".to_string(),
                ComplianceStatus::Warning,
            )
        } else {
            ComplianceVerdict::new(
                self,
                "Insufficient - thermal/access risk".to_string(),
                ComplianceStatus::Error,
            )
        }
    }
}

pub struct TransformerClearanceRule {
    ok_m: f64,
    warning_m: f64,
}

impl SpacingRule for TransformerClearanceRule {
    fn id(&self) -> &str {
        "transformer_clearance"
    }

    fn name(&self) -> &str {
        "Transformer clearance"
    }

    fn summary(&self) -> String {
        format!(
            "Any pair with a transformer: ok >= {}m, warning >= {}m, error below",
            self.ok_m, self.warning_m
        )
    }

    fn applies(&self, _distance: f64, a: &str, b: &str) -> bool {
        EquipmentClassifier::is_transformer_like(a) || EquipmentClassifier::is_transformer_like(b)
    }

    fn evaluate(&self, distance: f64) -> ComplianceVerdict {
        if distance >= self.ok_m {
            ComplianceVerdict::new(
                self,
                format!("Electrical safety distance (>= {}m)", self.ok_m),
                ComplianceStatus::Ok,
            )
        } else if distance >= self.warning_m {
            ComplianceVerdict::new(
                self,
                "Borderline - verify local electrical code".to_string(),
                ComplianceStatus::Warning,
            )
        } else {
            ComplianceVerdict::new(
                self,
                "Critical - increase distance".to_string(),
                ComplianceStatus::Error,
            )
        }
    }
}

pub struct StandardSpacingRule {
    ok_m: f64,
    warning_m: f64,
}

impl SpacingRule for StandardSpacingRule {
    fn id(&self) -> &str {
        "standard_spacing"
    }

    fn name(&self) -> &str {
        "Standard spacing"
    }

    fn summary(&self) -> String {
        format!(
            "Any other pair: ok >= {}m, warning >= {}m, warning below (never error)",
            self.ok_m, self.warning_m
        )
    }

    fn applies(&self, _distance: f64, _a: &str, _b: &str) -> bool {
        true
    }

    fn evaluate(&self, distance: f64) -> ComplianceVerdict {
        if distance >= self.ok_m {
            ComplianceVerdict::new(
                self,
                format!("Standard spacing (>= {}m)", self.ok_m),
                ComplianceStatus::Ok,
            )
        } else if distance >= self.warning_m {
            ComplianceVerdict::new(
                self,
                "Minimal - limited maintenance".to_string(),
                ComplianceStatus::Warning,
            )
        } else {
            // NOTE: unlike the container and transformer rules this branch
            // tops out at Warning even for very tight gaps. Kept as observed
            // in the field tool; whether it should be Error is undecided.
            ComplianceVerdict::new(
                self,
                "Very tight - confirm intentional adjacency".to_string(),
                ComplianceStatus::Warning,
            )
        }
    }
}

pub struct SpacingRulesEngine {
    rules: Vec<Arc<dyn SpacingRule>>,
    catch_all: StandardSpacingRule,
}

impl SpacingRulesEngine {
    pub fn with_thresholds(thresholds: &SpacingThresholds) -> Self {
        let mut engine = Self {
            rules: Vec::new(),
            catch_all: StandardSpacingRule {
                ok_m: thresholds.standard_ok_m,
                warning_m: thresholds.standard_warning_m,
            },
        };
        engine.add_rule(Arc::new(MainAisleRule {
            min_m: thresholds.main_aisle_m,
        }));
        engine.add_rule(Arc::new(ContainerSpacingRule {
            ok_m: thresholds.container_ok_m,
            warning_m: thresholds.container_warning_m,
        }));
        engine.add_rule(Arc::new(TransformerClearanceRule {
            ok_m: thresholds.transformer_ok_m,
            warning_m: thresholds.transformer_warning_m,
        }));
        engine
    }

    pub fn with_default_rules() -> Self {
        Self::with_thresholds(&SpacingThresholds::default())
    }

    /// Append a rule. It is consulted after the existing rules and before
    /// the standard spacing catch-all.
    pub fn add_rule(&mut self, rule: Arc<dyn SpacingRule>) {
        self.rules.push(rule);
    }

    pub fn classify(&self, distance: f64, category_a: &str, category_b: &str) -> ComplianceVerdict {
        self.rules
            .iter()
            .find(|r| r.applies(distance, category_a, category_b))
            .map(|r| r.evaluate(distance))
            .unwrap_or_else(|| self.catch_all.evaluate(distance))
    }

    /// All rules in evaluation order, catch-all last.
    pub fn rules(&self) -> Vec<&dyn SpacingRule> {
        let mut all: Vec<&dyn SpacingRule> = Vec::with_capacity(self.rules.len() + 1);
        for rule in &self.rules {
            all.push(rule.as_ref());
        }
        all.push(&self.catch_all);
        all
    }
}

impl Default for SpacingRulesEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Classify a gap with the default thresholds.
pub fn classify(distance: f64, category_a: &str, category_b: &str) -> ComplianceVerdict {
    static DEFAULT_ENGINE: OnceLock<SpacingRulesEngine> = OnceLock::new();
    DEFAULT_ENGINE
        .get_or_init(SpacingRulesEngine::with_default_rules)
        .classify(distance, category_a, category_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_boundaries() {
        assert_eq!(classify(3.9, "container", "container").status, ComplianceStatus::Ok);
        assert_eq!(classify(3.89, "container", "container").status, ComplianceStatus::Warning);
        assert_eq!(classify(2.0, "container", "cooling").status, ComplianceStatus::Warning);
        assert_eq!(classify(1.99, "container", "container").status, ComplianceStatus::Error);
    }

    #[test]
    fn test_main_aisle_overrides_category() {
        let verdict = classify(15.0, "x", "y");
        assert_eq!(verdict.status, ComplianceStatus::Ok);
        assert_eq!(verdict.rule, "Main aisle");
        assert_eq!(classify(15.0, "transformer", "container").rule, "Main aisle");
        assert_eq!(classify(14.99, "x", "y").rule, "Standard spacing");
    }

    #[test]
    fn test_transformer_rule() {
        assert_eq!(classify(5.0, "transformer", "pdu").status, ComplianceStatus::Ok);
        assert_eq!(classify(4.99, "pdu", "Transformer").status, ComplianceStatus::Warning);
        assert_eq!(classify(3.0, "transformer", "pdu").status, ComplianceStatus::Warning);
        assert_eq!(classify(2.99, "transformer", "pdu").status, ComplianceStatus::Error);
    }

    #[test]
    fn test_container_rule_wins_over_transformer() {
        // Both container-like: the container rule applies first
        let verdict = classify(2.5, "container", "cooling transformer");
        assert_eq!(verdict.rule, "Container spacing");
    }

    #[test]
    fn test_rmu_is_not_a_transformer() {
        let verdict = classify(2.0, "rmu transformer", "pdu");
        assert_eq!(verdict.rule, "Standard spacing");
        assert_eq!(verdict.status, ComplianceStatus::Warning);
    }

    #[test]
    fn test_default_branch_never_errors() {
        assert_eq!(classify(3.0, "pdu", "generator").status, ComplianceStatus::Ok);
        assert_eq!(classify(1.0, "pdu", "generator").status, ComplianceStatus::Warning);
        let tight = classify(0.21, "pdu", "generator");
        assert_eq!(tight.status, ComplianceStatus::Warning);
        assert!(tight.description.contains("Very tight"));
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = SpacingThresholds {
            container_ok_m: 5.0,
            ..SpacingThresholds::default()
        };
        let engine = SpacingRulesEngine::with_thresholds(&thresholds);
        assert_eq!(engine.classify(4.0, "container", "container").status, ComplianceStatus::Warning);
        assert_eq!(engine.classify(5.0, "container", "container").status, ComplianceStatus::Ok);
    }

    #[test]
    fn test_rules_listing_order() {
        let engine = SpacingRulesEngine::default();
        let rules = engine.rules();
        let ids: Vec<&str> = rules.iter().map(|r| r.id()).collect();
        assert_eq!(
            ids,
            vec!["main_aisle", "container_spacing", "transformer_clearance", "standard_spacing"]
        );
    }

    #[test]
    fn test_thresholds_partial_json() {
        let parsed: SpacingThresholds = serde_json::from_str(r#"{ "main_aisle_m": 12.0 }"#).unwrap();
        assert_eq!(parsed.main_aisle_m, 12.0);
        assert_eq!(parsed.container_ok_m, 3.9);
    }
}
