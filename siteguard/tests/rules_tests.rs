//! Tests for specific spacing and wiring rules

use std::sync::Arc;

use siteguard::compliance::spacing_rules::{ComplianceVerdict, SpacingRule};
use siteguard::prelude::*;
use siteguard::topology::{LinkStatus, LinkType, TopologyInference};
use siteguard::{classify, Extents, SpacingRulesEngine};

fn obj(id: &str, category: &str, x: f64, z: f64) -> PlacedObject {
    PlacedObject::new(id, category, x, z, Extents::new(2000.0, 2000.0, 2000.0))
}

#[test]
fn test_compliance_boundaries() {
    assert_eq!(classify(3.9, "container", "container").status, ComplianceStatus::Ok);
    assert_eq!(classify(3.89, "container", "container").status, ComplianceStatus::Warning);
    assert_eq!(classify(1.99, "container", "container").status, ComplianceStatus::Error);
    assert_eq!(classify(15.0, "x", "y").status, ComplianceStatus::Ok);
}

#[test]
fn test_keyword_matching_is_case_insensitive() {
    assert_eq!(classify(1.0, "CONTAINER 40ft", "Cooling Tower").status, ComplianceStatus::Error);
    assert_eq!(classify(1.0, "TRANSFORMER", "generator").status, ComplianceStatus::Error);
}

#[test]
fn test_severity_levels() {
    let objects = vec![
        PlacedObject::new("a", "container", 0.0, 0.0, Extents::container_40ft()),
        PlacedObject::new("b", "container", 13.5, 0.0, Extents::container_40ft()),
        PlacedObject::new("c", "container", 29.0, 0.0, Extents::container_40ft()),
    ];
    let analysis = SiteGuardCore::analyze(&objects, &AnalysisOptions::default()).unwrap();

    // a-b 1.308m error, b-c 3.308m warning, a-c 16.808m main aisle
    let severities: Vec<Severity> = analysis.issues().iter().map(|i| i.severity).collect();
    assert_eq!(severities, vec![Severity::Error, Severity::Warning]);
}

struct GeneratorExclusionRule;

impl SpacingRule for GeneratorExclusionRule {
    fn id(&self) -> &str {
        "generator_exclusion"
    }

    fn name(&self) -> &str {
        "Generator exclusion zone"
    }

    fn summary(&self) -> String {
        "Generators need 6m to anything".to_string()
    }

    fn applies(&self, _distance: f64, a: &str, b: &str) -> bool {
        a.to_lowercase().contains("generator") || b.to_lowercase().contains("generator")
    }

    fn evaluate(&self, distance: f64) -> ComplianceVerdict {
        // Defer to the standard rule when clear of the exclusion zone
        let mut verdict = SpacingRulesEngine::default().classify(distance, "", "");
        if distance < 6.0 {
            verdict.rule_id = self.id().to_string();
            verdict.rule = self.name().to_string();
            verdict.description = "Inside generator exclusion zone".to_string();
            verdict.status = ComplianceStatus::Error;
        }
        verdict
    }
}

#[test]
fn test_custom_rule_runs_before_catch_all() {
    let mut engine = SpacingRulesEngine::default();
    engine.add_rule(Arc::new(GeneratorExclusionRule));

    let verdict = engine.classify(4.0, "generator", "pdu");
    assert_eq!(verdict.rule_id, "generator_exclusion");
    assert_eq!(verdict.status, ComplianceStatus::Error);

    // Built-in rules still win first
    assert_eq!(engine.classify(4.0, "generator", "transformer").rule_id, "transformer_clearance");
    assert_eq!(engine.classify(20.0, "generator", "pdu").rule_id, "main_aisle");
}

#[test]
fn test_transformer_at_four_and_a_half_metres() {
    let objects = vec![obj("t", "transformer", 0.0, 0.0), obj("p", "distribution board", 0.0, 4.5)];
    let topology = TopologyInference::infer(&objects);

    assert_eq!(topology.connections.len(), 1);
    let conn = &topology.connections[0];
    assert_eq!(conn.link_type, LinkType::SourceToDistribution);
    assert_eq!(conn.distance, 4.5);
    assert_eq!(conn.status, LinkStatus::Optimal);
    assert_eq!(conn.compliance_rule.optimal_distance, 5.0);
    assert_eq!(conn.compliance_rule.max_distance, 8.0);
}

#[test]
fn test_source_picks_only_closest_distribution_unit() {
    let objects = vec![
        obj("t", "transformer", 0.0, 0.0),
        obj("far", "switchboard", 9.0, 0.0),
        obj("near", "pdu", 0.0, 6.0),
    ];
    let topology = TopologyInference::infer(&objects);
    let feeds: Vec<&str> = topology
        .of_type(LinkType::SourceToDistribution)
        .map(|c| c.to.as_str())
        .collect();
    assert_eq!(feeds, vec!["near"]);
}

#[test]
fn test_rmu_never_wired() {
    let objects = vec![
        obj("rmu", "RMU", 0.0, 0.0).with_name("Transformer RMU"),
        obj("c1", "container", 5.0, 0.0),
        obj("c2", "container", 10.0, 0.0),
    ];
    assert!(TopologyInference::infer(&objects).is_empty());
}

#[test]
fn test_issue_structure() {
    let objects = vec![
        obj("t1", "transformer", -3.0, 0.0),
        obj("t2", "transformer", 3.0, 0.0),
        obj("p", "pdu", 0.0, 0.0),
        obj("c1", "container", 0.0, 40.0),
    ];
    let analysis = SiteGuardCore::analyze(&objects, &AnalysisOptions::default()).unwrap();
    let issues = analysis.issues();

    // Shared PDU is flagged, the 38m load link is red
    assert!(issues.iter().any(|i| i.rule_id == "topology_plausibility"));
    assert!(issues
        .iter()
        .any(|i| i.rule_id == "distribution-to-load" && i.severity == Severity::Suggestion));

    for issue in &issues {
        assert!(!issue.message.is_empty(), "Issue should have message");
        assert!(!issue.rule_id.is_empty(), "Issue should have rule_id");
        assert!(!issue.objects.is_empty(), "Issue should name objects");
        if let Some(ref suggestion) = issue.suggestion {
            assert!(!suggestion.is_empty(), "Suggestion should not be empty");
        }
    }
}
