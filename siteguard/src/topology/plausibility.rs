//! Topology Plausibility
//!
//! The greedy assignment can wire layouts no electrician would build, e.g.
//! three transformers into one PDU. This report flags those cases without
//! changing the assignment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::topology::electrical::{ElectricalTopology, LinkType};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlausibilityWarning {
    /// More than one source feeds the same distribution unit
    SharedDistribution {
        distribution: String,
        sources: Vec<String>,
    },
    /// A load is fed from more than one upstream unit
    SharedLoad { load: String, feeders: Vec<String> },
}

impl PlausibilityWarning {
    pub fn message(&self) -> String {
        match self {
            PlausibilityWarning::SharedDistribution { distribution, sources } => format!(
                "Distribution unit {} is fed by {} sources ({})",
                distribution,
                sources.len(),
                sources.join(", ")
            ),
            PlausibilityWarning::SharedLoad { load, feeders } => format!(
                "Load {} is fed by {} upstream units ({})",
                load,
                feeders.len(),
                feeders.join(", ")
            ),
        }
    }

    pub fn subject(&self) -> &str {
        match self {
            PlausibilityWarning::SharedDistribution { distribution, .. } => distribution,
            PlausibilityWarning::SharedLoad { load, .. } => load,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TopologyPlausibility {
    pub warnings: Vec<PlausibilityWarning>,
}

impl TopologyPlausibility {
    pub fn assess(topology: &ElectricalTopology) -> Self {
        let mut sources_by_distribution: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        let mut feeders_by_load: BTreeMap<&str, Vec<String>> = BTreeMap::new();

        for conn in &topology.connections {
            match conn.link_type {
                LinkType::SourceToDistribution => sources_by_distribution
                    .entry(conn.to.as_str())
                    .or_default()
                    .push(conn.from.clone()),
                LinkType::DistributionToLoad | LinkType::SourceToLoad => feeders_by_load
                    .entry(conn.to.as_str())
                    .or_default()
                    .push(conn.from.clone()),
            }
        }

        let mut warnings = Vec::new();
        for (distribution, sources) in sources_by_distribution {
            if sources.len() > 1 {
                warnings.push(PlausibilityWarning::SharedDistribution {
                    distribution: distribution.to_string(),
                    sources,
                });
            }
        }
        for (load, feeders) in feeders_by_load {
            if feeders.len() > 1 {
                warnings.push(PlausibilityWarning::SharedLoad {
                    load: load.to_string(),
                    feeders,
                });
            }
        }

        if !warnings.is_empty() {
            tracing::debug!("Topology plausibility: {} warnings", warnings.len());
        }

        Self { warnings }
    }

    pub fn is_plausible(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::schema::{Extents, PlacedObject};
    use crate::topology::electrical::TopologyInference;

    fn obj(id: &str, category: &str, x: f64, z: f64) -> PlacedObject {
        PlacedObject::new(id, category, x, z, Extents::new(2000.0, 2000.0, 2000.0))
    }

    #[test]
    fn test_clean_layout_is_plausible() {
        let objects = vec![
            obj("t", "transformer", 0.0, 0.0),
            obj("p", "pdu", 5.0, 0.0),
            obj("c1", "container", 12.0, 0.0),
            obj("c2", "container", 12.0, 4.0),
        ];
        let report = TopologyPlausibility::assess(&TopologyInference::infer(&objects));
        assert!(report.is_plausible());
    }

    #[test]
    fn test_shared_distribution_flagged() {
        let objects = vec![
            obj("t1", "transformer", -3.0, 0.0),
            obj("t2", "transformer", 3.0, 0.0),
            obj("p", "pdu", 0.0, 0.0),
        ];
        let report = TopologyPlausibility::assess(&TopologyInference::infer(&objects));
        assert!(!report.is_plausible());
        assert_eq!(
            report.warnings,
            vec![PlausibilityWarning::SharedDistribution {
                distribution: "p".to_string(),
                sources: vec!["t1".to_string(), "t2".to_string()],
            }]
        );
        assert!(report.warnings[0].message().contains("2 sources"));
    }

    #[test]
    fn test_shared_load_flagged() {
        // Two PDUs both pick the same two containers
        let objects = vec![
            obj("p1", "pdu", 0.0, 0.0),
            obj("p2", "pdu", 0.0, 2.0),
            obj("c1", "container", 8.0, 1.0),
            obj("c2", "container", 9.0, 1.0),
        ];
        let report = TopologyPlausibility::assess(&TopologyInference::infer(&objects));
        assert_eq!(report.warnings.len(), 2);
        assert!(report
            .warnings
            .iter()
            .all(|w| matches!(w, PlausibilityWarning::SharedLoad { .. })));
        assert_eq!(report.warnings[0].subject(), "c1");
    }

    #[test]
    fn test_empty_topology() {
        assert!(TopologyPlausibility::assess(&ElectricalTopology::default()).is_plausible());
    }
}
