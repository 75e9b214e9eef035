//! Electrical Topology Inference
//!
//! Infers transformer -> distribution -> load wiring from a layout using
//! greedy nearest-neighbour assignment over center distances:
//!
//! 1. Each source links to its nearest distribution unit (if under 20m).
//! 2. Each distribution unit feeds its two nearest loads, however far.
//! 3. Sources left without a distribution unit feed their two nearest loads.
//!
//! Each search is independent, so several sources may pick the same
//! distribution unit. The assignment is never revisited; see
//! `plausibility` for flagging such layouts.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::compliance::equipment::{EquipmentClassifier, PowerRole};
use crate::scene::schema::PlacedObject;

/// Sources only link to a distribution unit closer than this (m)
pub const SOURCE_SEARCH_RADIUS_M: f64 = 20.0;

/// Loads fed by each distribution unit or unlinked source
pub const LOADS_PER_FEEDER: usize = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum LinkType {
    SourceToDistribution,
    DistributionToLoad,
    SourceToLoad,
}

impl LinkType {
    pub fn rule(&self) -> LinkRule {
        match self {
            LinkType::SourceToDistribution => LinkRule { optimal_distance: 5.0, max_distance: 8.0 },
            LinkType::DistributionToLoad => LinkRule { optimal_distance: 10.0, max_distance: 15.0 },
            LinkType::SourceToLoad => LinkRule { optimal_distance: 15.0, max_distance: 20.0 },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LinkType::SourceToDistribution => "source-to-distribution",
            LinkType::DistributionToLoad => "distribution-to-load",
            LinkType::SourceToLoad => "source-to-load",
        }
    }
}

/// Cable-length guidance for a link type (m)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinkRule {
    pub optimal_distance: f64,
    pub max_distance: f64,
}

impl LinkRule {
    pub fn status(&self, distance: f64) -> LinkStatus {
        if distance <= self.optimal_distance {
            LinkStatus::Optimal
        } else if distance <= self.max_distance {
            LinkStatus::Acceptable
        } else {
            LinkStatus::Exceeded
        }
    }
}

/// Presentation colour of a link: green, amber, red.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Optimal,
    Acceptable,
    Exceeded,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElectricalConnection {
    pub from: String,
    pub to: String,
    pub link_type: LinkType,
    pub distance: f64,
    pub compliance_rule: LinkRule,
    pub status: LinkStatus,
}

impl ElectricalConnection {
    fn new(from: &PlacedObject, to: &PlacedObject, link_type: LinkType, distance: f64) -> Self {
        let compliance_rule = link_type.rule();
        Self {
            from: from.id.clone(),
            to: to.id.clone(),
            link_type,
            distance,
            compliance_rule,
            status: compliance_rule.status(distance),
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == LinkStatus::Optimal
    }

    pub fn is_acceptable(&self) -> bool {
        self.status != LinkStatus::Exceeded
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ElectricalTopology {
    pub connections: Vec<ElectricalConnection>,
}

impl ElectricalTopology {
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn from_object<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a ElectricalConnection> {
        self.connections.iter().filter(move |c| c.from == id)
    }

    pub fn to_object<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a ElectricalConnection> {
        self.connections.iter().filter(move |c| c.to == id)
    }

    pub fn of_type(&self, link_type: LinkType) -> impl Iterator<Item = &ElectricalConnection> {
        self.connections.iter().filter(move |c| c.link_type == link_type)
    }

    /// Directed graph of the inferred wiring, one node per connected object.
    pub fn to_graph(&self) -> TopologyGraph {
        let mut graph = DiGraph::new();
        let mut nodes: HashMap<String, NodeIndex> = HashMap::new();

        for conn in &self.connections {
            let from = *nodes
                .entry(conn.from.clone())
                .or_insert_with(|| graph.add_node(conn.from.clone()));
            let to = *nodes
                .entry(conn.to.clone())
                .or_insert_with(|| graph.add_node(conn.to.clone()));
            graph.add_edge(from, to, conn.clone());
        }

        TopologyGraph { graph, nodes }
    }
}

pub struct TopologyGraph {
    pub graph: DiGraph<String, ElectricalConnection>,
    nodes: HashMap<String, NodeIndex>,
}

impl TopologyGraph {
    pub fn node(&self, id: &str) -> Option<NodeIndex> {
        self.nodes.get(id).copied()
    }

    /// Every object fed directly or indirectly by `id`, in BFS order.
    pub fn downstream_of(&self, id: &str) -> Vec<String> {
        let Some(start) = self.node(id) else {
            return Vec::new();
        };
        let mut bfs = Bfs::new(&self.graph, start);
        let mut result = Vec::new();
        while let Some(nx) = bfs.next(&self.graph) {
            if nx != start {
                result.push(self.graph[nx].clone());
            }
        }
        result
    }
}

pub struct TopologyInference;

impl TopologyInference {
    pub fn infer(objects: &[PlacedObject]) -> ElectricalTopology {
        let mut sources = Vec::new();
        let mut distributions = Vec::new();
        let mut loads = Vec::new();

        for obj in objects {
            match EquipmentClassifier::power_role(obj) {
                Some(PowerRole::Source) => sources.push(obj),
                Some(PowerRole::Distribution) => distributions.push(obj),
                Some(PowerRole::Load) => loads.push(obj),
                None => {}
            }
        }

        let mut connections = Vec::new();
        let mut unlinked_sources = Vec::new();

        for source in &sources {
            match Self::nearest(source, &distributions) {
                Some((dist_unit, d)) if d < SOURCE_SEARCH_RADIUS_M => {
                    connections.push(ElectricalConnection::new(
                        source,
                        dist_unit,
                        LinkType::SourceToDistribution,
                        d,
                    ));
                }
                _ => unlinked_sources.push(*source),
            }
        }

        for dist_unit in &distributions {
            for (load, d) in Self::nearest_n(dist_unit, &loads, LOADS_PER_FEEDER) {
                connections.push(ElectricalConnection::new(
                    dist_unit,
                    load,
                    LinkType::DistributionToLoad,
                    d,
                ));
            }
        }

        for source in &unlinked_sources {
            for (load, d) in Self::nearest_n(source, &loads, LOADS_PER_FEEDER) {
                connections.push(ElectricalConnection::new(source, load, LinkType::SourceToLoad, d));
            }
        }

        tracing::debug!(
            "Topology: {} sources, {} distribution units, {} loads -> {} connections",
            sources.len(),
            distributions.len(),
            loads.len(),
            connections.len()
        );

        ElectricalTopology { connections }
    }

    /// Closest candidate; the earliest wins ties.
    fn nearest<'a>(
        origin: &PlacedObject,
        candidates: &[&'a PlacedObject],
    ) -> Option<(&'a PlacedObject, f64)> {
        let mut best: Option<(&'a PlacedObject, f64)> = None;
        for candidate in candidates {
            let d = origin.distance_to(candidate);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((*candidate, d)),
            }
        }
        best
    }

    fn nearest_n<'a>(
        origin: &PlacedObject,
        candidates: &[&'a PlacedObject],
        n: usize,
    ) -> Vec<(&'a PlacedObject, f64)> {
        let mut ranked: Vec<(&'a PlacedObject, f64)> = candidates
            .iter()
            .map(|c| (*c, origin.distance_to(c)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked.truncate(n);
        ranked
    }
}
