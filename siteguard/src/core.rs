//! Core analysis entry point shared by the CLI and embedding applications.
//! Every call recomputes from the snapshot; nothing is cached between calls.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analyzer::alignment::{AlignmentAnalyzer, AlignmentGroups};
use crate::analyzer::rules::{Issue, Severity};
use crate::analyzer::spacing::{SpacingAnalyzer, SpacingAnnotations};
use crate::compliance::spacing_rules::{ComplianceStatus, SpacingRulesEngine, SpacingThresholds};
use crate::scene::loader::SnapshotLoader;
use crate::scene::schema::PlacedObject;
use crate::topology::electrical::{ElectricalTopology, LinkStatus, TopologyInference};
use crate::topology::plausibility::TopologyPlausibility;

#[derive(Debug, thiserror::Error)]
pub enum SiteGuardError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Snapshot has {count} objects, limit is {limit}")]
    TooManyObjects { count: usize, limit: usize },
}

impl From<serde_json::Error> for SiteGuardError {
    fn from(e: serde_json::Error) -> Self {
        SiteGuardError::Parse(e.to_string())
    }
}

/// Options for an analysis run. Every field has a default, so a config file
/// only needs the keys it changes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisOptions {
    pub alignment: bool,
    pub fallback: bool,
    pub topology: bool,
    /// Refuse snapshots larger than this instead of running pairwise stages
    pub max_objects: Option<usize>,
    pub thresholds: SpacingThresholds,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            alignment: true,
            fallback: true,
            topology: true,
            max_objects: None,
            thresholds: SpacingThresholds::default(),
        }
    }
}

impl AnalysisOptions {
    /// Load options from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SiteGuardError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
            .map_err(|e| SiteGuardError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(json: &str) -> Result<Self, SiteGuardError> {
        serde_json::from_str(json).map_err(|e| SiteGuardError::Config(e.to_string()))
    }
}

/// Annotations for one snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutAnalysis {
    pub object_count: usize,
    pub alignment: AlignmentGroups,
    pub spacing: SpacingAnnotations,
    pub topology: ElectricalTopology,
    pub plausibility: TopologyPlausibility,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisStats {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl LayoutAnalysis {
    /// Findings worth reporting: non-ok spacing verdicts, red electrical
    /// links and plausibility warnings.
    pub fn issues(&self) -> Vec<Issue> {
        let mut issues = Vec::new();

        for annotated in &self.spacing.adjacency {
            let severity = match annotated.verdict.status {
                ComplianceStatus::Ok => continue,
                ComplianceStatus::Warning => Severity::Warning,
                ComplianceStatus::Error => Severity::Error,
            };
            let m = &annotated.measurement;
            issues.push(
                Issue::new(
                    &annotated.verdict.rule_id,
                    severity,
                    format!(
                        "{} <-> {}: {:.2}m gap. {}",
                        m.object_a, m.object_b, m.gap_distance, annotated.verdict.description
                    ),
                    &[m.object_a.as_str(), m.object_b.as_str()],
                )
                .at(m.midpoint),
            );
        }

        for conn in &self.topology.connections {
            if conn.status != LinkStatus::Exceeded {
                continue;
            }
            issues.push(
                Issue::new(
                    conn.link_type.label(),
                    Severity::Suggestion,
                    format!(
                        "{} -> {} ({}) runs {:.2}m, above the {}m maximum",
                        conn.from,
                        conn.to,
                        conn.link_type.label(),
                        conn.distance,
                        conn.compliance_rule.max_distance
                    ),
                    &[conn.from.as_str(), conn.to.as_str()],
                )
                .with_suggestion("Move the units closer or add a distribution unit"),
            );
        }

        for warning in &self.plausibility.warnings {
            issues.push(Issue::new(
                "topology_plausibility",
                Severity::Info,
                warning.message(),
                &[warning.subject()],
            ));
        }

        issues
    }

    pub fn stats(&self) -> AnalysisStats {
        issues_to_stats(&self.issues())
    }
}

pub fn issues_to_stats(issues: &[Issue]) -> AnalysisStats {
    let mut stats = AnalysisStats::default();
    for i in issues {
        match i.severity {
            Severity::Error => stats.critical += 1,
            Severity::Warning => stats.high += 1,
            Severity::Suggestion => stats.medium += 1,
            Severity::Info => stats.low += 1,
        }
    }
    stats
}

/// Core analysis API used by the CLI and embedding applications.
pub struct SiteGuardCore;

impl SiteGuardCore {
    /// Recompute every annotation for a snapshot.
    pub fn analyze(
        objects: &[PlacedObject],
        options: &AnalysisOptions,
    ) -> Result<LayoutAnalysis, SiteGuardError> {
        if let Some(limit) = options.max_objects {
            if objects.len() > limit {
                tracing::warn!("Refusing snapshot of {} objects (limit {})", objects.len(), limit);
                return Err(SiteGuardError::TooManyObjects {
                    count: objects.len(),
                    limit,
                });
            }
        }

        let rules = SpacingRulesEngine::with_thresholds(&options.thresholds);

        let alignment = if options.alignment {
            AlignmentAnalyzer::analyze(objects)
        } else {
            AlignmentGroups::default()
        };
        let spacing = SpacingAnalyzer::annotate(objects, &rules, options.fallback);
        let topology = if options.topology {
            TopologyInference::infer(objects)
        } else {
            ElectricalTopology::default()
        };
        let plausibility = TopologyPlausibility::assess(&topology);

        tracing::info!(
            "Analyzed {} objects: {} gaps, {} fallback pairs, {} connections",
            objects.len(),
            spacing.adjacency.len(),
            spacing.fallback.len(),
            topology.connections.len()
        );

        Ok(LayoutAnalysis {
            object_count: objects.len(),
            alignment,
            spacing,
            topology,
            plausibility,
        })
    }

    /// Load a snapshot file and analyze it.
    pub fn analyze_file(
        path: &Path,
        options: &AnalysisOptions,
    ) -> Result<LayoutAnalysis, SiteGuardError> {
        let objects = SnapshotLoader::load(path)?;
        Self::analyze(&objects, options)
    }
}
