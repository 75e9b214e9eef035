//! SiteGuard - spacing compliance and electrical topology for site layouts
//!
//! Given a snapshot of placed equipment (containers, cooling units,
//! transformers, distribution cabinets), this library detects row/column
//! alignment, measures facing gaps between footprints, classifies each gap
//! against spacing rules, and infers transformer -> distribution -> load
//! wiring.
//!
//! # Quick Start
//!
//! ```
//! use siteguard::{AnalysisOptions, Extents, PlacedObject, SiteGuardCore};
//!
//! let objects = vec![
//!     PlacedObject::new("c1", "container", -10.0, 0.0, Extents::container_40ft()),
//!     PlacedObject::new("c2", "container", 10.0, 0.0, Extents::container_40ft()),
//! ];
//!
//! let analysis = SiteGuardCore::analyze(&objects, &AnalysisOptions::default()).unwrap();
//! for gap in &analysis.spacing.adjacency {
//!     println!("{:.2}m {:?}", gap.measurement.gap_distance, gap.verdict.status);
//! }
//! ```
//!
//! # Features
//!
//! - **Alignment**: rows and columns on a 0.5m tolerance grid
//! - **Spacing**: facing-gap extraction, deduplication, nearest-neighbour fallback
//! - **Compliance**: container, transformer and main-aisle spacing rules
//! - **Topology**: greedy nearest-neighbour electrical wiring with plausibility flags

pub mod analyzer;
pub mod compliance;
pub mod core;
pub mod geometry;
pub mod scene;
pub mod topology;

// Re-export main types
pub use crate::core::{
    issues_to_stats, AnalysisOptions, AnalysisStats, LayoutAnalysis, SiteGuardCore,
    SiteGuardError,
};
pub use analyzer::rules::{Issue, Severity};
pub use compliance::spacing_rules::{
    classify, ComplianceStatus, ComplianceVerdict, SpacingRulesEngine, SpacingThresholds,
};
pub use scene::schema::{Extents, PlacedObject, Point2, Position3D, Scale};
pub use scene::loader::SnapshotLoader;
pub use topology::electrical::{ElectricalConnection, ElectricalTopology, LinkStatus, LinkType};

/// Load a snapshot file (convenience wrapper).
pub fn load_snapshot(path: &std::path::Path) -> Result<Vec<PlacedObject>, SiteGuardError> {
    SnapshotLoader::load(path)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AnalysisOptions, AnalysisStats, ComplianceStatus, Issue, LayoutAnalysis, PlacedObject,
        Severity, SiteGuardCore, SiteGuardError,
    };
}
