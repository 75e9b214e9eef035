//! Layout analysis: alignment structure and inter-object spacing.

pub mod alignment;
pub mod nearest;
pub mod rules;
pub mod spacing;

pub use alignment::{AlignmentAnalyzer, AlignmentGroup, AlignmentGroups, Axis, GridBounds};
pub use nearest::{FallbackPair, NearestNeighborFallback};
pub use rules::{Issue, Severity};
pub use spacing::{AnnotatedSpacing, SpacingAnalyzer, SpacingAnnotations, SpacingMeasurement};
