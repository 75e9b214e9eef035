//! Electrical topology inference and plausibility checks.

pub mod electrical;
pub mod plausibility;

pub use electrical::*;
pub use plausibility::{PlausibilityWarning, TopologyPlausibility};
