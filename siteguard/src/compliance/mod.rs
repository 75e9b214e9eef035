//! Compliance Module
//!
//! Keyword-based equipment classification and the spacing rules that turn
//! measured gaps into ok/warning/error verdicts.

pub mod equipment;
pub mod spacing_rules;

pub use equipment::*;
pub use spacing_rules::*;
