//! Batch analyses over an extracted [`Model`].
//!
//! Three independent passes, each a pure function of the model and a
//! relationship list:
//!
//! - [`rules`]: pass/fail conformance rules R1–R7
//! - [`smells`]: heuristic findings S1–S15 with severities
//! - [`hotspots`]: violation totals per package
//!
//! The relationship list is an explicit input so callers can audit a
//! filtered view; [`analyze`] uses the model's own list.

pub mod config;
pub mod hotspots;
pub mod index;
pub mod rules;
pub mod similarity;
pub mod smells;

use serde::Serialize;

use crate::interchange::Model;

pub use config::{AnalysisConfig, ConfigError, SmellConfig};
pub use hotspots::{Hotspot, above_average, aggregate_hotspots};
pub use index::ModelIndex;
pub use rules::{RuleResult, Violation, evaluate_rules};
pub use smells::{Category, Severity, Smell, detect_smells, detect_smells_with};

/// All three analyses of one model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub rules: Vec<RuleResult>,
    pub smells: Vec<Smell>,
    pub hotspots: Vec<Hotspot>,
}

impl Report {
    /// Rules that failed.
    pub fn failed_rules(&self) -> impl Iterator<Item = &RuleResult> {
        self.rules.iter().filter(|r| !r.passed)
    }

    /// Total violations across all rules.
    pub fn violation_count(&self) -> usize {
        self.rules.iter().map(|r| r.violation_count).sum()
    }
}

/// Run every analysis with default thresholds.
pub fn analyze(model: &Model) -> Report {
    analyze_with(model, &AnalysisConfig::default())
}

/// Run every analysis with explicit configuration.
pub fn analyze_with(model: &Model, config: &AnalysisConfig) -> Report {
    let relationships = &model.relationships;
    Report {
        rules: evaluate_rules(model, relationships),
        smells: detect_smells_with(model, relationships, &config.smells),
        hotspots: aggregate_hotspots(model, relationships),
    }
}
