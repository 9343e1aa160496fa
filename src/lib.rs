//! # syster-audit
//!
//! Quality auditing for UML/SysML models exchanged as XMI.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! checks       → Rule conformance, model smells, violation hotspots
//!   ↓
//! interchange  → XMI decoding, tree walking, reference resolution, Model
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let model = syster_audit::parse(&std::fs::read_to_string("model.xmi")?)?;
//! let report = syster_audit::checks::analyze(&model);
//! for rule in report.rules.iter().filter(|r| !r.passed) {
//!     println!("{}: {} violations", rule.id, rule.violation_count);
//! }
//! ```

// ============================================================================
// MODULES (dependency order: interchange → checks)
// ============================================================================

/// XMI ingestion: decoder, walker, resolver, model extraction
pub mod interchange;

/// Batch analyses over an extracted model
pub mod checks;

// Re-export the common entry points
pub use checks::{AnalysisConfig, Report, analyze, analyze_with};
pub use interchange::{InterchangeError, Model, parse, parse_file};
