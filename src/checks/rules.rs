//! Rule conformance checks.
//!
//! Each rule is a plain function over a [`ModelIndex`].
//! [`evaluate_rules`] builds the index once, runs the registry in order and
//! folds every rule into a [`RuleResult`], including rules that pass.

use rustc_hash::FxHashSet;
use serde::Serialize;

use super::index::ModelIndex;
use crate::interchange::{Model, ModelElement, Relationship};

/// Display name for a violating entity without a name.
pub const UNNAMED: &str = "(unnamed)";

/// Package shown when a violation cannot be placed in a package.
pub const NO_PACKAGE: &str = "—";

/// Rule identifiers.
pub mod codes {
    /// Block without ports.
    pub const BLOCK_WITHOUT_PORTS: &str = "R1";
    /// Package that contains nothing.
    pub const EMPTY_PACKAGE: &str = "R2";
    /// Element without a name.
    pub const UNNAMED_ELEMENT: &str = "R3";
    /// Name not in PascalCase.
    pub const INVALID_NAMING: &str = "R4";
    /// Element not connected to anything.
    pub const ISOLATED_ELEMENT: &str = "R5";
    /// Relationship missing an endpoint.
    pub const INVALID_CONNECTOR_END: &str = "R6";
    /// Requirement nothing satisfies.
    pub const UNSATISFIED_REQUIREMENT: &str = "R7";
}

// ============================================================================
// RESULT TYPES
// ============================================================================

/// One entity that broke a rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub id: String,
    pub name: String,
    pub package: String,
}

impl Violation {
    pub fn new(id: impl Into<String>, name: Option<&str>, package: Option<&str>) -> Self {
        fn non_blank(s: Option<&str>) -> Option<&str> {
            s.map(str::trim).filter(|s| !s.is_empty())
        }
        Self {
            id: id.into(),
            name: non_blank(name).unwrap_or(UNNAMED).to_string(),
            package: non_blank(package).unwrap_or(NO_PACKAGE).to_string(),
        }
    }

    fn of_element(element: &ModelElement) -> Self {
        Self::new(&element.id, element.name.as_deref(), Some(element.package.as_str()))
    }
}

/// Outcome of one rule.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    pub id: String,
    pub name: String,
    pub description: String,
    pub passed: bool,
    pub violation_count: usize,
    pub violations: Vec<Violation>,
}

// ============================================================================
// REGISTRY
// ============================================================================

/// A named rule check.
pub struct Rule {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub check: fn(&ModelIndex<'_>) -> Vec<Violation>,
}

/// All rules, in report order.
pub const RULES: &[Rule] = &[
    Rule {
        id: codes::BLOCK_WITHOUT_PORTS,
        name: "Blocks without ports",
        description: "Every block should expose at least one port",
        check: blocks_without_ports,
    },
    Rule {
        id: codes::EMPTY_PACKAGE,
        name: "Empty packages",
        description: "Packages should contain at least one element",
        check: empty_packages,
    },
    Rule {
        id: codes::UNNAMED_ELEMENT,
        name: "Unnamed elements",
        description: "Every element should have a name",
        check: unnamed_elements,
    },
    Rule {
        id: codes::INVALID_NAMING,
        name: "Invalid naming",
        description: "Names should be PascalCase: an uppercase letter followed by letters or digits",
        check: invalid_naming,
    },
    Rule {
        id: codes::ISOLATED_ELEMENT,
        name: "Isolated elements",
        description: "Elements should take part in at least one relationship",
        check: isolated_elements,
    },
    Rule {
        id: codes::INVALID_CONNECTOR_END,
        name: "Invalid connector ends",
        description: "Relationships need both a source and a target",
        check: invalid_connector_ends,
    },
    Rule {
        id: codes::UNSATISFIED_REQUIREMENT,
        name: "Unsatisfied requirements",
        description: "Every requirement should be satisfied by some element",
        check: unsatisfied_requirements,
    },
];

/// Run every rule against the model.
pub fn evaluate_rules(model: &Model, relationships: &[Relationship]) -> Vec<RuleResult> {
    let index = ModelIndex::build(model, relationships);
    let results: Vec<RuleResult> = RULES
        .iter()
        .map(|rule| {
            let violations = (rule.check)(&index);
            RuleResult {
                id: rule.id.to_string(),
                name: rule.name.to_string(),
                description: rule.description.to_string(),
                passed: violations.is_empty(),
                violation_count: violations.len(),
                violations,
            }
        })
        .collect();

    tracing::debug!(
        "evaluated {} rules: {} failed, {} violations",
        results.len(),
        results.iter().filter(|r| !r.passed).count(),
        results.iter().map(|r| r.violation_count).sum::<usize>()
    );
    results
}

// ============================================================================
// RULES
// ============================================================================

fn blocks_without_ports(index: &ModelIndex<'_>) -> Vec<Violation> {
    index
        .model
        .class_stats
        .iter()
        .filter(|stat| stat.ports == 0)
        .map(|stat| Violation::new(&stat.id, stat.name.as_deref(), Some(stat.package.as_str())))
        .collect()
}

fn empty_packages(index: &ModelIndex<'_>) -> Vec<Violation> {
    let model = index.model;
    let occupied: FxHashSet<&str> = model.elements.iter().map(|e| e.package.as_str()).collect();
    model
        .packages()
        .filter(|p| !occupied.contains(p.own_path().as_str()))
        .map(Violation::of_element)
        .collect()
}

fn unnamed_elements(index: &ModelIndex<'_>) -> Vec<Violation> {
    index
        .model
        .elements
        .iter()
        .filter(|e| e.trimmed_name().is_none())
        .map(Violation::of_element)
        .collect()
}

fn invalid_naming(index: &ModelIndex<'_>) -> Vec<Violation> {
    index
        .model
        .elements
        .iter()
        .filter(|e| has_invalid_name(e))
        .map(Violation::of_element)
        .collect()
}

fn isolated_elements(index: &ModelIndex<'_>) -> Vec<Violation> {
    index
        .model
        .elements
        .iter()
        .filter(|e| !index.is_endpoint(&e.id))
        .map(Violation::of_element)
        .collect()
}

fn invalid_connector_ends(index: &ModelIndex<'_>) -> Vec<Violation> {
    index
        .relationships
        .iter()
        .filter(|rel| rel.is_dangling())
        .map(|rel| {
            let label = relationship_label(rel);
            Violation::new(&rel.id, Some(label.as_str()), index.relationship_package(rel))
        })
        .collect()
}

fn unsatisfied_requirements(index: &ModelIndex<'_>) -> Vec<Violation> {
    index
        .model
        .requirements()
        .filter(|req| !index.is_satisfied(&req.id))
        .map(Violation::of_element)
        .collect()
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

/// `^[A-Z][a-zA-Z0-9]*$`, ASCII only.
pub fn is_pascal_case(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase()) && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Named, but the raw name is not PascalCase.
pub(crate) fn has_invalid_name(element: &ModelElement) -> bool {
    element.trimmed_name().is_some() && !element.name.as_deref().is_some_and(is_pascal_case)
}

fn relationship_label(rel: &Relationship) -> String {
    match rel.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => format!("{}: {} → {}", rel.kind, rel.source_name, rel.target_name),
    }
}
