//! Heuristic model smells.
//!
//! Fifteen independent checks, each appending zero or more [`Smell`]s. They
//! are heuristics: some compare names textually rather than following
//! references, and every one treats a missing optional field as "no match"
//! instead of failing.
//!
//! | Id  | Category     | Check                                   |
//! |-----|--------------|-----------------------------------------|
//! | S1  | Structure    | Deep nesting                            |
//! | S2  | Structure    | Large package                           |
//! | S3  | Structure    | Massive block                           |
//! | S4  | Redundancy   | Duplicate names                         |
//! | S5  | Naming       | Similar names                           |
//! | S6  | Traceability | Unreferenced requirement                |
//! | S7  | Relations    | Dead connector                          |
//! | S8  | Consistency  | Empty diagram                           |
//! | S9  | Structure    | Overloaded diagram type                 |
//! | S10 | Naming       | Long name                               |
//! | S11 | Structure    | Depth imbalance                         |
//! | S12 | Redundancy   | Redundant relation                      |
//! | S13 | Relations    | Unused port                             |
//! | S14 | Traceability | Requirement without verification        |
//! | S15 | Consistency  | Element without stereotype              |

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use super::config::SmellConfig;
use super::index::ModelIndex;
use super::similarity::name_similarity;
use crate::interchange::{Model, ModelElement, Relationship};

// ============================================================================
// TYPES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Structure,
    Naming,
    Traceability,
    Relations,
    Redundancy,
    Consistency,
}

/// One smell finding.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Smell {
    /// Check id, `S1` to `S15`.
    pub id: String,
    pub category: Category,
    pub name: String,
    pub description: String,
    pub severity: Severity,
    /// Id of the offending entity, when the finding is about one.
    pub element: Option<String>,
    pub package: Option<String>,
}

impl Smell {
    fn new(check: &Check, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            id: check.id.to_string(),
            category: check.category,
            name: check.name.to_string(),
            description: description.into(),
            severity,
            element: None,
            package: None,
        }
    }

    fn on(mut self, element: &ModelElement) -> Self {
        self.element = Some(element.id.clone());
        self.package = Some(element.package.clone());
        self
    }

    fn at(mut self, element: Option<&str>, package: Option<&str>) -> Self {
        self.element = element.map(String::from);
        self.package = package.map(String::from);
        self
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Inputs shared by every check.
struct Scope<'a> {
    model: &'a Model,
    relationships: &'a [Relationship],
    index: ModelIndex<'a>,
    config: &'a SmellConfig,
}

struct Check {
    id: &'static str,
    name: &'static str,
    category: Category,
    run: fn(&Check, &Scope<'_>, &mut Vec<Smell>),
}

const CHECKS: &[Check] = &[
    Check { id: "S1", name: "Deep nesting", category: Category::Structure, run: deep_nesting },
    Check { id: "S2", name: "Large package", category: Category::Structure, run: large_package },
    Check { id: "S3", name: "Massive block", category: Category::Structure, run: massive_block },
    Check { id: "S4", name: "Duplicate names", category: Category::Redundancy, run: duplicate_names },
    Check { id: "S5", name: "Similar names", category: Category::Naming, run: similar_names },
    Check {
        id: "S6",
        name: "Unreferenced requirement",
        category: Category::Traceability,
        run: unreferenced_requirement,
    },
    Check { id: "S7", name: "Dead connector", category: Category::Relations, run: dead_connector },
    Check { id: "S8", name: "Empty diagram", category: Category::Consistency, run: empty_diagram },
    Check {
        id: "S9",
        name: "Overloaded diagram type",
        category: Category::Structure,
        run: overloaded_diagram_type,
    },
    Check { id: "S10", name: "Long name", category: Category::Naming, run: long_name },
    Check { id: "S11", name: "Depth imbalance", category: Category::Structure, run: depth_imbalance },
    Check {
        id: "S12",
        name: "Redundant relation",
        category: Category::Redundancy,
        run: redundant_relation,
    },
    Check { id: "S13", name: "Unused port", category: Category::Relations, run: unused_port },
    Check {
        id: "S14",
        name: "Requirement without verification",
        category: Category::Traceability,
        run: unverified_requirement,
    },
    Check {
        id: "S15",
        name: "Element without stereotype",
        category: Category::Consistency,
        run: missing_stereotype,
    },
];

/// Run every smell check with default thresholds.
pub fn detect_smells(model: &Model, relationships: &[Relationship]) -> Vec<Smell> {
    detect_smells_with(model, relationships, &SmellConfig::default())
}

/// Run every smell check with explicit thresholds.
pub fn detect_smells_with(
    model: &Model,
    relationships: &[Relationship],
    config: &SmellConfig,
) -> Vec<Smell> {
    let scope = Scope {
        model,
        relationships,
        index: ModelIndex::build(model, relationships),
        config,
    };
    let mut smells = Vec::new();
    for check in CHECKS {
        let before = smells.len();
        (check.run)(check, &scope, &mut smells);
        if smells.len() > before {
            tracing::trace!("{} ({}) found {}", check.id, check.name, smells.len() - before);
        }
    }
    tracing::debug!("detected {} smells", smells.len());
    smells
}

// ============================================================================
// STRUCTURE
// ============================================================================

fn deep_nesting(check: &Check, scope: &Scope<'_>, out: &mut Vec<Smell>) {
    let config = scope.config;
    for element in scope.model.elements.iter().filter(|e| e.depth > config.deep_nesting) {
        let severity = if element.depth > config.deep_nesting_high {
            Severity::High
        } else {
            Severity::Medium
        };
        out.push(
            Smell::new(
                check,
                severity,
                format!("{} is nested {} levels deep", display(element), element.depth),
            )
            .on(element),
        );
    }
}

fn large_package(check: &Check, scope: &Scope<'_>, out: &mut Vec<Smell>) {
    let config = scope.config;
    let mut sizes: IndexMap<&str, usize> = IndexMap::new();
    for element in &scope.model.elements {
        *sizes.entry(element.package.as_str()).or_insert(0) += 1;
    }
    let mut owners: FxHashMap<String, &str> = FxHashMap::default();
    for package in scope.model.packages() {
        owners.entry(package.own_path()).or_insert(package.id.as_str());
    }
    for (path, size) in sizes.into_iter().filter(|(_, n)| *n > config.large_package) {
        let severity = if size > config.large_package_high {
            Severity::High
        } else {
            Severity::Medium
        };
        let owner = owners.get(path).copied();
        out.push(
            Smell::new(check, severity, format!("package {path} contains {size} elements"))
                .at(owner, Some(path)),
        );
    }
}

fn massive_block(check: &Check, scope: &Scope<'_>, out: &mut Vec<Smell>) {
    let config = scope.config;
    for stat in &scope.model.class_stats {
        if stat.ports <= config.massive_block_ports
            && stat.attributes <= config.massive_block_attributes
        {
            continue;
        }
        let severity = if stat.ports > config.massive_block_ports_high
            || stat.attributes > config.massive_block_attributes_high
        {
            Severity::High
        } else {
            Severity::Medium
        };
        let name = stat.name.as_deref().unwrap_or(&stat.id);
        out.push(
            Smell::new(
                check,
                severity,
                format!("{name} has {} ports and {} attributes", stat.ports, stat.attributes),
            )
            .at(Some(stat.id.as_str()), Some(stat.package.as_str())),
        );
    }
}

fn overloaded_diagram_type(check: &Check, scope: &Scope<'_>, out: &mut Vec<Smell>) {
    let mut by_type: IndexMap<String, usize> = IndexMap::new();
    for diagram in &scope.model.diagrams {
        if let Some(kind) = clean_diagram_type(&diagram.diagram_type) {
            *by_type.entry(kind).or_insert(0) += 1;
        }
    }
    for (kind, count) in by_type {
        if count > scope.config.overloaded_diagram_type {
            out.push(Smell::new(
                check,
                Severity::Low,
                format!("{count} diagrams share the type {kind}"),
            ));
        }
    }
}

fn depth_imbalance(check: &Check, scope: &Scope<'_>, out: &mut Vec<Smell>) {
    let elements = &scope.model.elements;
    if elements.is_empty() {
        return;
    }
    let mean = elements.iter().map(|e| e.depth as f64).sum::<f64>() / elements.len() as f64;
    let limit = mean * scope.config.depth_imbalance_factor;
    let deep = elements.iter().filter(|e| e.depth as f64 > limit).count();
    if mean > 0.0 && deep > 0 {
        out.push(Smell::new(
            check,
            Severity::Low,
            format!("{deep} elements are nested deeper than {limit:.1} (mean depth {mean:.1})"),
        ));
    }
}

// ============================================================================
// NAMING AND REDUNDANCY
// ============================================================================

fn duplicate_names(check: &Check, scope: &Scope<'_>, out: &mut Vec<Smell>) {
    let mut groups: IndexMap<(&str, &str), Vec<&ModelElement>> = IndexMap::new();
    for element in &scope.model.elements {
        if let Some(name) = element.trimmed_name() {
            groups.entry((element.kind.as_str(), name)).or_default().push(element);
        }
    }
    for ((kind, name), members) in groups.into_iter().filter(|(_, m)| m.len() > 1) {
        for element in &members {
            out.push(
                Smell::new(
                    check,
                    Severity::Medium,
                    format!("{kind} name {name} is used {} times", members.len()),
                )
                .on(element),
            );
        }
    }
}

fn similar_names(check: &Check, scope: &Scope<'_>, out: &mut Vec<Smell>) {
    let config = scope.config;
    let candidates: Vec<(&ModelElement, &str, String)> = scope
        .model
        .elements
        .iter()
        .filter(|e| !e.kind.to_lowercase().contains("diagram"))
        .filter_map(|e| e.trimmed_name().map(|n| (e, n)))
        .filter(|(_, n)| !config.is_generic(n))
        .map(|(e, n)| (e, n, n.to_lowercase()))
        .collect();

    for (i, (a, a_name, a_lower)) in candidates.iter().enumerate() {
        for (b, b_name, b_lower) in &candidates[i + 1..] {
            if a.kind != b.kind || a_name == b_name {
                continue;
            }
            let similarity = name_similarity(a_lower, b_lower);
            if similarity <= config.similar_names {
                continue;
            }
            let severity = if similarity > config.similar_names_high {
                Severity::Medium
            } else {
                Severity::Low
            };
            out.push(
                Smell::new(
                    check,
                    severity,
                    format!(
                        "{a_name} and {b_name} are {:.0}% similar",
                        similarity * 100.0
                    ),
                )
                .on(a),
            );
        }
    }
}

fn long_name(check: &Check, scope: &Scope<'_>, out: &mut Vec<Smell>) {
    for element in &scope.model.elements {
        let Some(name) = element.trimmed_name() else {
            continue;
        };
        let length = name.chars().count();
        if length > scope.config.long_name {
            out.push(
                Smell::new(check, Severity::Low, format!("{name} is {length} characters long"))
                    .on(element),
            );
        }
    }
}

fn redundant_relation(check: &Check, scope: &Scope<'_>, out: &mut Vec<Smell>) {
    let mut counts: IndexMap<(&str, &str, &str), usize> = IndexMap::new();
    for rel in scope.relationships {
        if let (Some(source), Some(target)) = (rel.source.as_deref(), rel.target.as_deref()) {
            *counts.entry((source, target, rel.kind.as_str())).or_insert(0) += 1;
        }
    }
    for ((source, target, kind), count) in counts.into_iter().filter(|(_, n)| *n > 1) {
        let package = scope.index.element(source).map(|e| e.package.as_str());
        out.push(
            Smell::new(
                check,
                Severity::Low,
                format!("{kind} from {source} to {target} appears {count} times"),
            )
            .at(Some(source), package),
        );
    }
}

// ============================================================================
// TRACEABILITY AND RELATIONS
// ============================================================================

fn unreferenced_requirement(check: &Check, scope: &Scope<'_>, out: &mut Vec<Smell>) {
    for req in scope.model.requirements() {
        if !scope.index.is_endpoint(&req.id) {
            out.push(
                Smell::new(
                    check,
                    Severity::Medium,
                    format!("{} takes part in no relationship", display(req)),
                )
                .on(req),
            );
        }
    }
}

fn unverified_requirement(check: &Check, scope: &Scope<'_>, out: &mut Vec<Smell>) {
    for req in scope.model.requirements() {
        if !scope.index.is_verified(&req.id) {
            out.push(
                Smell::new(check, Severity::Low, format!("{} is never verified", display(req)))
                    .on(req),
            );
        }
    }
}

fn dead_connector(check: &Check, scope: &Scope<'_>, out: &mut Vec<Smell>) {
    let attached: FxHashSet<&str> = scope
        .model
        .elements
        .iter()
        .flat_map(|e| e.incoming.iter().chain(e.outgoing.iter()))
        .map(String::as_str)
        .collect();
    for rel in scope.relationships.iter().filter(|r| r.kind == "Connector") {
        if !attached.contains(rel.id.as_str()) {
            out.push(
                Smell::new(
                    check,
                    Severity::Medium,
                    format!("connector {} → {} joins no element", rel.source_name, rel.target_name),
                )
                .at(Some(rel.id.as_str()), None),
            );
        }
    }
}

fn unused_port(check: &Check, scope: &Scope<'_>, out: &mut Vec<Smell>) {
    for (owner, port) in scope.model.ports() {
        if scope.index.is_mentioned(&port.id) {
            continue;
        }
        let name = if port.name.trim().is_empty() { &port.id } else { &port.name };
        out.push(
            Smell::new(
                check,
                Severity::Low,
                format!("port {name} on {} is never connected", display(owner)),
            )
            .at(Some(port.id.as_str()), Some(owner.package.as_str())),
        );
    }
}

// ============================================================================
// CONSISTENCY
// ============================================================================

fn empty_diagram(check: &Check, scope: &Scope<'_>, out: &mut Vec<Smell>) {
    let config = scope.config;
    if scope.model.diagrams.is_empty() {
        return;
    }
    let packages: FxHashSet<String> = scope
        .model
        .elements
        .iter()
        .map(|e| e.package.to_lowercase())
        .collect();
    let names: Vec<String> = scope
        .model
        .elements
        .iter()
        .filter_map(|e| e.trimmed_name().map(str::to_lowercase))
        .collect();
    for diagram in &scope.model.diagrams {
        let name = diagram.name.trim();
        if name.is_empty()
            || config.is_technical_diagram(name)
            || config.is_technical_diagram(&diagram.diagram_type)
        {
            continue;
        }
        let needle = name.to_lowercase();
        let overlaps = packages.iter().any(|p| p.contains(&needle))
            || names.iter().any(|n| needle.contains(n.as_str()) || n.contains(&needle));
        if !overlaps {
            out.push(
                Smell::new(
                    check,
                    Severity::Low,
                    format!("diagram {name} does not mention any model element"),
                )
                .at(diagram.id.as_deref(), None),
            );
        }
    }
}

fn missing_stereotype(check: &Check, scope: &Scope<'_>, out: &mut Vec<Smell>) {
    for element in &scope.model.elements {
        let stereotyped = element
            .stereotype
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        if !stereotyped {
            out.push(
                Smell::new(check, Severity::Low, format!("{} has no stereotype", display(element)))
                    .on(element),
            );
        }
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn display(element: &ModelElement) -> String {
    match element.trimmed_name() {
        Some(name) => format!("{} {name}", element.kind),
        None => format!("{} {}", element.kind, element.id),
    }
}

/// Normalize a vendor diagram type: drop any namespace prefix, lowercase.
/// `Unknown` and blank types are not grouped.
fn clean_diagram_type(raw: &str) -> Option<String> {
    let local = raw.rsplit(':').next().unwrap_or(raw).trim().to_lowercase();
    (!local.is_empty() && local != "unknown").then_some(local)
}
