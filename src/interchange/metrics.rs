//! Entity counters and the derived quality summary.

use rustc_hash::FxHashSet;
use serde::Serialize;
use serde_json::Value;

use super::model::{ClassStat, Diagram, ModelElement, Relationship};
use super::node;
use super::walk;

/// Kinds that carry ids but are plumbing rather than model content.
const AUXILIARY_KINDS: &[&str] = &[
    "Model",
    "ConnectorEnd",
    "end",
    "ownedEnd",
    "OpaqueExpression",
    "InstanceValue",
    "ElementImport",
    "PackageImport",
    "ProfileApplication",
    "Extension",
    "Slot",
    "Parameter",
    "Region",
    "Transition",
    "ControlFlow",
    "ObjectFlow",
    "InitialNode",
    "ActivityFinalNode",
    "Trigger",
];

/// Document-wide entity counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub packages: usize,
    pub classes: usize,
    pub blocks: usize,
    pub requirements: usize,
    pub ports: usize,
    pub properties: usize,
    pub associations: usize,
    /// Summed `memberEnd` references over all associations.
    pub association_ends: usize,
    pub dependencies: usize,
    pub generalizations: usize,
    pub connectors: usize,
    pub interfaces: usize,
    pub activities: usize,
    pub actions: usize,
    pub state_machines: usize,
    pub states: usize,
    pub use_cases: usize,
    pub actors: usize,
    pub constraints: usize,
    pub comments: usize,
    pub signals: usize,
    pub diagrams: usize,

    // Derived
    pub unnamed_elements: usize,
    pub estimated_blocks: usize,
    /// Id-bearing nodes whose kind is not tallied above.
    pub unknown_kinds: usize,
}

impl Metrics {
    /// Tally the whole document, then fill in the derived counters.
    pub fn compute(
        document: &Value,
        elements: &[ModelElement],
        class_stats: &[ClassStat],
        diagrams: &[Diagram],
    ) -> Self {
        let mut metrics = Self::default();

        walk::walk(Some(document), |visit| {
            if visit.id().is_none() {
                return;
            }
            let kind = visit.kind();
            // Stereotype applications only count toward stereotype-defined kinds.
            if node::is_stereotype_application(visit.node) {
                match kind {
                    "Block" => metrics.blocks += 1,
                    k if k.ends_with("Requirement") => metrics.requirements += 1,
                    _ => {}
                }
                return;
            }
            if !metrics.count(visit.tag, kind) && !is_auxiliary(kind) {
                metrics.unknown_kinds += 1;
            }
        });

        metrics.association_ends =
            walk::tally_kind(Some(document), "Association", Some("memberEnd")).items;
        metrics.diagrams = diagrams.len();
        metrics.unnamed_elements = elements
            .iter()
            .filter(|e| e.trimmed_name().is_none())
            .count();
        metrics.estimated_blocks = class_stats.iter().filter(|c| c.is_block).count();
        metrics
    }

    /// Bump the counter for `kind`; false when no counter applies.
    fn count(&mut self, tag: &str, kind: &str) -> bool {
        let counter = match kind {
            "Package" => &mut self.packages,
            "Class" => &mut self.classes,
            "Block" => &mut self.blocks,
            "Property" => &mut self.properties,
            "ownedAttribute" if tag == "ownedAttribute" => &mut self.properties,
            "Association" => &mut self.associations,
            "Dependency" | "Usage" | "Abstraction" | "Realization" | "InterfaceRealization" => {
                &mut self.dependencies
            }
            "Generalization" => &mut self.generalizations,
            "Connector" => &mut self.connectors,
            "Interface" | "InterfaceBlock" => &mut self.interfaces,
            "Activity" => &mut self.activities,
            "StateMachine" => &mut self.state_machines,
            "State" | "FinalState" | "Pseudostate" => &mut self.states,
            "UseCase" => &mut self.use_cases,
            "Actor" => &mut self.actors,
            "Constraint" | "ConstraintBlock" => &mut self.constraints,
            "Comment" => &mut self.comments,
            "Signal" => &mut self.signals,
            k if k.ends_with("Requirement") => &mut self.requirements,
            k if k.ends_with("Port") => &mut self.ports,
            k if k.ends_with("Action") => &mut self.actions,
            _ => return false,
        };
        *counter += 1;
        true
    }
}

fn is_auxiliary(kind: &str) -> bool {
    AUXILIARY_KINDS.contains(&kind)
        || kind.starts_with("Literal")
        || kind.to_lowercase().contains("diagram")
}

// ============================================================================
// QUALITY SUMMARY
// ============================================================================

/// Headline quality figures for a model.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitySummary {
    pub total_elements: usize,
    pub total_relationships: usize,
    /// Share of elements with a non-blank name.
    pub named_ratio: f64,
    /// Share of elements with a stereotype.
    pub stereotyped_ratio: f64,
    /// Share of elements that are an endpoint of some relationship.
    pub connected_ratio: f64,
    pub blocks_without_ports: usize,
    /// Relationship ends that carry no reference at all. An end whose
    /// reference names no element in the document is not counted.
    pub unresolved_endpoints: usize,
    /// 0–100, weighted from the ratios above.
    pub score: u8,
}

impl QualitySummary {
    pub fn compute(
        elements: &[ModelElement],
        relationships: &[Relationship],
        class_stats: &[ClassStat],
    ) -> Self {
        let total = elements.len();
        let endpoints: FxHashSet<&str> = relationships.iter().flat_map(|r| r.endpoints()).collect();

        let named = elements.iter().filter(|e| e.trimmed_name().is_some()).count();
        let stereotyped = elements.iter().filter(|e| e.stereotype.is_some()).count();
        let connected = elements
            .iter()
            .filter(|e| endpoints.contains(e.id.as_str()))
            .count();
        let unresolved_endpoints = relationships
            .iter()
            .map(|r| usize::from(r.source.is_none()) + usize::from(r.target.is_none()))
            .sum::<usize>();

        let named_ratio = ratio(named, total);
        let stereotyped_ratio = ratio(stereotyped, total);
        let connected_ratio = ratio(connected, total);
        let resolved_ratio = 1.0 - ratio_or_zero(unresolved_endpoints, relationships.len() * 2);

        let weighted =
            0.4 * named_ratio + 0.2 * stereotyped_ratio + 0.2 * connected_ratio + 0.2 * resolved_ratio;

        Self {
            total_elements: total,
            total_relationships: relationships.len(),
            named_ratio,
            stereotyped_ratio,
            connected_ratio,
            blocks_without_ports: class_stats.iter().filter(|c| c.ports == 0).count(),
            unresolved_endpoints,
            score: (weighted * 100.0).round().clamp(0.0, 100.0) as u8,
        }
    }
}

/// `part / total`, treating an empty population as fully satisfied.
fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        part as f64 / total as f64
    }
}

fn ratio_or_zero(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
