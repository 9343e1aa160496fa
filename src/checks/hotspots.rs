//! Violation hotspots by package.
//!
//! Re-derives the per-entity rule violations (blocks without ports, unnamed,
//! badly named, isolated, dangling relationships, unsatisfied requirements)
//! and tallies every one against a package path, regardless of which rule
//! fired.

use rustc_hash::FxHashMap;
use serde::Serialize;

use super::index::ModelIndex;
use super::rules::has_invalid_name;
use crate::interchange::{Model, ROOT_PACKAGE, Relationship};

/// Violation total for one package path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub package: String,
    pub violation_count: usize,
}

/// Tally violations per package, most violations first.
///
/// Ties are ordered by package path.
pub fn aggregate_hotspots(model: &Model, relationships: &[Relationship]) -> Vec<Hotspot> {
    let index = ModelIndex::build(model, relationships);
    let mut tally: FxHashMap<&str, usize> = FxHashMap::default();

    for stat in model.class_stats.iter().filter(|s| s.ports == 0) {
        bump(&mut tally, &stat.package);
    }

    for element in &model.elements {
        let violations = usize::from(element.trimmed_name().is_none())
            + usize::from(has_invalid_name(element))
            + usize::from(!index.is_endpoint(&element.id))
            + usize::from(element.is_requirement() && !index.is_satisfied(&element.id));
        for _ in 0..violations {
            bump(&mut tally, &element.package);
        }
    }

    for rel in relationships.iter().filter(|r| r.is_dangling()) {
        bump(&mut tally, index.relationship_package(rel).unwrap_or(ROOT_PACKAGE));
    }

    let mut hotspots: Vec<Hotspot> = tally
        .into_iter()
        .map(|(package, violation_count)| Hotspot {
            package: package.to_string(),
            violation_count,
        })
        .collect();
    hotspots.sort_by(|a, b| {
        b.violation_count
            .cmp(&a.violation_count)
            .then_with(|| a.package.cmp(&b.package))
    });

    tracing::debug!("aggregated violations into {} hotspots", hotspots.len());
    hotspots
}

fn bump<'a>(tally: &mut FxHashMap<&'a str, usize>, package: &'a str) {
    let package = if package.trim().is_empty() { ROOT_PACKAGE } else { package };
    *tally.entry(package).or_insert(0) += 1;
}

/// Hotspots whose count is strictly above the mean count.
pub fn above_average(hotspots: &[Hotspot]) -> Vec<&Hotspot> {
    if hotspots.is_empty() {
        return Vec::new();
    }
    let total: usize = hotspots.iter().map(|h| h.violation_count).sum();
    let mean = total as f64 / hotspots.len() as f64;
    hotspots
        .iter()
        .filter(|h| h.violation_count as f64 > mean)
        .collect()
}
