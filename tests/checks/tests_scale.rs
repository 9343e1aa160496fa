//! Analyses over a large model.
//!
//! 100 blocks with 100 ports each, 10 000 requirements and 10 000
//! relationships. Half the requirements are satisfied and half the ports
//! are wired through connector roles.

use syster_audit::checks::rules::codes;
use syster_audit::checks::{Smell, aggregate_hotspots, detect_smells, evaluate_rules};
use syster_audit::interchange::{Model, ModelElement, Relationship};

use crate::helpers::model_builders::{class, model_of, port};

const BLOCKS: usize = 100;
const PORTS_PER_BLOCK: usize = 100;
const REQUIREMENTS: usize = 10_000;
const CONNECTORS: usize = 5_000;
const SATISFIED: usize = 5_000;
const UNSATISFIED: usize = REQUIREMENTS - SATISFIED;

fn large_model() -> Model {
    let mut elements: Vec<ModelElement> = (0..BLOCKS)
        .map(|b| {
            let mut block =
                class(&format!("c{b}"), &format!("Pump{b}")).with_package("Root›Plant");
            block.ports = (0..PORTS_PER_BLOCK)
                .map(|p| port(&format!("p{b}_{p}"), &format!("flow{p}")))
                .collect();
            block
        })
        .collect();
    elements.extend((0..REQUIREMENTS).map(|r| {
        ModelElement::new(format!("r{r}"), "Requirement").with_package("Root›Reqs")
    }));

    let mut relationships: Vec<Relationship> = (0..CONNECTORS)
        .map(|k| {
            let (b, p) = (k % BLOCKS, k / BLOCKS);
            let mut connector = Relationship::new(format!("k{k}"), "Connector")
                .between(format!("c{b}"), format!("c{}", (b + 1) % BLOCKS));
            connector.source_ref = Some(format!("p{b}_{p}"));
            connector
        })
        .collect();
    relationships.extend((0..SATISFIED).map(|r| {
        Relationship::new(format!("s{r}"), "Satisfy")
            .between(format!("c{}", r % BLOCKS), format!("r{r}"))
    }));

    model_of(elements, relationships)
}

fn count(smells: &[Smell], id: &str) -> usize {
    smells.iter().filter(|s| s.id == id).count()
}

#[test]
fn test_large_model_rules() {
    let model = large_model();
    assert_eq!(model.ports().count(), BLOCKS * PORTS_PER_BLOCK);
    assert_eq!(model.relationships.len(), CONNECTORS + SATISFIED);

    let results = evaluate_rules(&model, &model.relationships);
    let violations = |id: &str| {
        results
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.violation_count)
            .unwrap()
    };
    assert_eq!(violations(codes::BLOCK_WITHOUT_PORTS), 0);
    assert_eq!(violations(codes::UNNAMED_ELEMENT), REQUIREMENTS);
    assert_eq!(violations(codes::ISOLATED_ELEMENT), UNSATISFIED);
    assert_eq!(violations(codes::INVALID_CONNECTOR_END), 0);
    assert_eq!(violations(codes::UNSATISFIED_REQUIREMENT), UNSATISFIED);
}

#[test]
fn test_large_model_smells() {
    let model = large_model();
    let smells = detect_smells(&model, &model.relationships);

    assert_eq!(count(&smells, "S6"), UNSATISFIED);
    assert_eq!(count(&smells, "S14"), REQUIREMENTS);
    // Each connector wires one distinct port.
    assert_eq!(count(&smells, "S13"), BLOCKS * PORTS_PER_BLOCK - CONNECTORS);
}

#[test]
fn test_large_model_hotspots() {
    let model = large_model();
    let hotspots = aggregate_hotspots(&model, &model.relationships);

    // Every requirement is unnamed; the unsatisfied half is also isolated.
    assert_eq!(hotspots.len(), 1);
    assert_eq!(hotspots[0].package, "Root›Reqs");
    assert_eq!(hotspots[0].violation_count, REQUIREMENTS + 2 * UNSATISFIED);
}
