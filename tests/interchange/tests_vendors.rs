//! Enterprise Architect export shapes.

use syster_audit::interchange::{Model, parse};

use crate::helpers::xmi_fixtures::EA_SENSORS;

fn sensors() -> Model {
    parse(EA_SENSORS).expect("fixture parses")
}

#[test]
fn test_model_without_id_still_yields_elements() {
    let model = sensors();
    let ids: Vec<&str> = model.elements.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["EAPK_1", "EAID_1", "EAID_2"]);
    assert_eq!(model.element("EAID_1").unwrap().package, "Root›Sensors");
}

#[test]
fn test_extension_stereotype_by_idref() {
    let model = sensors();
    assert_eq!(
        model.element("EAID_1").unwrap().stereotype.as_deref(),
        Some("block")
    );
    let thermometer = model.class_stats.iter().find(|c| c.id == "EAID_1").unwrap();
    assert!(thermometer.is_block);
}

#[test]
fn test_child_idref_types() {
    let model = sensors();
    let reading = &model.element("EAID_1").unwrap().attributes[0];
    assert_eq!(reading.name, "reading");
    // Primitive outside the document: raw reference kept.
    assert_eq!(reading.type_name.as_deref(), Some("EAJava_float"));
}

#[test]
fn test_association_from_member_end_children() {
    let model = sensors();
    let association = model
        .relationships
        .iter()
        .find(|r| r.id == "EAID_as1")
        .unwrap();
    assert_eq!(association.kind, "Association");
    assert_eq!(association.source.as_deref(), Some("EAID_2"));
    assert_eq!(association.target.as_deref(), Some("EAID_1"));
    assert_eq!(association.source_name, "data logger");
    assert_eq!(association.target_name, "Thermometer");

    let thermometer = model.element("EAID_1").unwrap();
    assert!(thermometer.incoming.contains("EAID_as1"));
}

#[test]
fn test_dependency_to_missing_supplier() {
    let model = sensors();
    let dependency = model
        .relationships
        .iter()
        .find(|r| r.id == "EAID_dep1")
        .unwrap();
    assert_eq!(dependency.target.as_deref(), Some("EAID_missing"));
    assert_eq!(dependency.target_name, "EAID_missing");
    assert!(!dependency.is_dangling());
}

#[test]
fn test_extension_diagram() {
    let model = sensors();
    assert_eq!(model.diagrams.len(), 1);
    assert_eq!(model.diagrams[0].name, "Sensor Overview");
    assert_eq!(model.diagrams[0].diagram_type, "Logical");
}

#[test]
fn test_metrics() {
    let m = sensors().metrics;
    assert_eq!(m.packages, 1);
    assert_eq!(m.classes, 2);
    assert_eq!(m.associations, 1);
    assert_eq!(m.association_ends, 2);
    assert_eq!(m.dependencies, 1);
    assert_eq!(m.properties, 3);
    assert_eq!(m.diagrams, 1);
    assert_eq!(m.unknown_kinds, 0);
}

#[test]
fn test_search_by_relationship_endpoint_name() {
    let model = sensors();
    let hits = model.search_index.search("thermo");
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().any(|h| h.id == "EAID_as1"));
}
