//! XMI 1.x export shapes.

use syster_audit::checks::evaluate_rules;
use syster_audit::checks::rules::codes;
use syster_audit::interchange::{Model, parse};

use crate::helpers::xmi_fixtures::ARGO_PUMPS;

fn pumps() -> Model {
    parse(ARGO_PUMPS).expect("fixture parses")
}

#[test]
fn test_elements_under_xmi_content() {
    let model = pumps();
    let ids: Vec<&str> = model.elements.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["pk1", "c1", "c2"]);

    let package = model.element("pk1").unwrap();
    assert_eq!(package.kind, "Package");
    assert_eq!(package.depth, 1);

    let pump = model.element("c1").unwrap();
    assert_eq!(pump.kind, "Class");
    assert_eq!(pump.package, "Root›Hydraulics");
    assert_eq!(pump.depth, 2);
    assert_eq!(model.class_stats.len(), 2);
}

#[test]
fn test_dependency_through_property_elements() {
    let model = pumps();
    assert_eq!(model.relationships.len(), 1);
    let dependency = &model.relationships[0];
    assert_eq!(dependency.id, "d1");
    assert_eq!(dependency.kind, "Dependency");
    assert_eq!(dependency.source.as_deref(), Some("c1"));
    assert_eq!(dependency.target.as_deref(), Some("c2"));
    assert_eq!(dependency.source_name, "Pump");
    assert_eq!(dependency.target_name, "valve");
    assert!(model.element("c2").unwrap().incoming.contains("d1"));
}

#[test]
fn test_rules_run_on_xmi1_models() {
    let model = pumps();
    let results = evaluate_rules(&model, &model.relationships);
    let violations = |id: &str| {
        let result = results.iter().find(|r| r.id == id).unwrap();
        result.violations.iter().map(|v| v.id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(violations(codes::INVALID_NAMING), vec!["c2"]);
    assert!(violations(codes::INVALID_CONNECTOR_END).is_empty());
    // Only the package itself is off every relationship.
    assert_eq!(violations(codes::ISOLATED_ELEMENT), vec!["pk1"]);
}
