//! End-to-end scenarios: XMI text in, findings out.

use rstest::rstest;
use syster_audit::checks::rules::codes;
use syster_audit::checks::{RuleResult, Smell, analyze, detect_smells, evaluate_rules};
use syster_audit::interchange::parse;

use crate::helpers::xmi_fixtures::{
    DUPLICATE_ITEMS, PACKAGE_WITH_BOX, UNKNOWN_ENDPOINTS, packaged, xmi,
};

fn rule<'a>(results: &'a [RuleResult], id: &str) -> &'a RuleResult {
    results.iter().find(|r| r.id == id).expect("rule present")
}

fn smells_with_id<'a>(smells: &'a [Smell], id: &str) -> Vec<&'a Smell> {
    smells.iter().filter(|s| s.id == id).collect()
}

#[test]
fn test_block_without_ports() {
    let model = parse(PACKAGE_WITH_BOX).unwrap();
    assert_eq!(model.metrics.classes, 1);
    assert_eq!(model.metrics.packages, 1);

    let results = evaluate_rules(&model, &model.relationships);
    let r1 = rule(&results, codes::BLOCK_WITHOUT_PORTS);
    assert!(!r1.passed);
    assert_eq!(r1.violation_count, 1);
    assert_eq!(r1.violations[0].name, "Box");
    assert_eq!(r1.violations[0].package, "Root›P");

    assert!(rule(&results, codes::EMPTY_PACKAGE).passed);
}

#[test]
fn test_duplicate_names_across_packages() {
    let model = parse(DUPLICATE_ITEMS).unwrap();
    let smells = detect_smells(&model, &model.relationships);
    let duplicates = smells_with_id(&smells, "S4");
    assert_eq!(duplicates.len(), 2);
    let elements: Vec<Option<&str>> = duplicates.iter().map(|s| s.element.as_deref()).collect();
    assert_eq!(elements, vec![Some("item_a"), Some("item_b")]);

    let results = evaluate_rules(&model, &model.relationships);
    assert!(rule(&results, codes::UNNAMED_ELEMENT).passed);
    assert!(rule(&results, codes::INVALID_NAMING).passed);
}

#[test]
fn test_unknown_endpoints_are_not_invalid_ends() {
    let model = parse(UNKNOWN_ENDPOINTS).unwrap();
    let results = evaluate_rules(&model, &model.relationships);
    let r6 = rule(&results, codes::INVALID_CONNECTOR_END);
    // Only the dependency with no supplier at all.
    assert_eq!(r6.violation_count, 1);
    assert_eq!(r6.violations[0].id, "dep_half");
    assert_eq!(r6.violations[0].package, "Root");
}

#[rstest]
#[case("myElement", true)]
#[case("MyElement", false)]
#[case("My_Element", true)]
#[case("Element2", false)]
#[case("2Element", true)]
#[case("MY ELEMENT", true)]
fn test_naming_rule(#[case] name: &str, #[case] fires: bool) {
    let model = parse(&xmi(&packaged("Class", "c1", name))).unwrap();
    let results = evaluate_rules(&model, &model.relationships);
    assert_eq!(!rule(&results, codes::INVALID_NAMING).passed, fires);
}

#[rstest]
#[case("Class", "Class", true)]
#[case("Class", "Interface", false)]
#[case("Component", "Component", true)]
fn test_similar_names_need_same_kind(
    #[case] first: &str,
    #[case] second: &str,
    #[case] fires: bool,
) {
    let body = [
        packaged(first, "a", "NetworkManager"),
        packaged(second, "b", "NetworkManaqer"),
    ]
    .join("\n");
    let model = parse(&xmi(&body)).unwrap();
    let smells = detect_smells(&model, &model.relationships);
    assert_eq!(!smells_with_id(&smells, "S5").is_empty(), fires);
}

#[test]
fn test_analyze_bundles_all_three() {
    let model = parse(PACKAGE_WITH_BOX).unwrap();
    let report = analyze(&model);
    assert_eq!(report.rules.len(), 7);
    assert!(report.failed_rules().any(|r| r.id == codes::BLOCK_WITHOUT_PORTS));
    assert!(report.violation_count() >= 1);
    assert_eq!(report.hotspots[0].package, "Root›P");
}
