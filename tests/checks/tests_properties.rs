//! Relations between rule outcomes and model contents.

use rstest::rstest;
use rustc_hash::FxHashSet;
use syster_audit::checks::evaluate_rules;
use syster_audit::checks::rules::codes;
use syster_audit::interchange::parse;

use crate::helpers::xmi_fixtures::{
    CAMEO_VEHICLE, DUPLICATE_ITEMS, EA_SENSORS, PACKAGE_WITH_BOX, UNKNOWN_ENDPOINTS,
};

fn count(text: &str, id: &str) -> usize {
    let model = parse(text).unwrap();
    evaluate_rules(&model, &model.relationships)
        .into_iter()
        .find(|r| r.id == id)
        .map(|r| r.violation_count)
        .unwrap_or_default()
}

#[rstest]
#[case(PACKAGE_WITH_BOX)]
#[case(DUPLICATE_ITEMS)]
#[case(UNKNOWN_ENDPOINTS)]
#[case(CAMEO_VEHICLE)]
#[case(EA_SENSORS)]
fn test_unnamed_rule_matches_metrics(#[case] text: &str) {
    let model = parse(text).unwrap();
    assert_eq!(count(text, codes::UNNAMED_ELEMENT), model.metrics.unnamed_elements);
}

#[rstest]
#[case(PACKAGE_WITH_BOX)]
#[case(DUPLICATE_ITEMS)]
#[case(UNKNOWN_ENDPOINTS)]
#[case(CAMEO_VEHICLE)]
#[case(EA_SENSORS)]
fn test_isolated_rule_is_set_difference(#[case] text: &str) {
    let model = parse(text).unwrap();
    let endpoints: FxHashSet<&str> = model
        .relationships
        .iter()
        .flat_map(|r| r.endpoints())
        .collect();
    let touched = model
        .elements
        .iter()
        .filter(|e| endpoints.contains(e.id.as_str()))
        .count();
    assert_eq!(
        count(text, codes::ISOLATED_ELEMENT),
        model.elements.len() - touched
    );
}

#[rstest]
#[case(PACKAGE_WITH_BOX)]
#[case(CAMEO_VEHICLE)]
#[case(EA_SENSORS)]
fn test_block_rule_counts_portless_classes(#[case] text: &str) {
    let model = parse(text).unwrap();
    let portless = model.class_stats.iter().filter(|s| s.ports == 0).count();
    assert_eq!(count(text, codes::BLOCK_WITHOUT_PORTS), portless);
}
