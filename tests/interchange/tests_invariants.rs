//! Properties that hold for every parsed document.

use rstest::rstest;
use syster_audit::interchange::{ROOT_PACKAGE, parse};

use crate::helpers::xmi_fixtures::{
    CAMEO_VEHICLE, DUPLICATE_ITEMS, EA_SENSORS, PACKAGE_WITH_BOX, UNKNOWN_ENDPOINTS,
    nested_packages,
};

#[rstest]
#[case(PACKAGE_WITH_BOX)]
#[case(DUPLICATE_ITEMS)]
#[case(UNKNOWN_ENDPOINTS)]
#[case(CAMEO_VEHICLE)]
#[case(EA_SENSORS)]
fn test_parse_is_idempotent(#[case] text: &str) {
    assert_eq!(parse(text).unwrap(), parse(text).unwrap());
}

#[rstest]
#[case(PACKAGE_WITH_BOX)]
#[case(DUPLICATE_ITEMS)]
#[case(CAMEO_VEHICLE)]
#[case(EA_SENSORS)]
fn test_package_paths_round_trip(#[case] text: &str) {
    let model = parse(text).unwrap();
    for element in &model.elements {
        if element.package == ROOT_PACKAGE {
            continue;
        }
        assert!(
            model.packages().any(|p| p.own_path() == element.package),
            "no package owns {} ({})",
            element.package,
            element.id
        );
    }
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(8)]
fn test_depth_is_ancestor_count(#[case] levels: usize) {
    let model = parse(&nested_packages(levels)).unwrap();
    for i in 1..=levels {
        let package = model.element(&format!("pkg_{i}")).unwrap();
        assert_eq!(package.depth, i);
    }
    let leaf = model.element("leaf").unwrap();
    assert_eq!(leaf.depth, levels + 1);

    let expected: String = (1..=levels).fold(ROOT_PACKAGE.to_string(), |path, i| {
        format!("{path}›Level{i}")
    });
    assert_eq!(leaf.package, expected);
}

#[test]
fn test_unnamed_count_matches_metrics() {
    let body = [
        r#"<packagedElement xmi:type="uml:Class" xmi:id="c1" name="Named"/>"#,
        r#"<packagedElement xmi:type="uml:Class" xmi:id="c2" name="   "/>"#,
        r#"<packagedElement xmi:type="uml:Class" xmi:id="c3"/>"#,
    ]
    .join("\n");
    let model = parse(&crate::helpers::xmi_fixtures::xmi(&body)).unwrap();
    assert_eq!(model.metrics.unnamed_elements, 2);
    assert_eq!(model.quality.total_elements, 3);
}
