//! Decoding failures and tolerance of unexpected shapes.

use rstest::rstest;
use syster_audit::interchange::{InterchangeError, parse, parse_file};

#[rstest]
#[case("")]
#[case("   \n\t ")]
#[case("just some text")]
fn test_no_elements_is_empty_error(#[case] input: &str) {
    let err = parse(input).unwrap_err();
    assert!(matches!(err, InterchangeError::Empty(_)), "got {err:?}");
}

#[rstest]
#[case("<xmi:XMI><uml:Model>")]
#[case("<a><b></a>")]
#[case("<a attr=\"unterminated></a>")]
fn test_malformed_xml_is_xml_error(#[case] input: &str) {
    let err = parse(input).unwrap_err();
    assert!(matches!(err, InterchangeError::Xml(_)), "got {err:?}");
}

#[test]
fn test_unknown_root_degrades_to_no_elements() {
    let model = parse("<catalog><book id=\"b1\" name=\"Dune\"/></catalog>").unwrap();
    assert!(model.elements.is_empty());
    assert!(model.relationships.is_empty());
    assert_eq!(model.metrics.unknown_kinds, 1);
}

#[test]
fn test_model_without_wrapper_is_found() {
    let model = parse(
        r#"<uml:Model xmi:id="m"><packagedElement xmi:type="uml:Class" xmi:id="c" name="Solo"/></uml:Model>"#,
    )
    .unwrap();
    assert_eq!(model.elements.len(), 1);
    assert_eq!(model.elements[0].name.as_deref(), Some("Solo"));
}

#[test]
fn test_parse_file_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.xmi");
    std::fs::write(&path, crate::helpers::xmi_fixtures::PACKAGE_WITH_BOX).unwrap();

    let model = parse_file(&path).unwrap();
    assert_eq!(model.metrics.classes, 1);

    let missing = parse_file(dir.path().join("absent.xmi")).unwrap_err();
    assert!(matches!(missing, InterchangeError::Io(_)));
}
