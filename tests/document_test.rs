use std::fs;
use std::path::Path;

use rstest::rstest;
use tempfile::tempdir;

use layertree::application::{
    load_forest, parse_forest, render_forest, ApplicationError, DocumentFormat,
};
use layertree::domain::{LayerKind, NodeId};
use layertree::util::testing;

#[rstest]
fn given_json_resource_when_loading_then_reads_nested_groups() {
    testing::init_test_setup();
    let forest = load_forest(Path::new("tests/resources/layers.json")).unwrap();

    assert_eq!(forest.len(), 9);
    assert_eq!(forest.roots().len(), 4);
    let transport = forest.find_node(&"transport".into()).unwrap();
    assert!(transport.expanded);
    assert_eq!(transport.children().len(), 3);

    let airports = forest.find_node(&"airports".into()).unwrap();
    assert!(airports.is_group());
    assert!(airports.children().is_empty());

    let ortho = forest.find_node(&"ortho".into()).unwrap();
    assert!(!ortho.payload.visible);
    assert_eq!(ortho.payload.kind, LayerKind::Raster);
}

#[rstest]
fn given_toml_resource_when_loading_then_keeps_document_order() {
    testing::init_test_setup();
    let forest = load_forest(Path::new("tests/resources/layers.toml")).unwrap();
    assert_eq!(
        forest.order(),
        vec![NodeId::from("A"), "B".into(), "C".into(), "D".into()]
    );
    assert_eq!(
        forest.find_parent(&"C".into()).map(|n| n.id.clone()),
        Some(NodeId::from("A"))
    );
}

#[rstest]
#[case("tree.json", DocumentFormat::Json)]
#[case("tree.toml", DocumentFormat::Toml)]
fn given_rendered_forest_when_written_and_reloaded_then_is_identical(
    #[case] name: &str,
    #[case] format: DocumentFormat,
) {
    testing::init_test_setup();
    let forest = load_forest(Path::new("tests/resources/layers.json")).unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join(name);

    fs::write(&path, render_forest(&forest, format).unwrap()).unwrap();

    assert_eq!(load_forest(&path).unwrap(), forest);
}

#[rstest]
fn given_unknown_extension_when_loading_then_unsupported_format() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tree.yaml");
    fs::write(&path, "layers: []").unwrap();

    let err = load_forest(&path).unwrap_err();
    assert!(matches!(err, ApplicationError::UnsupportedFormat(_)));
}

#[rstest]
fn given_missing_file_when_loading_then_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let err = load_forest(&path).unwrap_err();
    match err {
        ApplicationError::OperationFailed { context, .. } => {
            assert!(context.contains("missing.json"), "{context}")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
fn given_malformed_json_when_loading_then_document_error_names_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"{"layers": [{"name": "no id"}]}"#).unwrap();

    let err = load_forest(&path).unwrap_err();
    match err {
        ApplicationError::Document { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
fn given_document_without_layers_when_parsing_then_forest_is_empty() {
    let forest = parse_forest("{}", DocumentFormat::Json).unwrap();
    assert!(forest.is_empty());
    assert_eq!(forest.depth(), 0);
}
