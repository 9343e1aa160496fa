//! Loading analysis configuration from disk.

use std::fs;

use rstest::rstest;
use syster_audit::checks::{AnalysisConfig, ConfigError, SmellConfig};
use syster_audit::{analyze, analyze_with};
use tempfile::TempDir;

use crate::helpers::model_builders::{class, model_of};

fn write(dir: &TempDir, file: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(file);
    fs::write(&path, text).unwrap();
    path
}

#[rstest]
#[case("audit.yaml", "smells:\n  deep_nesting: 2\n  long_name: 10\n")]
#[case("audit.yml", "smells:\n  deep_nesting: 2\n  long_name: 10\n")]
#[case("audit.json", r#"{"smells": {"deep_nesting": 2, "long_name": 10}}"#)]
fn test_load_by_extension(#[case] file: &str, #[case] text: &str) {
    let dir = TempDir::new().unwrap();
    let config = AnalysisConfig::load(write(&dir, file, text)).unwrap();
    assert_eq!(config.smells.deep_nesting, 2);
    assert_eq!(config.smells.long_name, 10);
    assert_eq!(config.smells.large_package, SmellConfig::default().large_package);
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "audit.toml", "[smells]\n");
    let err = AnalysisConfig::load(path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "toml"));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = AnalysisConfig::load(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[rstest]
#[case("smells:\n  similar_names: 1.5\n")]
#[case("smells:\n  depth_imbalance_factor: 0\n")]
fn test_out_of_range_values(#[case] text: &str) {
    let err = AnalysisConfig::from_yaml_str(text).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
}

#[test]
fn test_malformed_yaml() {
    let err = AnalysisConfig::from_yaml_str("smells: [").unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
}

#[test]
fn test_analyze_with_custom_thresholds() {
    let mut deep = class("d", "Deep");
    deep.depth = 3;
    let model = model_of(vec![deep], vec![]);

    let default = analyze(&model);
    assert!(default.smells.iter().all(|s| s.id != "S1"));

    let config = AnalysisConfig::from_yaml_str("smells:\n  deep_nesting: 2\n").unwrap();
    let tuned = analyze_with(&model, &config);
    assert_eq!(tuned.smells.iter().filter(|s| s.id == "S1").count(), 1);
    assert_eq!(tuned.rules, default.rules);
    assert_eq!(tuned.hotspots, default.hotspots);
}
