use super::{load_config, validate_config};
use crate::config::{fallback_config, ColumnKind};

fn write_config(dir: &std::path::Path, text: &str) -> std::path::PathBuf {
    let path = dir.join("config.json");
    std::fs::write(&path, text.as_bytes()).expect("write config");
    path
}

#[test]
fn load_round_trips_serialized_fallback() {
    let dir = tempfile::tempdir().expect("tempdir");
    let text = serde_json::to_string_pretty(&fallback_config()).expect("serialize");
    let path = write_config(dir.path(), &text);

    let loaded = load_config(&path).expect("load config");
    assert_eq!(loaded, fallback_config());
}

#[test]
fn load_rejects_malformed_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), "{ not json");

    let err = load_config(&path).expect_err("malformed config");
    assert!(err.to_string().contains("parse intake config JSON"));
}

#[test]
fn validate_rejects_duplicate_keys() {
    let mut config = fallback_config();
    let first = config.columns[0].clone();
    config.columns.push(first);

    let err = validate_config(&config).expect_err("duplicate key");
    assert!(err.to_string().contains("duplicate column key"));
}

#[test]
fn validate_rejects_dropdown_without_choices() {
    let mut config = fallback_config();
    let bundle = config
        .columns
        .iter_mut()
        .find(|column| column.kind == ColumnKind::Dropdown)
        .expect("dropdown column");
    bundle.choices = Some(Vec::new());

    let err = validate_config(&config).expect_err("empty choices");
    assert!(err.to_string().contains("must list its choices"));
}

#[test]
fn validate_rejects_inverted_bounds() {
    let mut config = fallback_config();
    config.validation.weight.min = 500.0;
    config.validation.weight.max = 1.0;

    let err = validate_config(&config).expect_err("inverted bounds");
    assert!(err.to_string().contains("weight bounds"));
}

#[test]
fn validate_rejects_unordered_confidence_bands() {
    let mut config = fallback_config();
    config.ai.confidence_thresholds.medium = 0.9;

    let err = validate_config(&config).expect_err("unordered bands");
    assert!(err.to_string().contains("high >= medium >= low"));
}

#[test]
fn validate_rejects_bad_temperature_pattern() {
    let mut config = fallback_config();
    config.validation.temperature_pattern = "(".to_string();

    let err = validate_config(&config).expect_err("bad pattern");
    assert!(err.to_string().contains("compile temperature pattern"));
}
