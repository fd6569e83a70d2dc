//! Degraded-mode configuration used when `config.json` cannot be loaded.
use super::{
    AiSettings, Bounds, ColumnKind, ColumnSpec, ConfidenceThresholds, Configuration, StorageKeys,
    ValidationRules, CONFIG_SCHEMA_VERSION,
};
use crate::grid::CargoRow;
use serde_json::Value;

fn column(key: &str, label: &str, kind: ColumnKind, width: u32) -> ColumnSpec {
    ColumnSpec {
        key: key.to_string(),
        label: label.to_string(),
        kind,
        width,
        required: true,
        choices: None,
        ai_assisted: false,
    }
}

fn dropdown(key: &str, label: &str, width: u32, choices: &[&str]) -> ColumnSpec {
    ColumnSpec {
        choices: Some(choices.iter().map(|choice| choice.to_string()).collect()),
        ..column(key, label, ColumnKind::Dropdown, width)
    }
}

fn ai_assisted(spec: ColumnSpec) -> ColumnSpec {
    ColumnSpec {
        ai_assisted: true,
        ..spec
    }
}

fn default_row() -> CargoRow {
    let mut row = CargoRow::new();
    for key in ["length", "width", "height", "weight", "loadBear"] {
        row.insert(key.to_string(), Value::Null);
    }
    for key in [
        "name",
        "quantity",
        "fragility",
        "boxingType",
        "bundle",
        "tempSensitivity",
    ] {
        row.insert(key.to_string(), Value::String(String::new()));
    }
    row
}

/// Build the hard-coded configuration for degraded mode.
///
/// It carries the full cargo schema so the grid stays usable, but no AI model
/// or credentials.
pub fn fallback_config() -> Configuration {
    use ColumnKind::{Numeric, Text};

    Configuration {
        schema_version: CONFIG_SCHEMA_VERSION,
        columns: vec![
            column("name", "Name", Text, 150),
            column("length", "Length (m)", Numeric, 120),
            column("width", "Width (m)", Numeric, 120),
            column("height", "Height (m)", Numeric, 120),
            column("weight", "Weight (kg)", Numeric, 120),
            column("quantity", "Quantity", Numeric, 100),
            ai_assisted(dropdown(
                "fragility",
                "Fragility",
                120,
                &["LOW", "MEDIUM", "HIGH"],
            )),
            ai_assisted(column("loadBear", "LoadBear (kg)", Numeric, 130)),
            dropdown(
                "boxingType",
                "BoxingType",
                130,
                &["BOX", "PALLET", "LOOSE", "CONTAINER", "CRATE"],
            ),
            dropdown("bundle", "Bundle", 120, &["YES", "NO"]),
            ai_assisted(column(
                "tempSensitivity",
                "Temperature Sensitivity",
                Text,
                170,
            )),
        ],
        default_row: default_row(),
        storage_keys: StorageKeys {
            cargo_data: "cargovortex-data".to_string(),
            theme: "cargovortex-theme".to_string(),
            last_export: "cargovortex-last-export".to_string(),
        },
        validation: ValidationRules {
            temperature_field: "tempSensitivity".to_string(),
            temperature_pattern: r"^-?\d+°C to -?\d+°C$".to_string(),
            dimensions: Bounds {
                min: 0.01,
                max: 50.0,
            },
            weight: Bounds {
                min: 0.1,
                max: 40000.0,
            },
            quantity: Bounds {
                min: 1.0,
                max: 10000.0,
            },
            load_bear: Bounds {
                min: 0.0,
                max: 100000.0,
            },
        },
        ai: AiSettings {
            model: None,
            max_context_items: 10,
            confidence_thresholds: ConfidenceThresholds {
                high: 0.85,
                medium: 0.5,
                low: 0.0,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load::validate_config;

    #[test]
    fn fallback_passes_validation() {
        validate_config(&fallback_config()).expect("fallback config is valid");
    }

    #[test]
    fn default_row_covers_every_column() {
        let config = fallback_config();
        for column in &config.columns {
            assert!(
                config.default_row.contains_key(&column.key),
                "default row missing {}",
                column.key
            );
        }
    }

    #[test]
    fn temperature_pattern_accepts_ranges() {
        let pattern = fallback_config()
            .temperature_pattern()
            .expect("pattern compiles");
        assert!(pattern.is_match("-5°C to 25°C"));
        assert!(!pattern.is_match("cold"));
    }
}
