use crate::grid::CargoRow;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Cell editor kind for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    #[default]
    Text,
    Numeric,
    Dropdown,
}

/// One column of the cargo grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Row field the column reads and writes (e.g. "loadBear").
    pub key: String,
    /// Header shown to the operator.
    pub label: String,
    #[serde(default)]
    pub kind: ColumnKind,
    pub width: u32,
    #[serde(default)]
    pub required: bool,
    /// Allowed values for dropdown columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    /// Column may be filled from AI suggestions.
    #[serde(default)]
    pub ai_assisted: bool,
}

/// Key names used against durable key-value storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKeys {
    pub cargo_data: String,
    pub theme: String,
    pub last_export: String,
}

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

fn default_temperature_field() -> String {
    "tempSensitivity".to_string()
}

/// Bounds applied by row validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRules {
    /// Field checked against `temperature_pattern`.
    #[serde(default = "default_temperature_field")]
    pub temperature_field: String,
    pub temperature_pattern: String,
    /// Length, width, and height in metres.
    pub dimensions: Bounds,
    /// Weight in kilograms.
    pub weight: Bounds,
    pub quantity: Bounds,
    /// Load-bearing capacity in kilograms.
    pub load_bear: Bounds,
}

/// Lower edges of the AI confidence bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub max_context_items: usize,
    pub confidence_thresholds: ConfidenceThresholds,
}

/// Immutable session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub schema_version: u32,
    pub columns: Vec<ColumnSpec>,
    /// Template for rows created by "add row".
    pub default_row: CargoRow,
    pub storage_keys: StorageKeys,
    pub validation: ValidationRules,
    pub ai: AiSettings,
}

impl Configuration {
    /// Compile the temperature-range pattern.
    pub fn temperature_pattern(&self) -> Result<Regex> {
        Regex::new(&self.validation.temperature_pattern).with_context(|| {
            format!(
                "compile temperature pattern {:?}",
                self.validation.temperature_pattern
            )
        })
    }
}
