//! Loading and validation for `config.json`.
use super::{Bounds, ColumnKind, Configuration, CONFIG_SCHEMA_VERSION};
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<Configuration> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: Configuration =
        serde_json::from_slice(&bytes).context("parse intake config JSON")?;
    validate_config(&config)?;
    Ok(config)
}

/// Reject configurations the grid or row validation cannot work with.
pub fn validate_config(config: &Configuration) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if config.columns.is_empty() {
        return Err(anyhow!("columns must be non-empty"));
    }
    let mut seen = BTreeSet::new();
    for column in &config.columns {
        if column.key.trim().is_empty() {
            return Err(anyhow!("column keys must be non-empty"));
        }
        if !seen.insert(column.key.as_str()) {
            return Err(anyhow!("duplicate column key {:?}", column.key));
        }
        if column.kind == ColumnKind::Dropdown
            && !column
                .choices
                .as_ref()
                .is_some_and(|choices| !choices.is_empty())
        {
            return Err(anyhow!(
                "dropdown column {:?} must list its choices",
                column.key
            ));
        }
    }

    let rules = &config.validation;
    check_bounds("dimensions", &rules.dimensions)?;
    check_bounds("weight", &rules.weight)?;
    check_bounds("quantity", &rules.quantity)?;
    check_bounds("load_bear", &rules.load_bear)?;
    config.temperature_pattern()?;

    let bands = &config.ai.confidence_thresholds;
    let in_unit = |value: f64| (0.0..=1.0).contains(&value);
    if !(in_unit(bands.high) && in_unit(bands.medium) && in_unit(bands.low)) {
        return Err(anyhow!("confidence thresholds must lie within [0, 1]"));
    }
    if bands.high < bands.medium || bands.medium < bands.low {
        return Err(anyhow!(
            "confidence thresholds must be ordered high >= medium >= low"
        ));
    }
    Ok(())
}

fn check_bounds(label: &str, bounds: &Bounds) -> Result<()> {
    if !bounds.min.is_finite() || !bounds.max.is_finite() || bounds.min > bounds.max {
        return Err(anyhow!(
            "{label} bounds must be finite with min <= max (got {} to {})",
            bounds.min,
            bounds.max
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "load_tests.rs"]
mod tests;
