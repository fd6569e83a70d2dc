//! Row-level validation against the configured schema and bounds.
use super::{CargoRow, ValidationIssue, ValidationStatus};
use crate::config::{Bounds, ColumnKind, ColumnSpec, Configuration, ValidationRules};
use regex::Regex;
use serde_json::Value;

/// Check every row and collect issues in row, then column, order.
pub fn validate_rows(rows: &[CargoRow], config: &Configuration) -> ValidationStatus {
    let pattern = match config.temperature_pattern() {
        Ok(pattern) => Some(pattern),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "skipping temperature checks");
            None
        }
    };

    let mut issues = Vec::new();
    let mut items_affected = 0;
    for (index, row) in rows.iter().enumerate() {
        let before = issues.len();
        let item_name = item_name(row, index);
        for column in &config.columns {
            let value = row.get(&column.key);
            if let Some(message) = check_cell(column, value, &config.validation, pattern.as_ref())
            {
                issues.push(ValidationIssue {
                    item_name: item_name.clone(),
                    field: column.key.clone(),
                    message,
                });
            }
        }
        if issues.len() > before {
            items_affected += 1;
        }
    }
    ValidationStatus::new(issues, items_affected)
}

pub(crate) fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

pub(crate) fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn item_name(row: &CargoRow, index: usize) -> String {
    match row.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
        _ => format!("Item {}", index + 1),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_string(),
        other => other.to_string(),
    }
}

fn bounds_for<'a>(rules: &'a ValidationRules, key: &str) -> Option<&'a Bounds> {
    match key {
        "length" | "width" | "height" => Some(&rules.dimensions),
        "weight" => Some(&rules.weight),
        "quantity" => Some(&rules.quantity),
        "loadBear" => Some(&rules.load_bear),
        _ => None,
    }
}

fn check_cell(
    column: &ColumnSpec,
    value: Option<&Value>,
    rules: &ValidationRules,
    pattern: Option<&Regex>,
) -> Option<String> {
    let label = &column.label;
    let value = match value {
        Some(value) if !is_blank(Some(value)) => value,
        _ => return column.required.then(|| format!("{label} is required")),
    };

    if column.key == rules.temperature_field {
        if let Some(pattern) = pattern {
            if !pattern.is_match(&text_of(value)) {
                return Some(format!("{label} must look like \"-5°C to 25°C\""));
            }
        }
    }

    match column.kind {
        ColumnKind::Numeric => {
            let Some(number) = as_number(value) else {
                return Some(format!("{label} must be a number"));
            };
            if column.key == "quantity" && number.fract().abs() > f64::EPSILON {
                return Some(format!("{label} must be a whole number"));
            }
            match bounds_for(rules, &column.key) {
                Some(bounds) if !bounds.contains(number) => Some(format!(
                    "{label} must be between {} and {}",
                    bounds.min, bounds.max
                )),
                _ => None,
            }
        }
        ColumnKind::Dropdown => {
            let text = text_of(value);
            let choices = column.choices.as_deref().unwrap_or_default();
            if choices.iter().any(|choice| *choice == text) {
                None
            } else {
                Some(format!("{label} must be one of: {}", choices.join(", ")))
            }
        }
        ColumnKind::Text => None,
    }
}
