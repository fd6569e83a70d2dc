//! Validation summary shown before leaving the intake stage.
use crate::grid::ValidationStatus;
use crate::util::plural;

/// Issues listed individually before the rest are elided.
pub const MAX_LISTED_ISSUES: usize = 5;

/// Render the "proceed anyway?" body for a status with issues.
pub fn validation_summary(status: &ValidationStatus) -> String {
    let mut lines = vec![format!(
        "Your cargo data has {} in {}.",
        plural(status.total_issues, "validation issue", "validation issues"),
        plural(status.items_affected, "item", "items"),
    )];
    for issue in status.issues.iter().take(MAX_LISTED_ISSUES) {
        lines.push(format!(
            "- {}: {} ({})",
            issue.item_name, issue.message, issue.field
        ));
    }
    if status.issues.len() > MAX_LISTED_ISSUES {
        lines.push(format!(
            "- ...and {} more issues",
            status.issues.len() - MAX_LISTED_ISSUES
        ));
    }
    lines.push("Do you want to proceed anyway?".to_string());
    lines.join("\n")
}
