//! Grid collaborator contract and the in-memory reference grid.
//!
//! The grid exclusively owns the row collection. Callers read snapshots via
//! `data` and mutate only through the discrete commands below.
use crate::config::Configuration;
use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

mod memory;
mod validation;

pub use memory::MemoryGrid;

/// One cargo item keyed by column key.
pub type CargoRow = Map<String, Value>;

/// Container name the main grid binds to.
pub const GRID_CONTAINER_ID: &str = "cargoTable";
/// Container name for the review-tab preview.
pub const PREVIEW_CONTAINER_ID: &str = "previewTable";

/// A single data-quality problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Display name of the affected item.
    pub item_name: String,
    /// Offending column key.
    pub field: String,
    pub message: String,
}

/// Derived report of the issues in a grid snapshot. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationStatus {
    pub total_issues: usize,
    /// Number of distinct rows with at least one issue.
    pub items_affected: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationStatus {
    pub fn new(issues: Vec<ValidationIssue>, items_affected: usize) -> Self {
        Self {
            total_issues: issues.len(),
            items_affected,
            issues,
        }
    }

    pub fn has_issues(&self) -> bool {
        self.total_issues > 0
    }
}

/// What a grid is bound to at construction.
#[derive(Debug, Clone)]
pub struct GridSpec {
    pub container_id: String,
    /// Column schema, default row, and storage keys.
    pub config: Arc<Configuration>,
}

pub trait GridManager {
    /// Render the grid into its container.
    fn initialize(&mut self) -> Result<()>;
    /// Snapshot of the non-blank rows.
    fn data(&self) -> Vec<CargoRow>;
    /// Load previously saved rows; `false` when nothing was saved.
    fn load_saved(&mut self) -> Result<bool>;
    fn save(&mut self) -> Result<()>;
    /// Drop all rows and any saved copy.
    fn clear_data(&mut self);
    /// Drop a loaded session along with its undo history, so the discarded
    /// rows cannot be brought back.
    fn discard_saved(&mut self);
    fn add_row(&mut self);
    fn remove_selected_rows(&mut self);
    fn undo(&mut self);
    fn redo(&mut self);
    fn show_ai_fill_modal(&mut self) -> Result<()>;
    fn set_data_from_file(&mut self, rows: Vec<CargoRow>);
    fn validation_status(&self) -> ValidationStatus;
    fn create_preview_table(&mut self, container_id: &str);
    fn update_data_stats(&mut self, rows: &[CargoRow]);
}
