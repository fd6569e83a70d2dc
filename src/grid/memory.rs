//! In-memory grid used by the headless session.
use super::validation::{as_number, is_blank, validate_rows};
use super::{CargoRow, GridManager, GridSpec, ValidationStatus};
use crate::services::{AiAssist, ConfidenceBand};
use crate::storage::KeyValueStore;
use anyhow::{anyhow, Context, Result};
use std::rc::Rc;

/// Undo depth kept before the oldest snapshot is dropped.
const MAX_HISTORY: usize = 100;

/// Totals shown on the review tab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataStats {
    pub items: usize,
    pub total_quantity: f64,
    /// Sum of weight times quantity.
    pub total_weight_kg: f64,
}

pub fn summarize(rows: &[CargoRow]) -> DataStats {
    let mut stats = DataStats {
        items: rows.len(),
        ..DataStats::default()
    };
    for row in rows {
        let quantity = row.get("quantity").and_then(as_number).unwrap_or(0.0);
        let weight = row.get("weight").and_then(as_number).unwrap_or(0.0);
        stats.total_quantity += quantity;
        stats.total_weight_kg += weight * quantity;
    }
    stats
}

fn row_is_blank(row: &CargoRow) -> bool {
    row.values().all(|value| is_blank(Some(value)))
}

pub struct MemoryGrid {
    spec: GridSpec,
    store: Rc<dyn KeyValueStore>,
    ai: Option<Rc<dyn AiAssist>>,
    rows: Vec<CargoRow>,
    /// Most recently added row; the target of "remove selected".
    selected: Option<usize>,
    undo_stack: Vec<Vec<CargoRow>>,
    redo_stack: Vec<Vec<CargoRow>>,
}

impl MemoryGrid {
    pub fn new(spec: GridSpec, store: Rc<dyn KeyValueStore>, ai: Option<Rc<dyn AiAssist>>) -> Self {
        Self {
            spec,
            store,
            ai,
            rows: Vec::new(),
            selected: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    fn storage_key(&self) -> &str {
        &self.spec.config.storage_keys.cargo_data
    }

    fn record(&mut self) {
        if self.undo_stack.len() == MAX_HISTORY {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(self.rows.clone());
        self.redo_stack.clear();
    }
}

impl GridManager for MemoryGrid {
    fn initialize(&mut self) -> Result<()> {
        if self.spec.config.columns.is_empty() {
            return Err(anyhow!(
                "grid {} has no columns to render",
                self.spec.container_id
            ));
        }
        tracing::debug!(
            container = %self.spec.container_id,
            columns = self.spec.config.columns.len(),
            "grid initialized"
        );
        Ok(())
    }

    fn data(&self) -> Vec<CargoRow> {
        self.rows
            .iter()
            .filter(|row| !row_is_blank(row))
            .cloned()
            .collect()
    }

    fn load_saved(&mut self) -> Result<bool> {
        let Some(text) = self.store.get(self.storage_key())? else {
            return Ok(false);
        };
        let rows: Vec<CargoRow> =
            serde_json::from_str(&text).context("parse saved cargo data")?;
        if rows.is_empty() {
            return Ok(false);
        }
        tracing::info!(rows = rows.len(), "loaded saved cargo data");
        self.rows = rows;
        self.selected = None;
        Ok(true)
    }

    fn save(&mut self) -> Result<()> {
        let text = serde_json::to_string(&self.data()).context("serialize cargo data")?;
        self.store.set(self.storage_key(), &text)
    }

    fn clear_data(&mut self) {
        self.record();
        self.rows.clear();
        self.selected = None;
        if let Err(err) = self.store.remove(self.storage_key()) {
            tracing::warn!(error = %format!("{err:#}"), "discard saved cargo data");
        }
    }

    fn discard_saved(&mut self) {
        self.clear_data();
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn add_row(&mut self) {
        self.record();
        self.rows.push(self.spec.config.default_row.clone());
        self.selected = Some(self.rows.len() - 1);
    }

    fn remove_selected_rows(&mut self) {
        let Some(index) = self.selected.filter(|index| *index < self.rows.len()) else {
            tracing::debug!("no row selected");
            return;
        };
        self.record();
        self.rows.remove(index);
        self.selected = None;
    }

    fn undo(&mut self) {
        if let Some(previous) = self.undo_stack.pop() {
            let current = std::mem::replace(&mut self.rows, previous);
            self.redo_stack.push(current);
            self.selected = None;
        }
    }

    fn redo(&mut self) {
        if let Some(next) = self.redo_stack.pop() {
            let current = std::mem::replace(&mut self.rows, next);
            self.undo_stack.push(current);
            self.selected = None;
        }
    }

    fn show_ai_fill_modal(&mut self) -> Result<()> {
        let ai = self
            .ai
            .clone()
            .ok_or_else(|| anyhow!("AI assist service is not available"))?;
        let thresholds = self.spec.config.ai.confidence_thresholds;

        let mut fills = Vec::new();
        for (index, row) in self.rows.iter().enumerate() {
            if row_is_blank(row) {
                continue;
            }
            for column in self.spec.config.columns.iter().filter(|c| c.ai_assisted) {
                if !is_blank(row.get(&column.key)) {
                    continue;
                }
                match ai.suggest(row, &column.key) {
                    Ok(suggestion)
                        if ConfidenceBand::classify(suggestion.confidence, &thresholds)
                            >= ConfidenceBand::Medium =>
                    {
                        fills.push((index, column.key.clone(), suggestion.value));
                    }
                    Ok(suggestion) => tracing::debug!(
                        field = %column.key,
                        confidence = suggestion.confidence,
                        "suggestion below medium confidence"
                    ),
                    Err(err) => tracing::warn!(
                        field = %column.key,
                        error = %format!("{err:#}"),
                        "AI suggestion failed"
                    ),
                }
            }
        }

        tracing::info!(filled = fills.len(), "AI fill complete");
        if fills.is_empty() {
            return Ok(());
        }
        self.record();
        for (index, key, value) in fills {
            self.rows[index].insert(key, value);
        }
        Ok(())
    }

    fn set_data_from_file(&mut self, rows: Vec<CargoRow>) {
        self.record();
        self.rows = rows;
        self.selected = None;
    }

    fn validation_status(&self) -> ValidationStatus {
        validate_rows(&self.data(), &self.spec.config)
    }

    fn create_preview_table(&mut self, container_id: &str) {
        tracing::info!(
            container = %container_id,
            rows = self.data().len(),
            "preview table built"
        );
    }

    fn update_data_stats(&mut self, rows: &[CargoRow]) {
        let stats = summarize(rows);
        tracing::info!(
            items = stats.items,
            total_quantity = stats.total_quantity,
            total_weight_kg = stats.total_weight_kg,
            "data statistics updated"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fallback_config;
    use crate::grid::GRID_CONTAINER_ID;
    use crate::services::Suggestion;
    use crate::storage::MemoryStore;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn grid_with(store: Rc<dyn KeyValueStore>, ai: Option<Rc<dyn AiAssist>>) -> MemoryGrid {
        let spec = GridSpec {
            container_id: GRID_CONTAINER_ID.to_string(),
            config: Arc::new(fallback_config()),
        };
        let mut grid = MemoryGrid::new(spec, store, ai);
        grid.initialize().expect("initialize");
        grid
    }

    fn named(name: &str) -> CargoRow {
        let mut row = fallback_config().default_row;
        row.insert("name".to_string(), json!(name));
        row
    }

    struct FixedAi {
        confidence: f64,
    }

    impl AiAssist for FixedAi {
        fn suggest(&self, _row: &CargoRow, field: &str) -> Result<Suggestion> {
            Ok(Suggestion {
                value: json!(format!("{field}-guess")),
                confidence: self.confidence,
            })
        }
    }

    #[test]
    fn blank_rows_are_not_data() {
        let mut grid = grid_with(Rc::new(MemoryStore::default()), None);
        grid.add_row();
        assert!(grid.data().is_empty());
    }

    #[test]
    fn undo_and_redo_walk_history() {
        let mut grid = grid_with(Rc::new(MemoryStore::default()), None);
        grid.set_data_from_file(vec![named("A")]);
        grid.set_data_from_file(vec![named("A"), named("B")]);

        grid.undo();
        assert_eq!(grid.data().len(), 1);
        grid.redo();
        assert_eq!(grid.data().len(), 2);
        grid.undo();
        grid.undo();
        assert!(grid.data().is_empty());
    }

    #[test]
    fn discarded_session_cannot_be_undone() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::default());
        let mut saved = grid_with(store.clone(), None);
        saved.set_data_from_file(vec![named("A"), named("B")]);
        saved.save().expect("save");

        let mut grid = grid_with(store.clone(), None);
        assert!(grid.load_saved().expect("load"));
        grid.discard_saved();
        grid.undo();

        assert!(grid.data().is_empty());
        assert_eq!(store.get(grid.storage_key()).expect("get"), None);
    }

    #[test]
    fn remove_selected_targets_last_added_row() {
        let mut grid = grid_with(Rc::new(MemoryStore::default()), None);
        grid.set_data_from_file(vec![named("A")]);
        grid.add_row();
        assert_eq!(grid.rows.len(), 2);

        grid.remove_selected_rows();
        assert_eq!(grid.rows.len(), 1);
        grid.remove_selected_rows();
        assert_eq!(grid.rows.len(), 1);
    }

    #[test]
    fn save_then_load_in_fresh_grid() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::default());
        let mut grid = grid_with(store.clone(), None);
        grid.set_data_from_file(vec![named("A"), named("B")]);
        grid.save().expect("save");

        let mut reloaded = grid_with(store, None);
        assert!(reloaded.load_saved().expect("load"));
        assert_eq!(reloaded.data(), grid.data());
    }

    #[test]
    fn clear_discards_saved_copy() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::default());
        let mut grid = grid_with(store.clone(), None);
        grid.set_data_from_file(vec![named("A")]);
        grid.save().expect("save");

        grid.clear_data();
        assert!(grid.data().is_empty());
        assert!(!grid_with(store, None).load_saved().expect("load"));
    }

    #[test]
    fn ai_fill_requires_service() {
        let mut grid = grid_with(Rc::new(MemoryStore::default()), None);
        let err = grid.show_ai_fill_modal().expect_err("no AI service");
        assert!(err.to_string().contains("not available"));
    }

    #[test]
    fn ai_fill_only_applies_confident_suggestions() {
        let confident: Rc<dyn AiAssist> = Rc::new(FixedAi { confidence: 0.9 });
        let mut grid = grid_with(Rc::new(MemoryStore::default()), Some(confident));
        grid.set_data_from_file(vec![named("A")]);
        grid.show_ai_fill_modal().expect("fill");
        let row = &grid.data()[0];
        assert_eq!(row["fragility"], json!("fragility-guess"));
        assert_eq!(row["loadBear"], json!("loadBear-guess"));
        assert_eq!(row["bundle"], json!(""));

        let unsure: Rc<dyn AiAssist> = Rc::new(FixedAi { confidence: 0.2 });
        let mut grid = grid_with(Rc::new(MemoryStore::default()), Some(unsure));
        grid.set_data_from_file(vec![named("A")]);
        grid.show_ai_fill_modal().expect("fill");
        assert_eq!(grid.data()[0]["fragility"], json!(""));
    }

    #[test]
    fn summarize_weights_by_quantity() {
        let mut row = named("A");
        row.insert("quantity".to_string(), json!("3"));
        row.insert("weight".to_string(), json!(2.5));
        let mut other = named("B");
        other.insert("quantity".to_string(), Value::Null);

        let stats = summarize(&[row, other]);
        assert_eq!(stats.items, 2);
        assert!((stats.total_quantity - 3.0).abs() < 1e-9);
        assert!((stats.total_weight_kg - 7.5).abs() < 1e-9);
    }
}
