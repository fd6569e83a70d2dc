//! Intent handlers. Each converts collaborator failures into operator
//! notifications and leaves grid state unchanged on failure.
use super::gate::validation_summary;
use super::{ExportFormat, Orchestrator, Outcome};
use crate::notify::{Icon, Modal, Toast};
use crate::services::ExportService;
use crate::util::plural;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

const OFFLINE_TOAST_TIMER: Duration = Duration::from_millis(3000);

impl Orchestrator {
    pub(super) fn handle_save(&mut self) -> Outcome {
        let rows = self.grid.data();
        if rows.is_empty() {
            self.ui.toast(Toast::new(
                "No Data to Save",
                "Please add some cargo items before saving.",
                Icon::Info,
            ));
            return Outcome::Handled;
        }

        match self.grid.save() {
            Ok(()) => {
                tracing::info!(rows = rows.len(), "cargo data saved");
                self.ui.toast(Toast::new(
                    "Saved",
                    format!(
                        "Your cargo data ({}) has been saved locally.",
                        plural(rows.len(), "item", "items")
                    ),
                    Icon::Success,
                ));
            }
            Err(err) => {
                tracing::error!(error = %format!("{err:#}"), "save failed");
                self.ui.toast(Toast::new(
                    "Save Failed",
                    "Your cargo data could not be saved.",
                    Icon::Error,
                ));
            }
        }
        Outcome::Handled
    }

    pub(super) fn handle_clear_all(&mut self) -> Outcome {
        let choice = self.ui.modal(Modal::confirm(
            "Clear All Data?",
            "This will remove all cargo items. This action cannot be undone.",
            Icon::Warning,
            "Yes, clear it!",
            "Cancel",
        ));
        if !choice.is_confirmed() {
            tracing::debug!(?choice, "clear not confirmed");
            return Outcome::Handled;
        }
        self.grid.clear_data();
        self.ui.toast(Toast::new(
            "Cleared",
            "All cargo data has been cleared.",
            Icon::Success,
        ));
        Outcome::Handled
    }

    pub(super) fn handle_ai_fill(&mut self) -> Outcome {
        if self.services.ai.is_none() {
            self.service_unavailable("AI assist service");
            return Outcome::Handled;
        }
        if let Err(err) = self.grid.show_ai_fill_modal() {
            tracing::error!(error = %format!("{err:#}"), "AI fill failed");
            self.ui.toast(Toast::new(
                "AI Fill Failed",
                "Could not complete AI suggestions.",
                Icon::Error,
            ));
        }
        Outcome::Handled
    }

    pub(super) fn handle_import(&mut self, path: Option<PathBuf>) -> Outcome {
        let Some(path) = path else {
            tracing::debug!("no file selected");
            return Outcome::Handled;
        };
        let Some(export) = self.export_service() else {
            return Outcome::Handled;
        };

        self.ui
            .start_loading("Processing File", "Please wait while we process your file...");
        let imported = export.import_from_file(&path);
        self.ui.stop_loading();

        match imported {
            Ok(rows) => {
                let count = rows.len();
                tracing::info!(path = %path.display(), rows = count, "import complete");
                self.grid.set_data_from_file(rows);
                self.ui.modal(Modal::alert(
                    "Import Successful",
                    format!("Imported {}.", plural(count, "cargo item", "cargo items")),
                    Icon::Success,
                ));
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "import failed");
                self.ui.modal(Modal::alert(
                    "Import Failed",
                    "Could not process the file. Please check the format and try again.",
                    Icon::Error,
                ));
            }
        }
        Outcome::Handled
    }

    pub(super) fn handle_export(&mut self, format: ExportFormat) -> Outcome {
        let Some(export) = self.export_service() else {
            return Outcome::Handled;
        };
        self.run_export(export.as_ref(), format);
        Outcome::Handled
    }

    /// Leave the intake stage, gated on validation and export staleness.
    pub(super) fn handle_continue(&mut self) -> Outcome {
        let status = self.grid.validation_status();
        if status.has_issues() {
            let choice = self.ui.modal(Modal::confirm(
                "Validation Issues Found",
                validation_summary(&status),
                Icon::Warning,
                "Continue to Optimization anyway",
                "Go back and fix issues",
            ));
            if !choice.is_confirmed() {
                tracing::debug!(issues = status.total_issues, "continue cancelled");
                return Outcome::Handled;
            }
            return self.navigate_next();
        }

        let rows = self.grid.data();
        let Some(export) = self.services.export.clone() else {
            return self.navigate_next();
        };
        if !export.is_export_needed(&rows) {
            return self.navigate_next();
        }

        let choice = self.ui.modal(Modal::confirm(
            "Export Recommended",
            "You have not exported your data recently. Would you like to export it now?",
            Icon::Question,
            "Yes, export",
            "Continue without exporting",
        ));
        if !choice.is_confirmed() {
            return self.navigate_next();
        }
        if self.run_export(export.as_ref(), ExportFormat::Excel) {
            self.sleeper.sleep(self.settings.export_settle);
            return self.navigate_next();
        }
        Outcome::Handled
    }

    pub(super) fn handle_review_tab(&mut self) -> Outcome {
        let container = self.settings.preview_container.clone();
        self.grid.create_preview_table(&container);
        let rows = self.grid.data();
        self.grid.update_data_stats(&rows);
        Outcome::Handled
    }

    pub(super) fn handle_toggle_theme(&mut self) -> Outcome {
        match self.theme.toggle(self.store.as_ref()) {
            Ok(theme) => tracing::info!(
                theme = theme.as_str(),
                switcher = theme.switcher_label(),
                "theme switched"
            ),
            Err(err) => {
                tracing::error!(error = %format!("{err:#}"), "persist theme preference");
                self.ui.toast(Toast::new(
                    "Theme Not Saved",
                    "Your theme preference could not be saved.",
                    Icon::Error,
                ));
            }
        }
        Outcome::Handled
    }

    pub(super) fn handle_connection_lost(&mut self) -> Outcome {
        tracing::warn!("network connection lost");
        self.ui.toast(
            Toast::new(
                "Network Connection Lost",
                "You are currently offline. Some features like AI suggestions may not work.",
                Icon::Warning,
            )
            .with_timer(OFFLINE_TOAST_TIMER),
        );
        Outcome::Handled
    }

    /// Export current rows; `true` only when the service reports success.
    fn run_export(&mut self, export: &dyn ExportService, format: ExportFormat) -> bool {
        let rows = self.grid.data();
        let status = self.grid.validation_status();
        let result = match format {
            ExportFormat::Excel => export.export_to_excel(&rows, Some(&status)),
            ExportFormat::Csv => export.export_to_csv(&rows, Some(&status)),
        };
        match result {
            Ok(true) => {
                tracing::info!(format = format.label(), rows = rows.len(), "export complete");
                true
            }
            Ok(false) => {
                tracing::debug!(format = format.label(), "export not completed");
                false
            }
            Err(err) => {
                tracing::error!(format = format.label(), error = %format!("{err:#}"), "export failed");
                self.ui.toast(Toast::new(
                    "Export Failed",
                    format!("Could not export to {}.", format.label()),
                    Icon::Error,
                ));
                false
            }
        }
    }

    fn export_service(&mut self) -> Option<Rc<dyn ExportService>> {
        let export = self.services.export.clone();
        if export.is_none() {
            self.service_unavailable("Export service");
        }
        export
    }

    fn service_unavailable(&mut self, service: &str) {
        tracing::warn!(service, "service not available");
        self.ui.toast(Toast::new(
            "Service Error",
            format!("{service} is not available."),
            Icon::Error,
        ));
    }

    fn navigate_next(&mut self) -> Outcome {
        let target = self.settings.next_stage.clone();
        tracing::info!(target = %target, "continuing to next stage");
        self.navigator.navigate(&target);
        Outcome::Navigated(target)
    }
}
