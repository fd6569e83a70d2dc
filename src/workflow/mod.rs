//! Workflow orchestration for the intake session.
//!
//! The orchestrator turns operator intents into grid and export-service calls,
//! applying confirmation and validation gating uniformly. Every collaborator
//! is injected at startup; optional services are checked at call time.
mod bootstrap;
mod gate;
mod handlers;
mod intents;
mod run;

pub use bootstrap::bootstrap;
pub use intents::{Control, ExportFormat, Intent, Outcome};
pub use run::{run_check, run_session};

use crate::config::Configuration;
use crate::grid::{GridManager, GridSpec, GRID_CONTAINER_ID, PREVIEW_CONTAINER_ID};
use crate::notify::{Icon, Modal, ModalChoice, Navigator, Notifier, Toast};
use crate::services::Services;
use crate::storage::KeyValueStore;
use crate::theme::{Theme, ThemeState};
use crate::util::Sleeper;
use anyhow::Result;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Stage the "continue" control leads to.
pub const NEXT_STAGE: &str = "../optimization/index.html";
/// Pause after a prompted export so its save dialog can settle.
pub const EXPORT_SETTLE_DELAY: Duration = Duration::from_millis(1000);
/// Times the restore prompt is re-shown when dismissed without a choice.
const RESTORE_PROMPT_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    pub grid_container: String,
    pub preview_container: String,
    pub next_stage: String,
    pub export_settle: Duration,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            grid_container: GRID_CONTAINER_ID.to_string(),
            preview_container: PREVIEW_CONTAINER_ID.to_string(),
            next_stage: NEXT_STAGE.to_string(),
            export_settle: EXPORT_SETTLE_DELAY,
        }
    }
}

/// Collaborators handed to `Orchestrator::start`.
pub struct OrchestratorParts {
    pub config: Arc<Configuration>,
    pub services: Services,
    pub ui: Box<dyn Notifier>,
    pub navigator: Box<dyn Navigator>,
    pub store: Rc<dyn KeyValueStore>,
    pub sleeper: Box<dyn Sleeper>,
    pub settings: WorkflowSettings,
}

#[derive(Debug, Error)]
pub enum StartError {
    #[error("grid initialization failed: {0:#}")]
    Grid(anyhow::Error),
}

pub struct Orchestrator {
    grid: Box<dyn GridManager>,
    services: Services,
    ui: Box<dyn Notifier>,
    navigator: Box<dyn Navigator>,
    store: Rc<dyn KeyValueStore>,
    sleeper: Box<dyn Sleeper>,
    settings: WorkflowSettings,
    theme: ThemeState,
    attached: BTreeSet<Control>,
}

impl Orchestrator {
    /// Build and initialize the grid, restore the theme, and offer to restore
    /// a saved session.
    ///
    /// A grid that fails to build or initialize is unrecoverable: the operator
    /// gets a blocking error and no orchestrator is returned.
    pub fn start<F>(parts: OrchestratorParts, build_grid: F) -> Result<Self, StartError>
    where
        F: FnOnce(GridSpec) -> Result<Box<dyn GridManager>>,
    {
        let OrchestratorParts {
            config,
            services,
            mut ui,
            navigator,
            store,
            sleeper,
            settings,
        } = parts;

        let spec = GridSpec {
            container_id: settings.grid_container.clone(),
            config: config.clone(),
        };
        let built = build_grid(spec).and_then(|mut grid| {
            grid.initialize()?;
            Ok(grid)
        });
        let grid = match built {
            Ok(grid) => grid,
            Err(err) => {
                tracing::error!(error = %format!("{err:#}"), "grid initialization failed");
                ui.modal(Modal::alert(
                    "Initialization Error",
                    "There was an error starting the application. Please refresh the page.",
                    Icon::Error,
                ));
                return Err(StartError::Grid(err));
            }
        };

        let theme = ThemeState::restore(store.as_ref(), &config.storage_keys.theme);
        let mut orchestrator = Self {
            grid,
            services,
            ui,
            navigator,
            store,
            sleeper,
            settings,
            theme,
            attached: BTreeSet::new(),
        };
        orchestrator.offer_session_restore();
        Ok(orchestrator)
    }

    /// Attach handlers for the controls that exist. Re-attaching is a no-op;
    /// returns how many controls were newly attached.
    pub fn attach(&mut self, controls: impl IntoIterator<Item = Control>) -> usize {
        let mut added = 0;
        for control in controls {
            if self.attached.insert(control) {
                tracing::debug!(?control, "handler attached");
                added += 1;
            }
        }
        added
    }

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    /// Run the handler for `intent`.
    ///
    /// Operation failures are reported to the operator inside the handler;
    /// an `Err` here means an unexpected defect.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Outcome> {
        if let Some(control) = intent.control() {
            if !self.attached.contains(&control) {
                tracing::debug!(?control, "no handler attached");
                return Ok(Outcome::Ignored);
            }
        }

        let outcome = match intent {
            Intent::Save => self.handle_save(),
            Intent::ClearAll => self.handle_clear_all(),
            Intent::AddRow => {
                self.grid.add_row();
                Outcome::Handled
            }
            Intent::RemoveSelected => {
                self.grid.remove_selected_rows();
                Outcome::Handled
            }
            Intent::Undo => {
                self.grid.undo();
                Outcome::Handled
            }
            Intent::Redo => {
                self.grid.redo();
                Outcome::Handled
            }
            Intent::AiFill => self.handle_ai_fill(),
            Intent::Import(path) => self.handle_import(path),
            Intent::Export(format) => self.handle_export(format),
            Intent::Continue => self.handle_continue(),
            Intent::ReviewTab => self.handle_review_tab(),
            Intent::ToggleTheme => self.handle_toggle_theme(),
            Intent::ConnectionLost => self.handle_connection_lost(),
        };
        Ok(outcome)
    }

    /// Ask whether to restore saved rows. The choice is explicit: a dismissed
    /// prompt is shown again, and only after repeated dismissal are the
    /// loaded rows kept.
    fn offer_session_restore(&mut self) {
        match self.grid.load_saved() {
            Ok(true) => {}
            Ok(false) => return,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "saved cargo data unreadable");
                return;
            }
        }

        for _ in 0..RESTORE_PROMPT_ATTEMPTS {
            let choice = self.ui.modal(Modal::confirm(
                "Restore Previous Session?",
                "Cargo data from a previous session was found. Restore it or start with a clean table?",
                Icon::Question,
                "Restore session",
                "Start fresh",
            ));
            match choice {
                ModalChoice::Confirmed => {
                    self.ui.toast(Toast::new(
                        "Session Restored",
                        "Your previous cargo data has been loaded.",
                        Icon::Success,
                    ));
                    return;
                }
                ModalChoice::Cancelled => {
                    self.grid.discard_saved();
                    self.ui.toast(Toast::new(
                        "Fresh Start",
                        "Starting with a clean cargo table.",
                        Icon::Success,
                    ));
                    return;
                }
                ModalChoice::Dismissed => continue,
            }
        }
        tracing::warn!("restore prompt dismissed repeatedly, keeping saved data");
    }
}

/// Last-resort report for defects no handler anticipated.
pub fn report_unexpected(ui: &mut dyn Notifier, err: &anyhow::Error) {
    tracing::error!(error = %format!("{err:#}"), "unexpected error");
    ui.modal(Modal::alert(
        "Application Error",
        "An unexpected error occurred. Please refresh the page.",
        Icon::Error,
    ));
}
