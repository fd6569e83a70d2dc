//! Long-lived collaborator services and their best-effort construction.
//!
//! Either service may be missing for a whole session. Handlers hold the
//! `Option` handles and check them at call time.
use crate::config::{Configuration, ConfidenceThresholds};
use crate::grid::{CargoRow, ValidationStatus};
use anyhow::Result;
use serde_json::Value;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// A suggested cell value and how sure the model is about it.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub value: Value,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

impl ConfidenceBand {
    /// Place `confidence` in the highest band whose lower edge it reaches.
    pub fn classify(confidence: f64, thresholds: &ConfidenceThresholds) -> Self {
        if confidence >= thresholds.high {
            ConfidenceBand::High
        } else if confidence >= thresholds.medium {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

/// Field suggestions for AI-assisted columns.
pub trait AiAssist {
    fn suggest(&self, row: &CargoRow, field: &str) -> Result<Suggestion>;
}

/// Built by export service implementations; the headless session registers none.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("malformed file: {0}")]
    Malformed(String),
}

/// File import/export and the export staleness check.
pub trait ExportService {
    fn import_from_file(&self, path: &Path) -> Result<Vec<CargoRow>, ImportError>;
    /// `Ok(false)` when the export did not happen (e.g. the save was abandoned).
    fn export_to_excel(
        &self,
        rows: &[CargoRow],
        status: Option<&ValidationStatus>,
    ) -> Result<bool>;
    fn export_to_csv(&self, rows: &[CargoRow], status: Option<&ValidationStatus>)
        -> Result<bool>;
    /// Whether `rows` changed materially since the last export.
    fn is_export_needed(&self, rows: &[CargoRow]) -> bool;
}

pub type AiFactory = Box<dyn Fn(&Configuration) -> Result<Rc<dyn AiAssist>>>;
pub type ExportFactory = Box<dyn Fn(&Configuration) -> Result<Rc<dyn ExportService>>>;

/// Constructors available in the execution context.
#[derive(Default)]
pub struct ServiceFactories {
    pub ai: Option<AiFactory>,
    pub export: Option<ExportFactory>,
}

/// Service handles handed to the grid and the orchestrator.
#[derive(Clone, Default)]
pub struct Services {
    pub ai: Option<Rc<dyn AiAssist>>,
    pub export: Option<Rc<dyn ExportService>>,
}

/// Build whichever services have constructors; absence and construction
/// failures are logged, never raised.
pub fn initialize_services(factories: &ServiceFactories, config: &Configuration) -> Services {
    let ai = construct("AI assist", factories.ai.as_deref(), config);
    let export = construct("export", factories.export.as_deref(), config);
    Services { ai, export }
}

fn construct<T: ?Sized>(
    name: &str,
    factory: Option<&dyn Fn(&Configuration) -> Result<Rc<T>>>,
    config: &Configuration,
) -> Option<Rc<T>> {
    let Some(factory) = factory else {
        tracing::warn!(service = name, "service not available");
        return None;
    };
    match factory(config) {
        Ok(service) => {
            tracing::info!(service = name, "service initialized");
            Some(service)
        }
        Err(err) => {
            tracing::error!(service = name, error = %format!("{err:#}"), "service construction failed");
            None
        }
    }
}
