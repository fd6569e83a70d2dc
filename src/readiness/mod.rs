//! Readiness gate: bounded polling for asynchronously provisioned capabilities.
//!
//! There is no reliable "loaded" signal for the capabilities, so the gate polls
//! on a fixed cadence with a retry ceiling. A missing configuration is the one
//! failure it repairs itself, by installing the fallback configuration.
mod assets;

pub use assets::AssetDirContext;

use crate::config::{fallback_config, Configuration};
use crate::util::Sleeper;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MAX_RETRIES: u32 = 10;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Something the session needs before interactive handlers attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    GridWidget,
    ModalToolkit,
    DialogLibrary,
    Configuration,
}

impl Capability {
    pub const REQUIRED: [Capability; 4] = [
        Capability::GridWidget,
        Capability::ModalToolkit,
        Capability::DialogLibrary,
        Capability::Configuration,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Capability::GridWidget => "grid-widget",
            Capability::ModalToolkit => "modal-toolkit",
            Capability::DialogLibrary => "dialog-library",
            Capability::Configuration => "configuration",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where capabilities are looked up.
pub trait ExecutionContext {
    /// Presence of a library capability. `Capability::Configuration` is
    /// answered by `configuration` instead.
    fn is_present(&self, capability: Capability) -> bool;
    /// The session configuration, once one is loadable or installed.
    fn configuration(&mut self) -> Option<Arc<Configuration>>;
    /// Install `config` as the session configuration and return the frozen handle.
    fn install_configuration(&mut self, config: Configuration) -> Arc<Configuration>;
}

/// Result of one readiness check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReadinessReport {
    pub missing: Vec<Capability>,
    /// The fallback configuration was installed during this check.
    pub fallback_synthesized: bool,
}

impl ReadinessReport {
    pub fn is_ready(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

/// A successful wait.
#[derive(Debug, Clone)]
pub struct Readiness {
    pub configuration: Arc<Configuration>,
    /// Checks performed, including the successful one.
    pub attempts: u32,
    /// The fallback configuration is in use.
    pub degraded: bool,
}

#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error(
        "dependencies still missing after {attempts} attempts: {}",
        describe_missing(.missing)
    )]
    Exhausted {
        attempts: u32,
        missing: Vec<Capability>,
        /// The fallback configuration was installed while polling.
        degraded: bool,
    },
}

fn describe_missing(missing: &[Capability]) -> String {
    missing
        .iter()
        .map(|capability| capability.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check every required capability once.
///
/// A missing configuration is replaced by the fallback as a side effect and is
/// not reported missing. Once installed, later checks see it as present.
pub fn check_dependencies(context: &mut dyn ExecutionContext) -> ReadinessReport {
    let missing: Vec<Capability> = Capability::REQUIRED
        .into_iter()
        .filter(|capability| {
            *capability != Capability::Configuration && !context.is_present(*capability)
        })
        .collect();

    let mut fallback_synthesized = false;
    if context.configuration().is_none() {
        tracing::warn!("configuration not loaded, installing fallback configuration");
        context.install_configuration(fallback_config());
        fallback_synthesized = true;
    }

    if !missing.is_empty() {
        tracing::debug!(missing = %describe_missing(&missing), "dependencies missing");
    }
    ReadinessReport {
        missing,
        fallback_synthesized,
    }
}

/// Poll `check_dependencies` every `retry_delay` until it succeeds or
/// `max_retries` checks have run. At least one check always runs.
pub fn wait_for_dependencies(
    context: &mut dyn ExecutionContext,
    settings: PollSettings,
    sleeper: &dyn Sleeper,
) -> Result<Readiness, ReadinessError> {
    let max_attempts = settings.max_retries.max(1);
    let mut degraded = false;
    let mut missing = Vec::new();

    for attempt in 1..=max_attempts {
        sleeper.sleep(settings.retry_delay);
        let report = check_dependencies(context);
        degraded |= report.fallback_synthesized;
        if report.is_ready() {
            let configuration = match context.configuration() {
                Some(config) => config,
                None => context.install_configuration(fallback_config()),
            };
            tracing::info!(attempts = attempt, degraded, "all dependencies loaded");
            return Ok(Readiness {
                configuration,
                attempts: attempt,
                degraded,
            });
        }
        missing = report.missing;
    }

    tracing::error!(
        attempts = max_attempts,
        missing = %describe_missing(&missing),
        "failed to load all dependencies"
    );
    Err(ReadinessError::Exhausted {
        attempts: max_attempts,
        missing,
        degraded,
    })
}

#[cfg(test)]
#[path = "readiness_tests.rs"]
mod tests;
