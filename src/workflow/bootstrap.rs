//! Startup sequence: wait for dependencies, then build long-lived services.
use crate::config::Configuration;
use crate::notify::{Icon, Modal, Notifier};
use crate::readiness::{wait_for_dependencies, ExecutionContext, PollSettings, ReadinessError};
use crate::services::{initialize_services, ServiceFactories, Services};
use crate::util::Sleeper;
use std::sync::Arc;

/// Everything the orchestrator needs once the gate has opened.
pub struct Bootstrapped {
    pub config: Arc<Configuration>,
    pub services: Services,
    pub attempts: u32,
    /// The fallback configuration is in use.
    pub degraded: bool,
}

/// Run the readiness gate and construct services exactly once.
///
/// Exhaustion shows a blocking error and returns the typed failure; the
/// caller must not start the orchestrator in that case.
pub fn bootstrap(
    context: &mut dyn ExecutionContext,
    poll: PollSettings,
    sleeper: &dyn Sleeper,
    factories: &ServiceFactories,
    ui: &mut dyn Notifier,
) -> Result<Bootstrapped, ReadinessError> {
    let readiness = match wait_for_dependencies(context, poll, sleeper) {
        Ok(readiness) => readiness,
        Err(err) => {
            ui.modal(Modal::alert(
                "Missing Dependencies",
                "Failed to load required scripts. Please check your internet connection and refresh the page.",
                Icon::Error,
            ));
            return Err(err);
        }
    };
    if readiness.degraded {
        tracing::warn!("running with fallback configuration");
    }

    let services = initialize_services(factories, &readiness.configuration);
    Ok(Bootstrapped {
        config: readiness.configuration,
        services,
        attempts: readiness.attempts,
        degraded: readiness.degraded,
    })
}
