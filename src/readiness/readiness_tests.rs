use super::{
    check_dependencies, wait_for_dependencies, Capability, ExecutionContext, PollSettings,
    ReadinessError,
};
use crate::config::{fallback_config, Configuration};
use crate::util::Sleeper;
use std::cell::{Cell, RefCell};
use std::sync::Arc;
use std::time::Duration;

/// Libraries appear on the `ready_at`-th check; `None` means never.
struct FakeContext {
    ready_at: Option<u32>,
    checks: Cell<u32>,
    configuration: Option<Arc<Configuration>>,
    installs: u32,
}

impl FakeContext {
    fn new(ready_at: Option<u32>, configuration: Option<Configuration>) -> Self {
        Self {
            ready_at,
            checks: Cell::new(0),
            configuration: configuration.map(Arc::new),
            installs: 0,
        }
    }
}

impl ExecutionContext for FakeContext {
    fn is_present(&self, capability: Capability) -> bool {
        if capability == Capability::GridWidget {
            self.checks.set(self.checks.get() + 1);
        }
        self.ready_at
            .is_some_and(|ready_at| self.checks.get() >= ready_at)
    }

    fn configuration(&mut self) -> Option<Arc<Configuration>> {
        self.configuration.clone()
    }

    fn install_configuration(&mut self, config: Configuration) -> Arc<Configuration> {
        self.installs += 1;
        let config = Arc::new(config);
        self.configuration = Some(config.clone());
        config
    }
}

#[derive(Default)]
struct RecordingSleeper {
    sleeps: RefCell<Vec<Duration>>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}

fn settings(max_retries: u32, delay_ms: u64) -> PollSettings {
    PollSettings {
        max_retries,
        retry_delay: Duration::from_millis(delay_ms),
    }
}

#[test]
fn resolves_once_capabilities_appear_within_budget() {
    let mut context = FakeContext::new(Some(3), Some(fallback_config()));
    let sleeper = RecordingSleeper::default();

    let readiness =
        wait_for_dependencies(&mut context, settings(10, 500), &sleeper).expect("ready");

    assert_eq!(readiness.attempts, 3);
    assert!(!readiness.degraded);
    assert_eq!(context.checks.get(), 3);
    assert_eq!(*sleeper.sleeps.borrow(), vec![Duration::from_millis(500); 3]);
}

#[test]
fn fallback_is_synthesized_once_and_not_reported_missing() {
    let mut context = FakeContext::new(Some(1), None);

    let first = check_dependencies(&mut context);
    assert!(first.fallback_synthesized);
    assert!(first.is_ready());
    assert!(!first.missing.contains(&Capability::Configuration));

    let second = check_dependencies(&mut context);
    assert!(!second.fallback_synthesized);
    assert_eq!(context.installs, 1);
}

#[test]
fn fallback_does_not_mask_missing_libraries() {
    let mut context = FakeContext::new(None, None);

    let report = check_dependencies(&mut context);
    assert!(report.fallback_synthesized);
    assert_eq!(
        report.missing,
        vec![
            Capability::GridWidget,
            Capability::ModalToolkit,
            Capability::DialogLibrary
        ]
    );
}

#[test]
fn exhaustion_stops_after_exactly_max_retries() {
    let mut context = FakeContext::new(None, Some(fallback_config()));
    let sleeper = RecordingSleeper::default();

    let err = wait_for_dependencies(&mut context, settings(3, 10), &sleeper)
        .expect_err("never ready");

    let ReadinessError::Exhausted {
        attempts,
        missing,
        degraded,
    } = &err;
    assert_eq!(*attempts, 3);
    assert!(!*degraded);
    assert!(missing.contains(&Capability::GridWidget));
    assert_eq!(context.checks.get(), 3);
    assert_eq!(sleeper.sleeps.borrow().len(), 3);
    assert!(err.to_string().contains("after 3 attempts: grid-widget"));
}

#[test]
fn degraded_wait_reports_fallback_in_use() {
    let mut context = FakeContext::new(Some(2), None);
    let sleeper = RecordingSleeper::default();

    let readiness =
        wait_for_dependencies(&mut context, settings(5, 1), &sleeper).expect("ready");

    assert!(readiness.degraded);
    assert_eq!(readiness.attempts, 2);
    assert_eq!(*readiness.configuration, fallback_config());
    assert_eq!(context.installs, 1);
}

#[test]
fn exhaustion_remembers_fallback_install() {
    let mut context = FakeContext::new(None, None);
    let sleeper = RecordingSleeper::default();

    let err = wait_for_dependencies(&mut context, settings(2, 1), &sleeper)
        .expect_err("never ready");

    let ReadinessError::Exhausted { degraded, .. } = err;
    assert!(degraded);
    assert_eq!(context.installs, 1);
}

#[test]
fn zero_retries_still_checks_once() {
    let mut context = FakeContext::new(Some(1), Some(fallback_config()));
    let sleeper = RecordingSleeper::default();

    let readiness =
        wait_for_dependencies(&mut context, settings(0, 1), &sleeper).expect("ready");
    assert_eq!(readiness.attempts, 1);
}
