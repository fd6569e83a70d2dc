//! Command entry points: `vortex check` and `vortex session`.
use super::{
    bootstrap, report_unexpected, Control, Orchestrator, OrchestratorParts, Outcome,
    WorkflowSettings,
};
use crate::cli::{CheckArgs, SessionArgs};
use crate::console::{parse_intent, SessionCommand, SharedConsole};
use crate::grid::{GridManager, MemoryGrid};
use crate::readiness::{wait_for_dependencies, AssetDirContext, ReadinessError};
use crate::services::ServiceFactories;
use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use crate::util::{plural, ThreadSleeper};
use anyhow::Result;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Debug, Serialize)]
struct CheckReport {
    assets: PathBuf,
    ready: bool,
    attempts: u32,
    degraded: bool,
    missing: Vec<&'static str>,
}

/// Poll the asset directory until every capability is present.
pub fn run_check(args: &CheckArgs) -> Result<()> {
    let mut context = AssetDirContext::new(args.assets.clone());
    let outcome = wait_for_dependencies(&mut context, args.poll.settings(), &ThreadSleeper);

    let report = match &outcome {
        Ok(readiness) => CheckReport {
            assets: context.root().to_path_buf(),
            ready: true,
            attempts: readiness.attempts,
            degraded: readiness.degraded,
            missing: Vec::new(),
        },
        Err(ReadinessError::Exhausted {
            attempts,
            missing,
            degraded,
        }) => CheckReport {
            assets: context.root().to_path_buf(),
            ready: false,
            attempts: *attempts,
            degraded: *degraded,
            missing: missing.iter().map(|capability| capability.name()).collect(),
        },
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.ready {
        println!(
            "ready after {}",
            plural(report.attempts as usize, "attempt", "attempts")
        );
        if report.degraded {
            println!("using fallback configuration");
        }
    } else {
        println!("not ready; missing: {}", report.missing.join(", "));
        println!("expected assets under {}:", report.assets.display());
        for rel in AssetDirContext::asset_paths() {
            println!("  {rel}");
        }
    }

    outcome?;
    Ok(())
}

fn open_store(args: &SessionArgs) -> Result<Rc<dyn KeyValueStore>> {
    if args.ephemeral {
        return Ok(Rc::new(MemoryStore::default()));
    }
    let path = match &args.storage {
        Some(path) => path.clone(),
        None => JsonFileStore::default_path()?,
    };
    let store = JsonFileStore::new(path);
    tracing::debug!(path = %store.path().display(), "using durable storage");
    Ok(Rc::new(store))
}

/// Run an interactive session, reading one intent per stdin line until the
/// session navigates away, the operator quits, or input ends.
pub fn run_session(args: &SessionArgs) -> Result<()> {
    let store = open_store(args)?;
    let console = SharedConsole::new(io::stdin().lock(), io::stdout());

    let mut context = AssetDirContext::new(args.assets.clone());
    let mut ui = console.clone();
    let ready = bootstrap(
        &mut context,
        args.poll.settings(),
        &ThreadSleeper,
        &ServiceFactories::default(),
        &mut ui,
    )?;
    tracing::debug!(
        attempts = ready.attempts,
        degraded = ready.degraded,
        "dependencies ready"
    );

    let grid_store = store.clone();
    let ai = ready.services.ai.clone();
    let parts = OrchestratorParts {
        config: ready.config,
        services: ready.services,
        ui: Box::new(ui),
        navigator: Box::new(console.clone()),
        store,
        sleeper: Box::new(ThreadSleeper),
        settings: WorkflowSettings::default(),
    };
    let mut orchestrator = Orchestrator::start(parts, move |spec| {
        let grid: Box<dyn GridManager> = Box::new(MemoryGrid::new(spec, grid_store, ai));
        Ok(grid)
    })?;
    orchestrator.attach(Control::ALL);
    tracing::info!(theme = orchestrator.theme().as_str(), "session started");

    let mut reporter = console.clone();
    while let Some(line) = console.read_line()? {
        let intent = match parse_intent(&line) {
            Ok(Some(SessionCommand::Intent(intent))) => intent,
            Ok(Some(SessionCommand::Quit)) => break,
            Ok(None) => continue,
            Err(err) => {
                console.emit(&format!("[error] {err}"));
                continue;
            }
        };
        match orchestrator.dispatch(intent) {
            Ok(Outcome::Navigated(_)) => break,
            Ok(Outcome::Handled) => {}
            Ok(Outcome::Ignored) => console.emit("[info] control not available"),
            Err(err) => report_unexpected(&mut reporter, &err),
        }
    }
    Ok(())
}
