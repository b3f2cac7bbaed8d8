//! `run`, `copy`, `link` and `init`: drive the engine.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::engine::{Engine, Phase, RunOptions};
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger};
use crate::tasks::menu::StdinPrompt;

/// Run the given phases (all of them when `phase` is `None`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be resolved or the engine
/// hits a fatal error.
pub fn run(global: &GlobalOpts, phase: Option<Phase>, log: &Arc<Logger>) -> Result<()> {
    let layout = super::resolve_layout(global)?;

    let mut opts = RunOptions::new(layout.root()).with_invalidate(global.no_cache);
    if let Some(phase) = phase {
        opts = opts.only(phase);
    }

    let engine = Engine::new(
        Arc::clone(log) as Arc<dyn Log>,
        Arc::new(SystemExecutor),
        Arc::new(StdinPrompt),
    );
    let report = engine.run(&opts)?;

    log.print_summary();
    if report.failures() > 0 {
        log.warn(&format!("{} item(s) failed, see above", report.failures()));
    }
    Ok(())
}
