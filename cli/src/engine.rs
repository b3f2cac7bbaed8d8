//! The engine façade: load state, reconcile, run init scripts.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::cache::ActionLog;
use crate::config::{Config, Layout, Subdir};
use crate::exec::Executor;
use crate::logging::Log;
use crate::resources::script::ScriptOutput;
use crate::tasks::copy::CopyFiles;
use crate::tasks::init::RunInitScripts;
use crate::tasks::link::LinkFiles;
use crate::tasks::menu::MenuPrompt;
use crate::tasks::{self, Context, Task, TaskStats};

/// One step of a run. Steps always execute in the order of [`Phase::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Copy files from `copy/`.
    Copy,
    /// Link files from `link/`.
    Link,
    /// Run scripts from `init/`.
    Init,
}

impl Phase {
    /// Every phase, in execution order.
    pub const ALL: [Self; 3] = [Self::Copy, Self::Link, Self::Init];

    /// Managed directory this phase reads.
    #[must_use]
    pub const fn subdir(self) -> Subdir {
        match self {
            Self::Copy => Subdir::Copy,
            Self::Link => Subdir::Link,
            Self::Init => Subdir::Init,
        }
    }

    fn task(self) -> Box<dyn Task> {
        match self {
            Self::Copy => Box::new(CopyFiles),
            Self::Link => Box::new(LinkFiles),
            Self::Init => Box::new(RunInitScripts),
        }
    }
}

/// What a single [`Engine::run`] should do.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory managed files are materialised into (normally `$HOME`).
    pub root: PathBuf,
    /// Forget the action log before running.
    pub invalidate_cache: bool,
    /// Phases to execute.
    pub phases: Vec<Phase>,
}

impl RunOptions {
    /// Run every phase against `root`, keeping the action log.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            invalidate_cache: false,
            phases: Phase::ALL.to_vec(),
        }
    }

    /// Set whether to invalidate the action log first.
    #[must_use]
    pub fn with_invalidate(mut self, invalidate: bool) -> Self {
        self.invalidate_cache = invalidate;
        self
    }

    /// Restrict the run to one phase.
    #[must_use]
    pub fn only(mut self, phase: Phase) -> Self {
        self.phases = vec![phase];
        self
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Copy counters, if the phase ran.
    pub copy: Option<TaskStats>,
    /// Link counters, if the phase ran.
    pub link: Option<TaskStats>,
    /// Init counters, if the phase ran.
    pub init: Option<TaskStats>,
    /// Output captured from init scripts (empty when streams are inherited).
    pub output: String,
}

impl RunReport {
    fn slot(&mut self, phase: Phase) -> &mut Option<TaskStats> {
        match phase {
            Phase::Copy => &mut self.copy,
            Phase::Link => &mut self.link,
            Phase::Init => &mut self.init,
        }
    }

    /// Total per-item failures across phases.
    #[must_use]
    pub fn failures(&self) -> u32 {
        [self.copy, self.link, self.init]
            .iter()
            .flatten()
            .map(|s| s.failed)
            .sum()
    }
}

/// Dotfiles engine: owns its collaborators, builds fresh state on every run.
pub struct Engine {
    log: Arc<dyn Log>,
    executor: Arc<dyn Executor>,
    prompt: Arc<dyn MenuPrompt>,
    script_output: ScriptOutput,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("executor", &self.executor)
            .field("script_output", &self.script_output)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create an engine whose init scripts share this process's streams.
    #[must_use]
    pub fn new(
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
        prompt: Arc<dyn MenuPrompt>,
    ) -> Self {
        Self {
            log,
            executor,
            prompt,
            script_output: ScriptOutput::Inherit,
        }
    }

    /// Route init script output.
    #[must_use]
    pub fn with_script_output(mut self, output: ScriptOutput) -> Self {
        self.script_output = output;
        self
    }

    /// Load the action log and managed files under `opts.root`, then run the
    /// requested phases in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the action log cannot be read, removed or
    /// written, or if a managed directory cannot be listed. Per-file
    /// failures are only counted in the report.
    pub fn run(&self, opts: &RunOptions) -> Result<RunReport> {
        let layout = Layout::new(&opts.root);
        self.log
            .debug(&format!("base directory: {}", layout.base().display()));

        let mut cache = ActionLog::new(layout.cache_file());
        if opts.invalidate_cache {
            self.log.debug("invalidating action log");
            cache.invalidate()?;
        }
        cache.load()?;

        let config = Config::load(layout)?;
        for warning in config.validate() {
            if opts.phases.iter().any(|p| p.subdir() == warning.subdir) {
                self.log.warn(&warning.message);
            }
        }

        let ctx = Context::new(
            config,
            cache,
            Arc::clone(&self.log),
            Arc::clone(&self.executor),
            Arc::clone(&self.prompt),
        )
        .with_script_output(self.script_output)
        .with_no_cache(opts.invalidate_cache);

        let mut report = RunReport::default();
        let mut phases = opts.phases.clone();
        phases.sort_unstable();
        phases.dedup();
        for phase in phases {
            *report.slot(phase) = tasks::execute(phase.task().as_ref(), &ctx)?;
        }
        report.output = ctx.take_output();

        self.log.header("All done !");
        Ok(report)
    }
}
