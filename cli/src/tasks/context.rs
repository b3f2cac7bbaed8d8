//! Shared execution context for tasks.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cache::ActionLog;
use crate::config::{Config, Layout};
use crate::exec::Executor;
use crate::logging::Log;
use crate::resources::script::ScriptOutput;

use super::menu::MenuPrompt;

/// Shared context for task execution.
pub struct Context {
    /// Layout and managed-file lists for this run.
    pub config: Config,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Source of the init menu answers.
    pub prompt: Arc<dyn MenuPrompt>,
    /// Where init script output goes.
    pub script_output: ScriptOutput,
    /// Select every init script by default, ignoring what already ran.
    pub no_cache: bool,
    cache: Mutex<ActionLog>,
    output: Mutex<String>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("log", &"<dyn Log>")
            .field("executor", &self.executor)
            .field("prompt", &"<dyn MenuPrompt>")
            .field("script_output", &self.script_output)
            .field("no_cache", &self.no_cache)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Creates a new context for task execution.
    #[must_use]
    pub fn new(
        config: Config,
        cache: ActionLog,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
        prompt: Arc<dyn MenuPrompt>,
    ) -> Self {
        Self {
            config,
            log,
            executor,
            prompt,
            script_output: ScriptOutput::default(),
            no_cache: false,
            cache: Mutex::new(cache),
            output: Mutex::new(String::new()),
        }
    }

    /// Route init script output.
    #[must_use]
    pub fn with_script_output(mut self, output: ScriptOutput) -> Self {
        self.script_output = output;
        self
    }

    /// Treat the action log as empty when choosing init defaults.
    #[must_use]
    pub fn with_no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }

    /// Resolved paths.
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.config.layout
    }

    /// Exclusive access to the action log.
    ///
    /// Recovers from a poisoned lock (which can only occur if a previous task
    /// panicked) by consuming the poison and returning the inner value.
    pub fn cache(&self) -> MutexGuard<'_, ActionLog> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append captured script output.
    pub fn append_output(&self, text: &str) {
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(text);
    }

    /// Take everything captured so far, leaving the buffer empty.
    #[must_use]
    pub fn take_output(&self) -> String {
        std::mem::take(&mut *self.output.lock().unwrap_or_else(PoisonError::into_inner))
    }
}
