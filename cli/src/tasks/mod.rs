//! Named tasks that orchestrate resource changes, run in a fixed order.
pub mod context;
pub mod copy;
pub mod init;
pub mod link;
pub mod menu;
mod reconcile;

pub use context::Context;

use anyhow::Result;

use crate::logging::TaskStatus;

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use homedots::tasks::{TaskResult, TaskStats};
///
/// let ok = TaskResult::Ok(TaskStats::new());
/// let skipped = TaskResult::Skipped("nothing under copy/".into());
///
/// assert!(matches!(ok, TaskResult::Ok(_)));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task ran; the counters say what happened to each item.
    Ok(TaskStats),
    /// Task had nothing to do.
    Skipped(String),
}

/// Counters for tasks that process many items.
///
/// # Examples
///
/// ```
/// use homedots::tasks::TaskStats;
///
/// let mut stats = TaskStats::new();
/// stats.changed = 3;
/// stats.already_ok = 10;
///
/// assert_eq!(stats.summary(), "3 changed, 10 already ok");
/// ```
///
/// Non-zero backup, skip and failure counts are appended:
///
/// ```
/// use homedots::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 2, skipped: 0, backed_up: 2, failed: 1 };
/// assert_eq!(stats.summary(), "1 changed, 2 already ok, 2 backed up, 1 failed");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of items changed or run.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items left alone (unselected scripts, non-regular sources).
    pub skipped: u32,
    /// Number of destinations moved into `backup/`.
    pub backed_up: u32,
    /// Number of items whose operation failed.
    pub failed: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 failed").
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!("{} changed, {} already ok", self.changed, self.already_ok);
        for (count, label) in [
            (self.skipped, "skipped"),
            (self.backed_up, "backed up"),
            (self.failed, "failed"),
        ] {
            if count > 0 {
                out.push_str(&format!(", {count} {label}"));
            }
        }
        out
    }
}

/// A named, executable task.
pub trait Task {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether there is anything for this task to look at.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// Per-item failures are counted in [`TaskStats::failed`]; an `Err` means
    /// the run cannot continue (for example, the action log cannot be written).
    ///
    /// # Errors
    ///
    /// Returns an error if a fatal condition is hit.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Execute a task, recording the result in the logger.
///
/// Returns the task's counters, or `None` if it did not run.
///
/// # Errors
///
/// Propagates fatal task errors after recording them as failed.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<Option<TaskStats>> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (nothing to do)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::Skipped, Some("nothing to do"));
        return Ok(None);
    }

    match task.run(ctx) {
        Ok(TaskResult::Ok(stats)) => {
            let summary = stats.summary();
            ctx.log.debug(&format!("{}: {summary}", task.name()));
            let status = if stats.failed > 0 {
                TaskStatus::Failed
            } else {
                TaskStatus::Ok
            };
            ctx.log.record_task(task.name(), status, Some(&summary));
            Ok(Some(stats))
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            Ok(None)
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            Err(e)
        }
    }
}
