//! Core logging types: task entries, status, and the [`Log`] trait.

/// Task execution result for summary reporting.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Human-readable task name.
    pub name: String,
    /// Final status of the task.
    pub status: TaskStatus,
    /// Optional detail message (e.g., counters or error description).
    pub message: Option<String>,
}

/// Status of a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task completed; every item was reconciled or already in sync.
    Ok,
    /// Task had nothing to do (e.g., empty managed directory).
    Skipped,
    /// Task finished but at least one item failed, or the task aborted.
    Failed,
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) is the production implementation; tests
/// may substitute their own to capture output.
pub trait Log: Send + Sync {
    /// Bold section header, preceded by a blank line.
    fn header(&self, msg: &str);
    /// ` ➜  msg`: an item being acted on.
    fn arrow(&self, msg: &str);
    /// ` ✔  msg`: a selected or successful item.
    fn ok(&self, msg: &str);
    /// ` ✖  msg`: an unselected or failed item.
    fn ko(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Record a task result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
