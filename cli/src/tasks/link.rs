//! Task: symlink managed files into the root directory.
use anyhow::Result;

use super::reconcile::{Mode, reconcile};
use super::{Context, Task, TaskResult};

/// Link every file under `link/` from the root directory.
#[derive(Debug)]
pub struct LinkFiles;

impl Task for LinkFiles {
    fn name(&self) -> &'static str {
        "Link files"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.files.get(Mode::Link.subdir()).is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        reconcile(ctx, Mode::Link).map(TaskResult::Ok)
    }
}
