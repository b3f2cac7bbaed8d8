//! Task: copy managed files into the root directory.
use anyhow::Result;

use super::reconcile::{Mode, reconcile};
use super::{Context, Task, TaskResult};

/// Copy every file under `copy/` into the root directory.
#[derive(Debug)]
pub struct CopyFiles;

impl Task for CopyFiles {
    fn name(&self) -> &'static str {
        "Copy files"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.files.get(Mode::Copy.subdir()).is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        reconcile(ctx, Mode::Copy).map(TaskResult::Ok)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::unreachable, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::cache::Action;
    use crate::config::Subdir;
    use crate::resources::compare::background_check;
    use crate::tasks::test_helpers::{RecordingLog, Sandbox};
    use std::fs;
    use std::sync::Arc;

    #[test]
    fn should_run_false_without_sources() {
        let sandbox = Sandbox::new();
        let ctx = sandbox.context(Arc::new(RecordingLog::default()));
        assert!(!CopyFiles.should_run(&ctx));
    }

    #[test]
    fn copies_every_file() {
        let sandbox = Sandbox::new();
        for i in 0..5 {
            sandbox.source(Subdir::Copy, &format!("file{i}"), "data");
        }
        let ctx = sandbox.context(Arc::new(RecordingLog::default()));

        let TaskResult::Ok(stats) = CopyFiles.run(&ctx).unwrap() else {
            unreachable!("copy never skips once it runs")
        };

        assert_eq!(stats.changed, 5);
        for i in 0..5 {
            let dest = sandbox.root().join(format!("file{i}"));
            assert_eq!(fs::read_to_string(dest).unwrap(), "data");
        }
    }

    #[test]
    fn background_check_follows_source_changes() {
        let sandbox = Sandbox::new();
        let src = sandbox.source(Subdir::Copy, "file0", "data");
        let dest = sandbox.layout.destination(&src);
        assert!(background_check(&src, &dest));

        let ctx = sandbox.context(Arc::new(RecordingLog::default()));
        CopyFiles.run(&ctx).unwrap();
        assert!(!background_check(&src, &dest));

        fs::write(&src, "data\n newdata").unwrap();
        assert!(background_check(&src, &dest));
    }

    #[test]
    fn copy_records_sources() {
        let sandbox = Sandbox::new();
        let src = sandbox.source(Subdir::Copy, ".gitconfig", "[user]\n");
        let ctx = sandbox.context(Arc::new(RecordingLog::default()));
        CopyFiles.run(&ctx).unwrap();
        assert!(ctx.cache().contains(Action::Copy, &src).unwrap());
        assert!(!ctx.cache().contains(Action::Link, &src).unwrap());
    }

    #[test]
    fn second_run_is_a_no_op() {
        let sandbox = Sandbox::new();
        sandbox.source(Subdir::Copy, "a", "one\ntwo\n");
        sandbox.occupant("a", "old");
        let log = Arc::new(RecordingLog::default());
        let ctx = sandbox.context(Arc::clone(&log));
        CopyFiles.run(&ctx).unwrap();

        let TaskResult::Ok(stats) = CopyFiles.run(&ctx).unwrap() else {
            unreachable!("copy never skips once it runs")
        };
        assert_eq!(stats.changed, 0);
        assert_eq!(stats.already_ok, 1);
        assert_eq!(stats.backed_up, 0);
    }
}
