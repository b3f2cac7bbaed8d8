//! Task: offer the init menu and run the selected scripts.
use anyhow::Result;

use super::menu::Menu;
use super::{Context, Task, TaskResult, TaskStats};
use crate::cache::Action;
use crate::config::Subdir;
use crate::error::ScriptError;
use crate::resources::script::InitScript;

/// Run the scripts under `init/` that the user keeps selected.
///
/// Scripts that already ran are unselected by default, unless the action
/// log is being ignored.
#[derive(Debug)]
pub struct RunInitScripts;

impl RunInitScripts {
    fn build_menu(ctx: &Context) -> Result<Menu> {
        let mut entries = Vec::new();
        for path in ctx.config.files.get(Subdir::Init) {
            let selected = ctx.no_cache || !ctx.cache().contains(Action::InitRun, path)?;
            entries.push((InitScript::new(ctx.layout(), path.clone()), selected));
        }
        Ok(Menu::new(entries))
    }

    fn run_script(ctx: &Context, script: &InitScript) -> bool {
        ctx.log.header(&format!("Run {}", script.name()));
        match script.run(ctx.executor.as_ref(), ctx.script_output) {
            Ok(output) => {
                ctx.append_output(&output);
                true
            }
            Err(e) => {
                if let ScriptError::Exit { output, .. } = &e {
                    ctx.append_output(output);
                }
                ctx.log.error(&e.to_string());
                ctx.log.error(&format!(
                    "# cd {}; {}",
                    script.working_dir().display(),
                    script.command_line()
                ));
                false
            }
        }
    }
}

impl Task for RunInitScripts {
    fn name(&self) -> &'static str {
        "Run init scripts"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.files.get(Subdir::Init).is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut menu = Self::build_menu(ctx)?;
        menu.render(ctx.log.as_ref());
        if menu.edit(ctx.prompt.as_ref(), ctx.log.as_ref())? {
            menu.render(ctx.log.as_ref());
        }

        ctx.cache()
            .replace(Action::InitSelected, menu.selected().map(|s| &s.path))?;

        let mut stats = TaskStats {
            skipped: u32::try_from(menu.unselected().count()).unwrap_or(u32::MAX),
            ..TaskStats::default()
        };

        for script in menu.selected() {
            if Self::run_script(ctx, script) {
                stats.changed += 1;
            } else {
                stats.failed += 1;
            }
            // Recorded whatever the exit status, so a broken script is not
            // offered again by default.
            ctx.cache().add(Action::InitRun, &script.path)?;
        }

        Ok(TaskResult::Ok(stats))
    }
}

#[cfg(all(test, unix))]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::unreachable,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::tasks::menu::MockMenuPrompt;
    use crate::tasks::test_helpers::{RecordingLog, Sandbox};
    use std::sync::Arc;

    fn stats(result: TaskResult) -> TaskStats {
        let TaskResult::Ok(stats) = result else {
            unreachable!("init never skips once it runs")
        };
        stats
    }

    #[test]
    fn runs_every_new_script_and_captures_output() {
        let sandbox = Sandbox::new();
        for i in 0..3 {
            sandbox.source(Subdir::Init, &format!("file{i}"), "echo foo");
        }
        let ctx = sandbox.context(Arc::new(RecordingLog::default()));

        let stats = stats(RunInitScripts.run(&ctx).unwrap());

        assert_eq!(stats.changed, 3);
        assert_eq!(ctx.take_output(), "foo\nfoo\nfoo\n");
    }

    #[test]
    fn scripts_run_from_base_dir() {
        let sandbox = Sandbox::new();
        sandbox.source(Subdir::Init, "where.sh", "pwd");
        let ctx = sandbox.context(Arc::new(RecordingLog::default()));

        RunInitScripts.run(&ctx).unwrap();

        let out = ctx.take_output();
        let reported = std::fs::canonicalize(out.trim()).unwrap();
        let base = std::fs::canonicalize(sandbox.layout.base()).unwrap();
        assert_eq!(reported, base);
    }

    #[test]
    fn scripts_that_ran_are_unselected_next_time() {
        let sandbox = Sandbox::new();
        sandbox.source(Subdir::Init, "a.sh", "echo a");
        sandbox.source(Subdir::Init, "b.sh", "echo b");
        let log = Arc::new(RecordingLog::default());
        let ctx = sandbox.context(Arc::clone(&log));
        RunInitScripts.run(&ctx).unwrap();
        ctx.take_output();

        let stats = stats(RunInitScripts.run(&ctx).unwrap());

        assert_eq!(stats.changed, 0);
        assert_eq!(stats.skipped, 2);
        assert!(ctx.take_output().is_empty());
        assert_eq!(log.of("ko"), ["0. a.sh", "1. b.sh"]);
    }

    #[test]
    fn no_cache_selects_everything_again() {
        let sandbox = Sandbox::new();
        let script = sandbox.source(Subdir::Init, "a.sh", "echo a");
        {
            let ctx = sandbox.context(Arc::new(RecordingLog::default()));
            ctx.cache().add(Action::InitRun, &script).unwrap();
        }
        let ctx = sandbox
            .context(Arc::new(RecordingLog::default()))
            .with_no_cache(true);

        let stats = stats(RunInitScripts.run(&ctx).unwrap());

        assert_eq!(stats.changed, 1);
        assert_eq!(ctx.take_output(), "a\n");
    }

    #[test]
    fn failing_script_is_reported_and_still_recorded() {
        let sandbox = Sandbox::new();
        let script = sandbox.source(Subdir::Init, "bad.sh", "echo partial; exit 3");
        sandbox.source(Subdir::Init, "good.sh", "echo ok");
        let log = Arc::new(RecordingLog::default());
        let ctx = sandbox.context(Arc::clone(&log));

        let stats = stats(RunInitScripts.run(&ctx).unwrap());

        assert_eq!(stats.failed, 1);
        assert_eq!(stats.changed, 1);
        assert_eq!(ctx.take_output(), "partial\nok\n");
        assert!(ctx.cache().contains(Action::InitRun, &script).unwrap());
        let errors = log.of("error");
        assert_eq!(errors[0], "bad.sh exited with status 3");
        assert_eq!(
            errors[1],
            format!(
                "# cd {}; /bin/bash -c source init/bad.sh",
                sandbox.layout.base().display()
            )
        );
    }

    #[test]
    fn edited_selection_is_recorded() {
        let sandbox = Sandbox::new();
        let a = sandbox.source(Subdir::Init, "a.sh", "echo a");
        let b = sandbox.source(Subdir::Init, "b.sh", "echo b");
        let mut prompt = MockMenuPrompt::new();
        prompt.expect_confirm_edit().returning(|| Ok(true));
        prompt
            .expect_read_toggles()
            .returning(|| Ok("0\n".to_string()));
        let log = Arc::new(RecordingLog::default());
        let ctx = sandbox.context_with(Arc::clone(&log), Arc::new(prompt));

        let stats = stats(RunInitScripts.run(&ctx).unwrap());

        assert_eq!(stats.changed, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(ctx.take_output(), "b\n");
        let cache = ctx.cache();
        assert!(!cache.contains(Action::InitSelected, &a).unwrap());
        assert!(cache.contains(Action::InitSelected, &b).unwrap());
        assert!(!cache.contains(Action::InitRun, &a).unwrap());
        assert!(cache.contains(Action::InitRun, &b).unwrap());
        drop(cache);
        // Menu shown before and after the edit.
        assert_eq!(
            log.of("header")
                .iter()
                .filter(|h| *h == "Run the following init scripts")
                .count(),
            2
        );
    }
}
