//! `get`: clone a dotfiles repository into the base directory.
use anyhow::{Result, bail};

use crate::config::Layout;
use crate::exec::Executor;
use crate::logging::Log;

/// Clone `url` (with submodules) into the base directory.
///
/// # Errors
///
/// Returns an error if `git` is not on `PATH` or the clone fails.
pub fn run(layout: &Layout, url: &str, executor: &dyn Executor, log: &dyn Log) -> Result<()> {
    log.header(&format!("Clone {url}"));
    if !executor.which("git") {
        bail!("git is required to clone {url}");
    }

    let base = layout.base().to_string_lossy().into_owned();
    let result = executor.run("git", &["clone", "--recursive", url, base.as_str()])?;
    if !result.stdout.trim().is_empty() {
        log.debug(result.stdout.trim());
    }

    log.header(&format!("{base} is ready !"));
    Ok(())
}
