//! `create`: scaffold an empty dotfiles tree.
use anyhow::{Context as _, Result};

use crate::config::{Layout, Subdir};
use crate::logging::Log;
use crate::resources::helpers::fs::ensure_dir;

/// Create every well-known directory under the base directory.
///
/// Existing directories and their contents are kept.
///
/// # Errors
///
/// Returns an error if a directory cannot be created.
pub fn run(layout: &Layout, log: &dyn Log) -> Result<()> {
    log.header(&format!("Scaffold {}", layout.base().display()));
    for subdir in Subdir::ALL {
        log.arrow(subdir.as_str());
        let dir = layout.subdir(subdir);
        ensure_dir(&dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    log.header("All done !");
    Ok(())
}
