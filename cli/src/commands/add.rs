//! `add`: put a file under one of the dotfiles directories.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};

use crate::config::{Layout, Subdir};
use crate::logging::Log;
use crate::resources::helpers::fs::ensure_dir;

/// Copy `file` into `base/<subdir>/` and return where it landed.
///
/// # Errors
///
/// Returns an error if `subdir` is not a dotfiles directory, `file` is not a
/// regular file, or the copy fails.
pub fn run(layout: &Layout, subdir: &str, file: &Path, log: &dyn Log) -> Result<PathBuf> {
    let subdir: Subdir = subdir.parse()?;
    if !file.is_file() {
        bail!("{} is not a file", file.display());
    }
    let Some(name) = file.file_name() else {
        bail!("{} has no file name", file.display());
    };

    let dir = layout.subdir(subdir);
    ensure_dir(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let dest = dir.join(name);
    std::fs::copy(file, &dest)
        .with_context(|| format!("copying {} to {}", file.display(), dest.display()))?;

    log.info(&format!("Added {}", dest.display()));
    Ok(dest)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::tasks::test_helpers::RecordingLog;
    use std::fs;

    #[test]
    fn adds_file_to_subdir() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = Layout::new(tmp.path());
        let file = tmp.path().join(".zshrc");
        fs::write(&file, "alias ll='ls -l'").unwrap();
        let log = RecordingLog::default();

        let dest = run(&layout, "link", &file, &log).unwrap();

        assert_eq!(dest, layout.subdir(Subdir::Link).join(".zshrc"));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "alias ll='ls -l'");
        assert_eq!(log.of("info"), [format!("Added {}", dest.display())]);
    }

    #[test]
    fn unknown_subdir_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("f");
        fs::write(&file, "x").unwrap();

        let err = run(&Layout::new(tmp.path()), "linx", &file, &RecordingLog::default())
            .unwrap_err();

        assert_eq!(err.to_string(), "Unknown dotfiles directory: linx");
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn missing_file_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run(
            &Layout::new(tmp.path()),
            "copy",
            &tmp.path().join("absent"),
            &RecordingLog::default(),
        )
        .unwrap_err();
        assert!(err.to_string().ends_with("is not a file"));
    }
}
