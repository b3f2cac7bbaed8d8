//! Backup resource: moves a pre-existing destination into `base/backup/`
//! before it is first overwritten by a copy or link.
use anyhow::{Context as _, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::helpers::fs::{ensure_dir, move_path, remove_existing};
use super::{Applicable, ResourceChange};
use crate::config::Layout;
use crate::error::ResourceError;

/// The displaced destination of one managed file.
#[derive(Debug, Clone)]
pub struct BackupResource {
    /// `root/<basename>`: the entry that may need to move aside.
    pub target: PathBuf,
    /// `base/backup/<basename>`: where it goes.
    pub backup: PathBuf,
    backup_dir: PathBuf,
}

impl BackupResource {
    /// Backup plan for the destination of `source`.
    #[must_use]
    pub fn for_source(layout: &Layout, source: &Path) -> Self {
        Self {
            target: layout.destination(source),
            backup: layout.backup_path(source),
            backup_dir: layout.backup_dir(),
        }
    }

    /// Whether anything (including a dangling symlink) occupies the destination.
    #[must_use]
    pub fn target_exists(&self) -> bool {
        self.target.symlink_metadata().is_ok()
    }

    fn move_aside(&self) -> Result<ResourceChange> {
        ensure_dir(&self.backup_dir)
            .with_context(|| format!("create {}", self.backup_dir.display()))?;
        if !self.target_exists() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        // Staged next to the older backup, which is only replaced once the
        // move has succeeded.
        let staged = self.staged_path();
        remove_existing(&staged, true)
            .with_context(|| format!("remove stale {}", staged.display()))?;
        move_path(&self.target, &staged)?;
        remove_existing(&self.backup, true)
            .with_context(|| format!("remove old backup {}", self.backup.display()))?;
        std::fs::rename(&staged, &self.backup).with_context(|| {
            format!("rename {} to {}", staged.display(), self.backup.display())
        })?;
        Ok(ResourceChange::Applied)
    }

    fn staged_path(&self) -> PathBuf {
        let mut name = self
            .backup
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".partial");
        self.backup_dir.join(name)
    }
}

impl Applicable for BackupResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.backup.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.move_aside().map_err(|source| {
            ResourceError::Backup {
                path: self.target.clone(),
                source,
            }
            .into()
        })
    }
}
