//! Copy resource: a managed file materialised as a real copy in the root directory.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::compare;
use super::helpers::fs::{copy_dir_recursive, remove_existing};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::ResourceError;

/// A file under `copy/` and the place it is copied to.
#[derive(Debug, Clone)]
pub struct CopyResource {
    /// The managed source under `copy/`.
    pub source: PathBuf,
    /// `root/<basename>`.
    pub target: PathBuf,
}

impl CopyResource {
    /// Create a new copy resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    fn copy(&self) -> Result<()> {
        // A link left behind by an earlier `link` run must be replaced, not
        // written through into the dotfiles tree.
        if self
            .target
            .symlink_metadata()
            .is_ok_and(|meta| meta.is_symlink())
        {
            remove_existing(&self.target, false)
                .with_context(|| format!("remove existing: {}", self.target.display()))?;
        }

        if self.source.is_dir() {
            copy_dir_recursive(&self.source, &self.target)
        } else {
            std::fs::copy(&self.source, &self.target).with_context(|| {
                format!(
                    "copying {} to {}",
                    self.source.display(),
                    self.target.display()
                )
            })?;
            Ok(())
        }
    }
}

impl Applicable for CopyResource {
    fn description(&self) -> String {
        format!("{} <- {}", self.target.display(), self.source.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.copy().map_err(|source| ResourceError::Copy {
            path: self.source.clone(),
            source,
        })?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for CopyResource {
    fn current_state(&self) -> Result<ResourceState> {
        Ok(compare::compare(&self.source, &self.target))
    }
}
