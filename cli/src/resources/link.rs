//! Link resource: a managed file exposed in the root directory through a symlink.
use anyhow::Result;
use std::io;
use std::path::{Path, PathBuf};

use super::compare;
use super::helpers::fs::remove_existing;
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::ResourceError;

/// A file under `link/` and the symlink that points at it.
#[derive(Debug, Clone)]
pub struct LinkResource {
    /// The managed source under `link/` (what the symlink points to).
    pub source: PathBuf,
    /// `root/<basename>` (where the symlink is created).
    pub target: PathBuf,
}

impl LinkResource {
    /// Create a new link resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Applicable for LinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        if self
            .target
            .symlink_metadata()
            .is_ok_and(|meta| meta.is_dir())
        {
            return Err(ResourceError::DirectoryInTheWay(self.target.clone()).into());
        }

        let link_err = |source| ResourceError::Link {
            path: self.source.clone(),
            source,
        };
        remove_existing(&self.target, false).map_err(link_err)?;
        create_symlink(&self.source, &self.target).map_err(link_err)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for LinkResource {
    fn current_state(&self) -> Result<ResourceState> {
        Ok(compare::compare(&self.source, &self.target))
    }
}

/// Create a symlink at `link` pointing to `target`.
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    {
        if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        }
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = (target, link);
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "symlinks are not supported on this platform",
        ))
    }
}
