//! Managed-file lists read from `copy/`, `link/` and `init/`.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::layout::{Layout, Subdir};
use crate::error::ConfigError;

/// Entries found directly under each managed subdirectory, as absolute
/// paths sorted by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedFiles {
    /// Sources under `copy/`.
    pub copy: Vec<PathBuf>,
    /// Sources under `link/`.
    pub link: Vec<PathBuf>,
    /// Scripts under `init/`, in menu order.
    pub init: Vec<PathBuf>,
    /// Managed subdirectories that did not exist when the tree was read.
    pub missing: Vec<Subdir>,
}

impl ManagedFiles {
    /// The managed subdirectories, in the order the engine reads them.
    pub const DIRS: [Subdir; 3] = [Subdir::Link, Subdir::Copy, Subdir::Init];

    /// Read the current contents of the managed subdirectories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadDir`] if a managed subdirectory exists but
    /// cannot be listed.
    pub fn read(layout: &Layout) -> Result<Self, ConfigError> {
        let mut files = Self::default();
        for dir in Self::DIRS {
            let entries = match list_entries(&layout.subdir(dir)) {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    files.missing.push(dir);
                    Vec::new()
                }
                Err(source) => {
                    return Err(ConfigError::ReadDir {
                        dir: dir.to_string(),
                        source,
                    });
                }
            };
            if let Some(slot) = files.slot_mut(dir) {
                *slot = entries;
            }
        }
        Ok(files)
    }

    const fn slot_mut(&mut self, subdir: Subdir) -> Option<&mut Vec<PathBuf>> {
        match subdir {
            Subdir::Copy => Some(&mut self.copy),
            Subdir::Link => Some(&mut self.link),
            Subdir::Init => Some(&mut self.init),
            Subdir::Bin | Subdir::Conf | Subdir::Source | Subdir::Test | Subdir::Vendor => None,
        }
    }

    /// Sources for `subdir` (empty for directories the engine does not consume).
    #[must_use]
    pub fn get(&self, subdir: Subdir) -> &[PathBuf] {
        match subdir {
            Subdir::Copy => &self.copy,
            Subdir::Link => &self.link,
            Subdir::Init => &self.init,
            Subdir::Bin | Subdir::Conf | Subdir::Source | Subdir::Test | Subdir::Vendor => &[],
        }
    }
}

fn list_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}
