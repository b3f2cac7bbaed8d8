//! Path model: the root (home) directory, the dotfiles base directory under
//! it, and the well-known subdirectories.
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::ConfigError;

/// Name of the dotfiles directory inside the root directory.
pub const DOTFILES_DIR: &str = ".dotfiles";

const BACKUP_DIR: &str = "backup";
const CACHE_DIR: &str = "cache";
const CACHE_FILE: &str = "cache.json";

/// One of the eight well-known subdirectories of the base directory.
///
/// Only [`Subdir::Copy`], [`Subdir::Link`] and [`Subdir::Init`] are consumed
/// by the engine; the others are scaffolded by `create` and accepted by `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subdir {
    /// `bin/`
    Bin,
    /// `conf/`
    Conf,
    /// `copy/`: files copied into the root directory.
    Copy,
    /// `init/`: scripts sourced under `/bin/bash`.
    Init,
    /// `link/`: files symlinked into the root directory.
    Link,
    /// `source/`
    Source,
    /// `test/`
    Test,
    /// `vendor/`
    Vendor,
}

impl Subdir {
    /// All subdirectories in scaffolding order.
    pub const ALL: [Self; 8] = [
        Self::Bin,
        Self::Conf,
        Self::Copy,
        Self::Init,
        Self::Link,
        Self::Source,
        Self::Test,
        Self::Vendor,
    ];

    /// Directory name on disk.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bin => "bin",
            Self::Conf => "conf",
            Self::Copy => "copy",
            Self::Init => "init",
            Self::Link => "link",
            Self::Source => "source",
            Self::Test => "test",
            Self::Vendor => "vendor",
        }
    }
}

impl fmt::Display for Subdir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subdir {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownSubdir(s.to_string()))
    }
}

/// Resolved paths for one engine run.
///
/// `base` and `cache_file` are always derived from `root`; [`Layout::set_root`]
/// is the only way to change any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
    base: PathBuf,
    cache_file: PathBuf,
}

impl Layout {
    /// Build a layout rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let base = root.join(DOTFILES_DIR);
        let cache_file = base.join(CACHE_DIR).join(CACHE_FILE);
        Self {
            root,
            base,
            cache_file,
        }
    }

    /// Build a layout rooted at the current user's home directory.
    ///
    /// A non-empty `$HOME` wins; otherwise the account's passwd entry is used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHome`] if neither gives a directory.
    pub fn from_home() -> Result<Self, ConfigError> {
        dirs::home_dir()
            .filter(|home| !home.as_os_str().is_empty())
            .map(Self::new)
            .ok_or(ConfigError::NoHome)
    }

    /// Re-root the layout, re-deriving the base directory and cache path.
    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        *self = Self::new(root);
    }

    /// Directory that receives copies and links (normally `$HOME`).
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `root/.dotfiles`.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// `base/<subdir>`.
    #[must_use]
    pub fn subdir(&self, subdir: Subdir) -> PathBuf {
        self.base.join(subdir.as_str())
    }

    /// `base/backup`, where displaced destinations are moved.
    #[must_use]
    pub fn backup_dir(&self) -> PathBuf {
        self.base.join(BACKUP_DIR)
    }

    /// `base/cache/cache.json`.
    #[must_use]
    pub fn cache_file(&self) -> &Path {
        &self.cache_file
    }

    /// Destination of a managed file: `root/<basename of source>`.
    #[must_use]
    pub fn destination(&self, source: &Path) -> PathBuf {
        self.root.join(source.file_name().unwrap_or_default())
    }

    /// Backup location of a managed file: `base/backup/<basename of source>`.
    #[must_use]
    pub fn backup_path(&self, source: &Path) -> PathBuf {
        self.backup_dir().join(source.file_name().unwrap_or_default())
    }
}
