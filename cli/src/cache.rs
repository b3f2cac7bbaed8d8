//! Persistent action log (`base/cache/cache.json`).
//!
//! Records which managed sources have been copied, linked, offered in the
//! init menu and run, so repeated runs skip first-time work such as backups.
//! Every mutation rewrites the file before returning.
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CacheError;
use crate::resources::helpers::fs::ensure_dir;

/// The dimensions of the action log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Source was symlinked into the root directory.
    Link,
    /// Source was copied into the root directory.
    Copy,
    /// Init script was selected in the last confirmed menu.
    InitSelected,
    /// Init script has been run.
    InitRun,
}

impl Action {
    /// Every action kind.
    pub const ALL: [Self; 4] = [Self::Link, Self::Copy, Self::InitSelected, Self::InitRun];

    /// Name accepted by [`Action::from_str`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Copy => "copy",
            Self::InitSelected => "initSelected",
            Self::InitRun => "initRun",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| CacheError::InvalidAction(s.to_string()))
    }
}

/// On-disk shape: one array of source paths per action kind.
///
/// Missing keys and `null` arrays both read as empty sets.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct Entries {
    #[serde(deserialize_with = "null_as_empty")]
    link: BTreeSet<String>,
    #[serde(deserialize_with = "null_as_empty")]
    copy: BTreeSet<String>,
    #[serde(deserialize_with = "null_as_empty")]
    init_selected: BTreeSet<String>,
    #[serde(deserialize_with = "null_as_empty")]
    init_run: BTreeSet<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeSet<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Entries {
    const fn set(&self, action: Action) -> &BTreeSet<String> {
        match action {
            Action::Link => &self.link,
            Action::Copy => &self.copy,
            Action::InitSelected => &self.init_selected,
            Action::InitRun => &self.init_run,
        }
    }

    const fn set_mut(&mut self, action: Action) -> &mut BTreeSet<String> {
        match action {
            Action::Link => &mut self.link,
            Action::Copy => &mut self.copy,
            Action::InitSelected => &mut self.init_selected,
            Action::InitRun => &mut self.init_run,
        }
    }
}

/// In-memory action log bound to its cache file.
#[derive(Debug)]
pub struct ActionLog {
    path: PathBuf,
    entries: Entries,
}

impl ActionLog {
    /// An empty log persisted at `path`. Nothing is read until [`load`](Self::load).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Entries::default(),
        }
    }

    /// Path of the cache file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory state with the cache file's contents.
    ///
    /// A missing file leaves the log as it is.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Corrupt`] if the file is not a valid log and
    /// [`CacheError::Io`] if it cannot be read.
    pub fn load(&mut self) -> Result<(), CacheError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => return Err(self.io_error(source)),
        };
        self.entries = serde_json::from_slice(&data).map_err(|source| CacheError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Record `path` under `action` and persist.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::EmptyPath`] for an empty path and
    /// [`CacheError::Io`] if the file cannot be written.
    pub fn add(&mut self, action: Action, path: impl AsRef<Path>) -> Result<(), CacheError> {
        let key = key(path.as_ref())?;
        self.entries.set_mut(action).insert(key);
        self.persist()
    }

    /// Whether `path` is recorded under `action`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::EmptyPath`] for an empty path.
    pub fn contains(&self, action: Action, path: impl AsRef<Path>) -> Result<bool, CacheError> {
        let key = key(path.as_ref())?;
        Ok(self.entries.set(action).contains(&key))
    }

    /// Forget `path` under `action` (no-op if absent) and persist.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::EmptyPath`] for an empty path and
    /// [`CacheError::Io`] if the file cannot be written.
    pub fn remove(&mut self, action: Action, path: impl AsRef<Path>) -> Result<(), CacheError> {
        let key = key(path.as_ref())?;
        self.entries.set_mut(action).remove(&key);
        self.persist()
    }

    /// Replace everything recorded under `action` with `paths` and persist.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::EmptyPath`] if any path is empty (the log is
    /// left unchanged) and [`CacheError::Io`] if the file cannot be written.
    pub fn replace<I, P>(&mut self, action: Action, paths: I) -> Result<(), CacheError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let keys = paths
            .into_iter()
            .map(|p| key(p.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        *self.entries.set_mut(action) = keys;
        self.persist()
    }

    /// Paths recorded under `action`, in sorted order.
    pub fn entries(&self, action: Action) -> impl Iterator<Item = &str> {
        self.entries.set(action).iter().map(String::as_str)
    }

    /// Whether nothing is recorded under any action.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Action::ALL
            .into_iter()
            .all(|action| self.entries.set(action).is_empty())
    }

    /// Drop the in-memory state without touching the file.
    pub fn reset_in_memory(&mut self) {
        self.entries = Entries::default();
    }

    /// Reset the log and remove the cache file.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the file exists but cannot be removed.
    pub fn invalidate(&mut self) -> Result<(), CacheError> {
        self.reset_in_memory();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn persist(&self) -> Result<(), CacheError> {
        if let Some(dir) = self.path.parent() {
            ensure_dir(dir).map_err(|source| self.io_error(source))?;
        }
        let json = serde_json::to_vec_pretty(&self.entries)
            .map_err(|e| self.io_error(io::Error::other(e)))?;
        write_file(&self.path, &json).map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: io::Error) -> CacheError {
        CacheError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn key(path: &Path) -> Result<String, CacheError> {
    if path.as_os_str().is_empty() {
        return Err(CacheError::EmptyPath);
    }
    Ok(path.to_string_lossy().into_owned())
}

/// Truncate-and-write with mode `0666` (before umask) for new files.
fn write_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt as _;
        options.mode(0o666);
    }
    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.flush()
}
