//! Domain-specific error types for the dotfiles engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`CacheError`], [`ScriptError`])
//! while command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! via the standard `?` operator.
//!
//! # Error families
//!
//! ```text
//! ConfigError    home directory, managed directories
//! CacheError     action log validation and persistence
//! ResourceError  copy, link and backup of a single file
//! ScriptError    init script execution
//! ```
//!
//! Only [`CacheError::Corrupt`], [`CacheError::Io`] and the [`ConfigError`]
//! variants abort a run. Resource and script errors are reported per file.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise while resolving the layout and reading managed directories.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither `--home`, `$HOME` nor the passwd entry names a home directory.
    #[error("cannot determine home directory")]
    NoHome,

    /// `add` was given a directory name outside the well-known set.
    #[error("Unknown dotfiles directory: {0}")]
    UnknownSubdir(String),

    /// A managed directory exists but cannot be listed.
    #[error("Failed to read {dir} dir: {source}")]
    ReadDir {
        /// Name of the managed directory (`copy`, `link`, `init`).
        dir: String,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Errors raised by the persistent action log.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The action name is not one of `link`, `copy`, `initSelected`, `initRun`.
    #[error("{0} is not part of the possible cached actions")]
    InvalidAction(String),

    /// An empty path was passed where a source path is required.
    #[error("The path to the cache file cannot be \"\"")]
    EmptyPath,

    /// `cache.json` exists but is not a valid action log.
    #[error("corrupt cache file {}: {source}", path.display())]
    Corrupt {
        /// Path to the cache file.
        path: PathBuf,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },

    /// Reading, writing or removing `cache.json` failed.
    #[error("cache I/O error on {}: {source}", path.display())]
    Io {
        /// Path to the cache file or directory.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Errors that arise while reconciling a single managed file.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// Copying a source into the home directory failed.
    #[error("Failed to copy {}: {source}", path.display())]
    Copy {
        /// Source path that could not be copied.
        path: PathBuf,
        /// Underlying error.
        source: anyhow::Error,
    },

    /// Creating or replacing a symlink failed.
    #[error("Failed to link {}: {source}", path.display())]
    Link {
        /// Source path that could not be linked.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// Moving a displaced destination into the backup area failed.
    #[error("Failed to back up {}: {source}", path.display())]
    Backup {
        /// Destination path that could not be moved aside.
        path: PathBuf,
        /// Underlying error.
        source: anyhow::Error,
    },

    /// A real directory occupies the destination of a link.
    #[error("refusing to replace directory {}", .0.display())]
    DirectoryInTheWay(PathBuf),
}

/// Errors that arise from running an init script.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The shell could not be started.
    #[error("failed to start {script}: {reason}")]
    Spawn {
        /// Script basename.
        script: String,
        /// Human-readable cause.
        reason: String,
    },

    /// The script ran and exited non-zero (`-1` when killed by a signal).
    #[error("{script} exited with status {code}")]
    Exit {
        /// Script basename.
        script: String,
        /// Exit code reported by the shell.
        code: i32,
        /// Output captured before the script exited (empty when inherited).
        output: String,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn invalid_action_display() {
        let e = CacheError::InvalidAction("unlink".to_string());
        assert_eq!(
            e.to_string(),
            "unlink is not part of the possible cached actions"
        );
    }

    #[test]
    fn empty_path_display() {
        assert_eq!(
            CacheError::EmptyPath.to_string(),
            "The path to the cache file cannot be \"\""
        );
    }

    #[test]
    fn cache_io_has_source() {
        use std::error::Error as StdError;
        let e = CacheError::Io {
            path: PathBuf::from("/home/u/.dotfiles/cache/cache.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("cache.json"));
    }

    #[test]
    fn unknown_subdir_display() {
        let e = ConfigError::UnknownSubdir("docs".to_string());
        assert_eq!(e.to_string(), "Unknown dotfiles directory: docs");
    }

    #[test]
    fn read_dir_display() {
        let e = ConfigError::ReadDir {
            dir: "copy".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(e.to_string(), "Failed to read copy dir: denied");
    }

    #[test]
    fn directory_in_the_way_display() {
        let e = ResourceError::DirectoryInTheWay(PathBuf::from("/home/u/.vim"));
        assert_eq!(e.to_string(), "refusing to replace directory /home/u/.vim");
    }

    #[test]
    fn script_exit_display_omits_output() {
        let e = ScriptError::Exit {
            script: "10-brew.sh".to_string(),
            code: 2,
            output: "noise".to_string(),
        };
        assert_eq!(e.to_string(), "10-brew.sh exited with status 2");
    }

    #[test]
    fn resource_error_downcasts_from_anyhow() {
        let e: anyhow::Error = ResourceError::DirectoryInTheWay(PathBuf::from("/x")).into();
        assert!(matches!(
            e.downcast_ref::<ResourceError>(),
            Some(ResourceError::DirectoryInTheWay(_))
        ));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<ConfigError>();
        assert_send_sync::<CacheError>();
        assert_send_sync::<ResourceError>();
        assert_send_sync::<ScriptError>();
    }
}
