//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the dotfiles manager.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiles",
    about = "Copy, link and bootstrap the dotfiles kept in ~/.dotfiles",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Only print warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Forget what previous runs did: back up again, offer every init script
    #[arg(long = "nocache", global = true)]
    pub no_cache: bool,

    /// Directory to install into instead of $HOME
    #[arg(long, global = true, value_name = "PATH")]
    pub home: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create an empty ~/.dotfiles tree
    Create,
    /// Clone a dotfiles repository into ~/.dotfiles
    Get {
        /// Repository URL
        url: String,
    },
    /// Add a file to one of the ~/.dotfiles directories
    Add {
        /// Target directory (bin, conf, copy, init, link, source, test, vendor)
        subdir: String,
        /// File to add
        file: PathBuf,
    },
    /// Copy, link, then run init scripts
    Run,
    /// Run init scripts only
    Init,
    /// Copy files only
    Copy,
    /// Link files only
    Link,
}

impl Command {
    /// Subcommand name, used to name the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Get { .. } => "get",
            Self::Add { .. } => "add",
            Self::Run => "run",
            Self::Init => "init",
            Self::Copy => "copy",
            Self::Link => "link",
        }
    }
}
