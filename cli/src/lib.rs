//! Dotfiles manager engine.
//!
//! Keeps a user's dotfiles under `~/.dotfiles` and brings the home directory
//! in line with them: files under `copy/` are copied, files under `link/` are
//! symlinked, and scripts under `init/` are offered in a menu and sourced by
//! `/bin/bash`. An action log in `cache/cache.json` remembers what was done so
//! that reruns are idempotent and pre-existing files are backed up only once.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: path layout and the managed-file lists
//! - **[`cache`]**: the persistent action log
//! - **[`resources`]**: idempotent `check + apply` primitives (copy, link, backup, script)
//! - **[`tasks`]**: the copy, link and init units of work wired to resources
//! - **[`engine`]**: the façade that loads state and runs the tasks in order
//! - **[`commands`]**: top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod exec;
pub mod logging;
pub mod resources;
pub mod tasks;
