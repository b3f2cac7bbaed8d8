// Shared helpers for integration tests.
//
// Provides a temporary home directory with a `.dotfiles` tree and a fluent
// builder so each integration test can set up an isolated environment
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use homedots::config::{Layout, Subdir};
use homedots::engine::{Engine, RunOptions, RunReport};
use homedots::exec::SystemExecutor;
use homedots::logging::{Log, Logger};
use homedots::resources::script::ScriptOutput;
use homedots::tasks::menu::{AcceptDefaults, MenuPrompt};

/// An isolated home directory backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct TestHome {
    /// Temporary directory standing in for `$HOME`.
    pub dir: tempfile::TempDir,
    /// Layout rooted at `dir`.
    pub layout: Layout,
}

impl TestHome {
    /// Create a home with empty `copy/`, `link/` and `init/` directories.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let layout = Layout::new(dir.path());
        for subdir in [Subdir::Copy, Subdir::Link, Subdir::Init] {
            fs::create_dir_all(layout.subdir(subdir)).expect("create managed dir");
        }
        Self { dir, layout }
    }

    /// The home directory.
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Write `contents` to `.dotfiles/<subdir>/<name>`.
    pub fn with_source(self, subdir: Subdir, name: &str, contents: &str) -> Self {
        self.write_source(subdir, name, contents);
        self
    }

    /// Write `contents` to `<home>/<name>`.
    pub fn with_occupant(self, name: &str, contents: &str) -> Self {
        fs::write(self.root().join(name), contents).expect("write occupant");
        self
    }

    /// Write (or overwrite) a managed source and return its path.
    pub fn write_source(&self, subdir: Subdir, name: &str, contents: &str) -> PathBuf {
        let path = self.layout.subdir(subdir).join(name);
        fs::write(&path, contents).expect("write source");
        path
    }

    /// Path of `<home>/<name>`.
    pub fn home_file(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Read `<home>/<name>` (following symlinks).
    pub fn read_home(&self, name: &str) -> String {
        fs::read_to_string(self.home_file(name)).expect("read home file")
    }

    /// Sorted names of the entries in `backup/`.
    pub fn backups(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.layout.backup_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Run the engine with the given options and prompt, capturing script output.
    pub fn run_with(&self, opts: &RunOptions, prompt: Arc<dyn MenuPrompt>) -> (RunReport, Arc<Logger>) {
        let log = Arc::new(Logger::new(None));
        let engine = Engine::new(
            Arc::clone(&log) as Arc<dyn Log>,
            Arc::new(SystemExecutor),
            prompt,
        )
        .with_script_output(ScriptOutput::Capture);
        let report = engine.run(opts).expect("engine run");
        (report, log)
    }

    /// Run every phase, accepting the default init selection.
    pub fn run(&self) -> RunReport {
        self.run_with(&RunOptions::new(self.root()), Arc::new(AcceptDefaults))
            .0
    }

    /// Options for a run against this home.
    pub fn options(&self) -> RunOptions {
        RunOptions::new(self.root())
    }
}
