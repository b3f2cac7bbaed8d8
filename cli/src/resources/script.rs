//! Init script resource: a file under `init/` sourced by `/bin/bash`.
use std::path::{Path, PathBuf};

use crate::config::{Layout, Subdir};
use crate::error::ScriptError;
use crate::exec::Executor;

/// Shell used to source init scripts.
pub const SHELL: &str = "/bin/bash";

/// Where an init script's standard streams go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptOutput {
    /// Share the engine's stdin, stdout and stderr (interactive use).
    #[default]
    Inherit,
    /// Collect stdout and stderr and hand them back to the caller.
    Capture,
}

/// One script under `init/`.
#[derive(Debug, Clone)]
pub struct InitScript {
    /// Absolute path of the script.
    pub path: PathBuf,
    base: PathBuf,
}

impl InitScript {
    /// Describe the script at `path` for the given layout.
    #[must_use]
    pub fn new(layout: &Layout, path: PathBuf) -> Self {
        Self {
            path,
            base: layout.base().to_path_buf(),
        }
    }

    /// Script basename, as shown in the menu.
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Directory the shell runs in.
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.base
    }

    /// The `-c` argument handed to the shell: `source init/<name>`.
    #[must_use]
    pub fn source_arg(&self) -> String {
        format!(
            "source {}",
            Path::new(Subdir::Init.as_str()).join(self.name()).display()
        )
    }

    /// The full command line, for diagnostics.
    #[must_use]
    pub fn command_line(&self) -> String {
        format!("{SHELL} -c {}", self.source_arg())
    }

    /// Run the script and return whatever it printed (empty when inherited).
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Spawn`] if the shell cannot be started and
    /// [`ScriptError::Exit`] if the script exits non-zero.
    pub fn run(&self, executor: &dyn Executor, output: ScriptOutput) -> Result<String, ScriptError> {
        let arg = self.source_arg();
        let args = ["-c", arg.as_str()];
        let result = match output {
            ScriptOutput::Inherit => executor.run_in_interactive(&self.base, SHELL, &args),
            ScriptOutput::Capture => executor.run_in_unchecked(&self.base, SHELL, &args),
        }
        .map_err(|e| ScriptError::Spawn {
            script: self.name(),
            reason: format!("{e:#}"),
        })?;

        if result.success {
            Ok(result.combined())
        } else {
            Err(ScriptError::Exit {
                script: self.name(),
                code: result.code.unwrap_or(-1),
                output: result.combined(),
            })
        }
    }
}
