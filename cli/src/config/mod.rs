//! Run configuration: the resolved layout plus the managed-file lists.
pub mod layout;
pub mod managed;

use anyhow::{Context as _, Result};

pub use layout::{DOTFILES_DIR, Layout, Subdir};
pub use managed::ManagedFiles;

/// All configuration for one engine run.
///
/// Built fresh on every run; nothing here is cached between invocations.
#[derive(Debug, Clone)]
pub struct Config {
    /// Resolved paths.
    pub layout: Layout,
    /// Sources found under `copy/`, `link/` and `init/`.
    pub files: ManagedFiles,
}

/// A non-fatal problem found while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Managed directory the warning refers to.
    pub subdir: Subdir,
    /// Human-readable description.
    pub message: String,
}

impl Config {
    /// Read the managed-file lists for `layout`.
    ///
    /// # Errors
    ///
    /// Returns an error if a managed directory exists but cannot be read.
    pub fn load(layout: Layout) -> Result<Self> {
        let files = ManagedFiles::read(&layout)
            .with_context(|| format!("reading {}", layout.base().display()))?;
        Ok(Self { layout, files })
    }

    /// Collect warnings about the loaded tree.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigWarning> {
        self.files
            .missing
            .iter()
            .map(|&subdir| ConfigWarning {
                subdir,
                message: format!(
                    "{} does not exist, nothing to {subdir}",
                    self.layout.subdir(subdir).display()
                ),
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn load_empty_base_warns_for_each_managed_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(Layout::new(tmp.path())).unwrap();
        let warnings = config.validate();
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].message.contains("nothing to link"));
    }

    #[test]
    fn load_full_tree_has_no_warnings() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = Layout::new(tmp.path());
        for dir in ManagedFiles::DIRS {
            std::fs::create_dir_all(layout.subdir(dir)).unwrap();
        }
        let config = Config::load(layout).unwrap();
        assert!(config.validate().is_empty());
    }
}
