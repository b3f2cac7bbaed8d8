//! Top-level subcommand orchestration.
pub mod add;
pub mod create;
pub mod get;
pub mod run;

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Layout;

/// Resolve the layout from `--home`, falling back to `$HOME`.
///
/// # Errors
///
/// Returns an error if the explicit directory does not exist or `$HOME`
/// is not set.
pub fn resolve_layout(global: &GlobalOpts) -> Result<Layout> {
    resolve_home(global.home.as_deref())
}

fn resolve_home(home: Option<&Path>) -> Result<Layout> {
    if let Some(home) = home {
        let root = dunce::canonicalize(home)
            .with_context(|| format!("cannot use {} as home directory", home.display()))?;
        return Ok(Layout::new(root));
    }
    Ok(Layout::from_home()?)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn explicit_home_is_canonicalized() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = resolve_home(Some(tmp.path())).unwrap();
        assert_eq!(layout.root(), dunce::canonicalize(tmp.path()).unwrap());
        assert!(layout.base().ends_with(".dotfiles"));
    }

    #[test]
    fn missing_explicit_home_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = resolve_home(Some(&tmp.path().join("nope"))).unwrap_err();
        assert!(err.to_string().contains("cannot use"));
    }
}
