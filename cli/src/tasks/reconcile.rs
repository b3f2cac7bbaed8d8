//! Backup pre-pass followed by the apply pass, shared by the copy and link tasks.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{Context, TaskStats};
use crate::cache::Action;
use crate::config::Subdir;
use crate::resources::backup::BackupResource;
use crate::resources::copy::CopyResource;
use crate::resources::link::LinkResource;
use crate::resources::{Applicable, Resource, ResourceChange, ResourceState};

/// How managed files reach the root directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Mode {
    Copy,
    Link,
}

impl Mode {
    const fn action(self) -> Action {
        match self {
            Self::Copy => Action::Copy,
            Self::Link => Action::Link,
        }
    }

    pub(super) const fn subdir(self) -> Subdir {
        match self {
            Self::Copy => Subdir::Copy,
            Self::Link => Subdir::Link,
        }
    }

    const fn verb(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Link => "link",
        }
    }

    const fn header(self) -> &'static str {
        match self {
            Self::Copy => "Copying files into home directory",
            Self::Link => "Linking files into home directory",
        }
    }

    /// Copies show the basename, links show the path they point at.
    fn label(self, source: &Path) -> String {
        match self {
            Self::Copy => basename(source),
            Self::Link => source.display().to_string(),
        }
    }

    fn resource(self, source: &Path, target: PathBuf) -> Box<dyn Resource> {
        match self {
            Self::Copy => Box::new(CopyResource::new(source.to_path_buf(), target)),
            Self::Link => Box::new(LinkResource::new(source.to_path_buf(), target)),
        }
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Bring every destination for `mode` in line with its source.
///
/// Per-file failures are logged and counted; only action-log errors abort.
pub(super) fn reconcile(ctx: &Context, mode: Mode) -> Result<TaskStats> {
    let sources = ctx.config.files.get(mode.subdir());
    let mut stats = TaskStats::new();

    let blocked = backup_pass(ctx, mode, sources, &mut stats)?;

    ctx.log.header(mode.header());
    for source in sources {
        // Overwriting would lose the file the backup failed to save.
        if blocked.contains(source) {
            continue;
        }

        let resource = mode.resource(source, ctx.layout().destination(source));
        let state = match resource.current_state() {
            Ok(state) => state,
            Err(e) => {
                ctx.log.error(&format!("{}: {e:#}", resource.description()));
                stats.failed += 1;
                continue;
            }
        };

        match state {
            ResourceState::Correct => {
                ctx.log.debug(&format!("ok: {}", resource.description()));
                stats.already_ok += 1;
            }
            ResourceState::Invalid { reason } => {
                ctx.log
                    .debug(&format!("leaving {} alone: {reason}", resource.description()));
                stats.skipped += 1;
            }
            ResourceState::Missing | ResourceState::Incorrect { .. } => {
                ctx.log.arrow(&mode.label(source));
                ctx.cache().add(mode.action(), source)?;
                match resource.apply() {
                    Ok(ResourceChange::Applied) => stats.changed += 1,
                    Ok(ResourceChange::AlreadyCorrect) => stats.already_ok += 1,
                    Err(e) => {
                        ctx.log.error(&format!("{e:#}"));
                        stats.failed += 1;
                    }
                }
            }
        }
    }

    Ok(stats)
}

/// Move aside destinations of files not yet under management.
///
/// Returns the sources whose backup failed.
fn backup_pass(
    ctx: &Context,
    mode: Mode,
    sources: &[PathBuf],
    stats: &mut TaskStats,
) -> Result<HashSet<PathBuf>> {
    let mut blocked = HashSet::new();
    let mut first = true;

    for source in sources {
        if ctx.cache().contains(mode.action(), source)? {
            continue;
        }

        let backup = BackupResource::for_source(ctx.layout(), source);
        match backup.apply() {
            Ok(ResourceChange::Applied) => {
                if first {
                    ctx.log
                        .header(&format!("Backup before {}ing", mode.verb()));
                    first = false;
                }
                let rel = backup
                    .backup
                    .strip_prefix(ctx.layout().root())
                    .unwrap_or(&backup.backup);
                ctx.log
                    .info(&format!("{} ➜ {}", basename(source), rel.display()));
                stats.backed_up += 1;
            }
            Ok(ResourceChange::AlreadyCorrect) => {}
            Err(e) => {
                ctx.log.error(&format!("{e:#}"));
                stats.failed += 1;
                blocked.insert(source.clone());
            }
        }
    }

    Ok(blocked)
}
