//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::io;
use std::path::Path;

/// Create `dir` and any missing ancestors with mode `0777` (before umask).
///
/// Existing directories are left untouched.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt as _;
        builder.mode(0o777);
    }
    builder.create(dir)
}

/// Remove an existing file or symlink at `path`, including broken symlinks.
///
/// Does nothing if `path` does not exist. Real directories are removed
/// recursively only when `allow_dir` is set.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path, allow_dir: bool) -> io::Result<()> {
    match path.symlink_metadata() {
        Ok(meta) if meta.is_dir() => {
            if allow_dir {
                std::fs::remove_dir_all(path)
            } else {
                Err(io::Error::new(
                    io::ErrorKind::IsADirectory,
                    format!("{} is a directory", path.display()),
                ))
            }
        }
        Ok(_) => std::fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Recursively copy a directory tree.
///
/// Symlinks within the source tree are *followed*: [`Path::is_dir`] follows
/// symlinks, so directory symlinks are recursed into and their contents
/// materialised rather than copying the link itself.
///
/// # Errors
///
/// Returns an error if the destination directory cannot be created, a source
/// entry cannot be read, or a file cannot be copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)
        .with_context(|| format!("creating directory {}", dst.display()))?;
    for entry in
        std::fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", src.display()))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path).with_context(|| {
                format!("copying {} to {}", src_path.display(), dst_path.display())
            })?;
        }
    }
    Ok(())
}

/// Move `from` to `to`.
///
/// Uses [`std::fs::rename`] so the move is atomic within one filesystem.
/// Falls back to copy+delete when the rename crosses a filesystem boundary
/// (EXDEV). Symlinks are moved as links, not as their targets.
///
/// # Errors
///
/// Returns an error if neither the rename nor the fallback succeeds.
pub fn move_path(from: &Path, to: &Path) -> Result<()> {
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => copy_then_delete(from, to),
        Err(e) => {
            Err(e).with_context(|| format!("rename {} to {}", from.display(), to.display()))
        }
    }
}

fn copy_then_delete(from: &Path, to: &Path) -> Result<()> {
    let meta = from
        .symlink_metadata()
        .with_context(|| format!("reading metadata: {}", from.display()))?;
    if meta.is_symlink() {
        #[cfg(unix)]
        {
            let target = std::fs::read_link(from)
                .with_context(|| format!("reading link: {}", from.display()))?;
            std::os::unix::fs::symlink(&target, to)
                .with_context(|| format!("creating symlink {}", to.display()))?;
        }
        std::fs::remove_file(from).with_context(|| format!("removing {}", from.display()))?;
    } else if meta.is_dir() {
        copy_dir_recursive(from, to)?;
        std::fs::remove_dir_all(from).with_context(|| format!("removing {}", from.display()))?;
    } else {
        std::fs::copy(from, to)
            .with_context(|| format!("copying {} to {}", from.display(), to.display()))?;
        std::fs::remove_file(from).with_context(|| format!("removing {}", from.display()))?;
    }
    Ok(())
}
