//! Background check: decide whether a managed source and its destination
//! are already in sync.
use std::fs::{self, File};
use std::io::{self, BufRead as _, BufReader};
use std::path::Path;

use super::ResourceState;

/// Compare `source` with `destination`.
///
/// - destination cannot be stat'ed (missing, dangling link, permission) → [`ResourceState::Missing`]
/// - source is not a regular file → [`ResourceState::Invalid`]
/// - contents differ, or either side cannot be read → [`ResourceState::Incorrect`]
///
/// The destination is followed through symlinks, so a link pointing at the
/// source compares equal. Both files are streamed line by line and the
/// comparison stops at the first differing line; a destination with extra
/// trailing lines counts as different.
#[must_use]
pub fn compare(source: &Path, destination: &Path) -> ResourceState {
    if fs::metadata(destination).is_err() {
        return ResourceState::Missing;
    }

    match fs::symlink_metadata(source) {
        Ok(meta) if meta.is_file() => {}
        Ok(meta) => {
            return ResourceState::Invalid {
                reason: format!("source is a {}", describe(&meta)),
            };
        }
        Err(e) => {
            return ResourceState::Invalid {
                reason: format!("cannot stat source: {e}"),
            };
        }
    }

    match first_difference(source, destination) {
        Ok(None) => ResourceState::Correct,
        Ok(Some(line)) => ResourceState::Incorrect {
            current: format!("differs at line {line}"),
        },
        Err(e) => ResourceState::Incorrect {
            current: format!("unreadable: {e}"),
        },
    }
}

/// `true` iff a copy or link step must act on `source`.
#[must_use]
pub fn background_check(source: &Path, destination: &Path) -> bool {
    compare(source, destination).needs_action()
}

fn describe(meta: &fs::Metadata) -> &'static str {
    let kind = meta.file_type();
    if kind.is_dir() {
        "directory"
    } else if kind.is_symlink() {
        "symlink"
    } else {
        "special file"
    }
}

/// 1-based number of the first line that differs, or `None` if both files
/// have identical contents.
fn first_difference(a: &Path, b: &Path) -> io::Result<Option<usize>> {
    let mut left = BufReader::new(File::open(a)?);
    let mut right = BufReader::new(File::open(b)?);
    let mut left_line = Vec::new();
    let mut right_line = Vec::new();
    let mut line = 0usize;
    loop {
        line += 1;
        left_line.clear();
        right_line.clear();
        let read = left.read_until(b'\n', &mut left_line)?;
        right.read_until(b'\n', &mut right_line)?;
        if left_line != right_line {
            return Ok(Some(line));
        }
        if read == 0 {
            return Ok(None);
        }
    }
}
