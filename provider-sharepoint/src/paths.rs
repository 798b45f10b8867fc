//! Mapping remote files to local paths.
//!
//! Paths are always taken relative to the folder the walk started from.

use crate::error::{Result, SharePointError};
use crate::walker::RemoteFileEntry;
use std::path::{Component, Path, PathBuf};

/// Local layout of a folder download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathPolicy {
    /// Recreate the remote folder hierarchy below the target directory
    #[default]
    Preserve,
    /// Place every file directly in the target directory; same-named files overwrite each other
    Flatten,
}

impl PathPolicy {
    pub fn from_flatten(flatten: bool) -> Self {
        if flatten {
            PathPolicy::Flatten
        } else {
            PathPolicy::Preserve
        }
    }
}

/// Local destination of `entry` under `target_dir`.
///
/// Rejects relative paths that would leave `target_dir`.
pub fn local_path_for(entry: &RemoteFileEntry, target_dir: &Path, policy: PathPolicy) -> Result<PathBuf> {
    match policy {
        PathPolicy::Preserve => join_relative(target_dir, &entry.relative_path),
        PathPolicy::Flatten => {
            let mut path = target_dir.to_path_buf();
            path.push(checked_segment(&entry.name, &entry.name)?);
            Ok(path)
        }
    }
}

/// Join a `/`-separated relative path onto `base`, segment by segment.
pub(crate) fn join_relative(base: &Path, relative: &str) -> Result<PathBuf> {
    let mut path = base.to_path_buf();
    let mut pushed = false;

    for segment in relative.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        path.push(checked_segment(segment, relative)?);
        pushed = true;
    }

    if !pushed {
        return Err(SharePointError::InvalidPath(format!(
            "'{}' does not name a file",
            relative
        )));
    }
    Ok(path)
}

/// A single path segment that stays inside its parent.
pub(crate) fn checked_segment<'a>(segment: &'a str, context: &str) -> Result<&'a Path> {
    let path = Path::new(segment);
    let mut components = path.components();

    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(path),
        _ => Err(SharePointError::InvalidPath(format!(
            "'{}' escapes the target directory",
            context
        ))),
    }
}
