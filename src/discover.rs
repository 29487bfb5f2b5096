use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("Path '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("Please provide a Python file or directory, got '{}'", .0.display())]
    NotPython(PathBuf),
}

/// Resolve the user-supplied path into the Python files to analyze.
///
/// A `.py` file resolves to itself. A directory is walked recursively in
/// file-name order, skipping directories whose name is in `exclude`.
/// Entries that cannot be read during the walk are logged and skipped.
#[instrument(skip(path, exclude), fields(path = %path.display()))]
pub fn collect_python_files(
    path: &Path,
    exclude: &[String],
) -> Result<Vec<PathBuf>, DiscoverError> {
    if !path.exists() {
        return Err(DiscoverError::NotFound(path.to_path_buf()));
    }

    if path.is_file() {
        return if is_python(path) {
            Ok(vec![path.to_path_buf()])
        } else {
            Err(DiscoverError::NotPython(path.to_path_buf()))
        };
    }

    if !path.is_dir() {
        return Err(DiscoverError::NotPython(path.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, exclude));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && is_python(entry.path()) {
            files.push(entry.into_path());
        }
    }

    debug!(files = files.len(), "collected Python files");
    Ok(files)
}

fn is_python(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "py")
}

/// The walk root itself is never excluded.
fn is_excluded(entry: &DirEntry, exclude: &[String]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| exclude.iter().any(|excluded| excluded == name))
}
