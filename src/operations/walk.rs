// Tree Walking
// Enumerates the files under each source folder

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{FsAction, FsFailure};

/// Symlinks to directories are skipped, everything else that is not a directory counts
fn is_mergeable(entry: &DirEntry) -> bool {
    if entry.file_type().is_dir() {
        return false;
    }
    !(entry.path_is_symlink() && entry.path().is_dir())
}

/// List every file under `root`, depth-first with a directory visited before
/// its contents and siblings in file-name order.
pub(crate) fn collect_files(root: &Path) -> Result<Vec<PathBuf>, FsFailure> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            FsFailure::new(FsAction::Walk, path, e.into())
        })?;

        if is_mergeable(&entry) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Count the files across all roots before anything moves
pub(crate) fn count_files(roots: &[PathBuf]) -> Result<usize, FsFailure> {
    let mut total = 0;
    for root in roots {
        total += collect_files(root)?.len();
    }
    Ok(total)
}
