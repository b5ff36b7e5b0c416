// Path Utilities
// Helper functions for path manipulation and the file move primitive

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Normalize a path by resolving . and .. components
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                components.pop();
            }
            std::path::Component::CurDir => {}
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Resolve a path relative to a base directory
pub fn resolve_path(base: &Path, relative: &Path) -> PathBuf {
    if relative.is_absolute() {
        relative.to_path_buf()
    } else {
        normalize_path(&base.join(relative))
    }
}

/// Path of `file` relative to the source folder it was found in.
///
/// Falls back to the bare file name when `file` is not under `root`.
pub fn relative_to_root(root: &Path, file: &Path) -> PathBuf {
    match file.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        _ => file.file_name().map(PathBuf::from).unwrap_or_default(),
    }
}

/// Build the `_N` variant of a path: `dir/name.ext` becomes `dir/name_N.ext`.
///
/// The extension is whatever follows the last dot of the file name, so
/// `archive.tar.gz` numbers as `archive.tar_1.gz` and `.bashrc` as `.bashrc_1`.
pub fn numbered_path(path: &Path, counter: usize) -> PathBuf {
    let mut name = OsString::new();
    if let Some(stem) = path.file_stem() {
        name.push(stem);
    }
    name.push(format!("_{counter}"));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }

    path.with_file_name(name)
}

/// Whether anything occupies `path`, including a dangling symlink
pub fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Check if a directory has no entries left
pub fn is_empty_dir(path: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Move a file, renaming in place when possible.
///
/// A rename across devices falls back to copy followed by removal of the source.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            copy_entry(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}

/// Copy a file or file symlink to `to`, leaving nothing behind on failure
fn copy_entry(from: &Path, to: &Path) -> io::Result<()> {
    let result = if fs::symlink_metadata(from)?.file_type().is_symlink() {
        copy_symlink(from, to)
    } else {
        fs::copy(from, to).map(|_| ())
    };

    if let Err(e) = &result {
        // `to` was free before the copy; an AlreadyExists error means it is someone else's
        if e.kind() != io::ErrorKind::AlreadyExists {
            let _ = fs::remove_file(to);
        }
    }
    result
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(from)?, to)
}

#[cfg(windows)]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(fs::read_link(from)?, to)
}

#[cfg(not(any(unix, windows)))]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to).map(|_| ())
}
