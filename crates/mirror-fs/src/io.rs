//! Destination-side filesystem mutations and locked log appends
//!
//! Every function maps the underlying `std::io::Error` into the error kind
//! the mirror engine reports: [`Error::Read`] for the source side,
//! [`Error::Write`] for destination files and [`Error::DirectoryStructure`]
//! for directories.

use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Copy `src` over `dst` without ever exposing a partially written file.
///
/// Bytes go to a temporary sibling of `dst` first, which is then renamed into
/// place. The modification and access times of `src` are applied to the copy.
/// The temporary file is removed if any step fails.
pub fn copy_atomic(src: &Path, dst: &Path) -> Result<()> {
    let metadata = fs::metadata(src).map_err(|e| Error::read(src, e))?;
    let temp_path = temp_sibling(dst);

    let result = copy_into_place(src, dst, &temp_path, &metadata);
    if result.is_err() && temp_path.exists() {
        if let Err(e) = fs::remove_file(&temp_path) {
            tracing::debug!(temp = ?temp_path, error = %e, "Temporary copy left behind");
        }
    }
    result
}

fn copy_into_place(src: &Path, dst: &Path, temp_path: &Path, metadata: &fs::Metadata) -> Result<()> {
    // fs::copy reports both sides through one error; disambiguate by
    // checking whether the source is still readable
    fs::copy(src, temp_path).map_err(|e| {
        if fs::File::open(src).is_err() {
            Error::read(src, e)
        } else {
            Error::write(dst, e)
        }
    })?;

    let mtime = filetime::FileTime::from_last_modification_time(metadata);
    let atime = filetime::FileTime::from_last_access_time(metadata);
    filetime::set_file_times(temp_path, atime, mtime).map_err(|e| Error::write(dst, e))?;

    fs::rename(temp_path, dst).map_err(|e| Error::write(dst, e))?;
    Ok(())
}

/// Temporary file name used while copying into `dst`.
fn temp_sibling(dst: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.tmp",
        dst.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    dst.with_file_name(temp_name)
}

/// Create a directory and any missing ancestors.
pub fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::directory(path, e))
}

/// Remove a single destination file (or symbolic link).
pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::write(path, e))
}

/// Remove a destination directory and everything beneath it.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    fs::remove_dir_all(path).map_err(|e| Error::directory(path, e))
}

/// Append one line to a text log under an exclusive advisory lock.
///
/// The file is opened, locked, written and closed on every call so no
/// handle outlives the write.
pub fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;

    file.lock_exclusive()
        .map_err(|_| Error::LockFailed { path: path.to_path_buf() })?;

    let written = writeln!(file, "{}", line).map_err(|e| Error::io(path, e));

    // Lock is also released when the handle drops
    let _ = file.unlock();
    written
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::read(path, e))
}
