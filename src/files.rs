//! Filesystem primitives shared by slots and backups.
//!
//! Every write goes temp-file first and only becomes visible through a
//! rename, which replaces the target atomically on the same filesystem.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::PersistError;

/// First difference between two files, as reported by [`diff_files`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileDiff {
    Size { left: u64, right: u64 },
    Byte { offset: u64, left: u8, right: u8 },
}

/// Compare two files byte by byte. Returns `None` when they are identical.
pub fn diff_files(left: &Path, right: &Path) -> io::Result<Option<FileDiff>> {
    let left_len = fs::metadata(left)?.len();
    let right_len = fs::metadata(right)?.len();
    if left_len != right_len {
        return Ok(Some(FileDiff::Size {
            left: left_len,
            right: right_len,
        }));
    }

    let mut left_reader = BufReader::new(File::open(left)?);
    let mut right_reader = BufReader::new(File::open(right)?);
    let mut offset = 0u64;
    loop {
        let l = left_reader.fill_buf()?;
        let r = right_reader.fill_buf()?;
        if l.is_empty() && r.is_empty() {
            return Ok(None);
        }
        if l.is_empty() || r.is_empty() {
            // Changed underneath us after the length check.
            return Ok(Some(FileDiff::Size {
                left: offset + l.len() as u64,
                right: offset + r.len() as u64,
            }));
        }

        let n = l.len().min(r.len());
        if let Some(i) = (0..n).find(|&i| l[i] != r[i]) {
            return Ok(Some(FileDiff::Byte {
                offset: offset + i as u64,
                left: l[i],
                right: r[i],
            }));
        }
        left_reader.consume(n);
        right_reader.consume(n);
        offset += n as u64;
    }
}

pub(crate) fn files_equal(left: &Path, right: &Path) -> Result<bool, PersistError> {
    diff_files(left, right)
        .map(|diff| diff.is_none())
        .map_err(PersistError::io("compare", right))
}

/// `path` with `suffix` appended to its final component (`cache/repos` + `_tmp`).
pub(crate) fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

pub(crate) fn ensure_parent(path: &Path) -> Result<(), PersistError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(PersistError::io("create directory", parent))
        }
        _ => Ok(()),
    }
}

/// Write `bytes` to `path` and flush them to disk before returning.
pub(crate) fn write_synced(path: &Path, bytes: &[u8]) -> Result<(), PersistError> {
    let mut file = File::create(path).map_err(PersistError::io("create", path))?;
    file.write_all(bytes).map_err(PersistError::io("write", path))?;
    file.sync_all().map_err(PersistError::io("sync", path))
}

pub(crate) fn rename(from: &Path, to: &Path) -> Result<(), PersistError> {
    fs::rename(from, to).map_err(PersistError::io("rename", from))
}

pub(crate) fn remove(path: &Path) -> Result<(), PersistError> {
    fs::remove_file(path).map_err(PersistError::io("remove", path))
}
