//! File I/O utilities with atomic writes
//!
//! Collection files are small JSON documents that may be rewritten by other
//! tools between polls, so every read goes to disk and every write replaces
//! the file in one rename.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::error::TuitionError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, TuitionError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| TuitionError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| TuitionError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to a unique temp file, fsync, then rename)
///
/// Readers polling the file see either the old or the new document, never a
/// partially written one. Concurrent writers never share a temp file.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), TuitionError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let parent = parent_dir(path);

    fs::create_dir_all(parent).map_err(|e| {
        TuitionError::Storage(format!(
            "Failed to create directory {}: {}",
            parent.display(),
            e
        ))
    })?;

    // Same directory as the target so the rename stays on one filesystem
    let mut temp = NamedTempFile::new_in(parent)
        .map_err(|e| TuitionError::Storage(format!("Failed to create temp file: {}", e)))?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, data)
            .map_err(|e| TuitionError::Storage(format!("Failed to serialize data: {}", e)))?;
        writer
            .flush()
            .map_err(|e| TuitionError::Storage(format!("Failed to flush data: {}", e)))?;
    }

    temp.as_file()
        .sync_all()
        .map_err(|e| TuitionError::Storage(format!("Failed to sync data: {}", e)))?;

    temp.persist(path).map_err(|e| {
        TuitionError::Storage(format!("Failed to replace {}: {}", path.display(), e.error))
    })?;

    Ok(())
}

/// Exclusive lock on a sibling `<file>.lock`, held until dropped
///
/// The lock is advisory and spans processes, so every writer of the same
/// file must take it around its whole read-modify-write.
#[derive(Debug)]
pub struct FileLock {
    file: File,
}

impl FileLock {
    /// Block until the lock for `path` is held
    pub fn acquire<P: AsRef<Path>>(path: P) -> Result<Self, TuitionError> {
        let path = path.as_ref();
        let lock_path = lock_path_for(path);
        fs::create_dir_all(parent_dir(path)).map_err(|e| {
            TuitionError::Storage(format!("Failed to create directory for lock: {}", e))
        })?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                TuitionError::Storage(format!("Failed to open {}: {}", lock_path.display(), e))
            })?;

        file.lock_exclusive().map_err(|e| {
            TuitionError::Storage(format!("Failed to lock {}: {}", lock_path.display(), e))
        })?;

        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// State of a collection file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileHealth {
    Missing,
    Valid,
    Invalid,
}

impl std::fmt::Display for FileHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::Valid => write!(f, "ok"),
            Self::Invalid => write!(f, "invalid JSON"),
        }
    }
}

/// Check whether a file exists and parses as JSON
pub fn json_file_health<P: AsRef<Path>>(path: P) -> FileHealth {
    let path = path.as_ref();
    if !path.exists() {
        return FileHealth::Missing;
    }

    match File::open(path) {
        Ok(file) => match serde_json::from_reader::<_, serde_json::Value>(BufReader::new(file)) {
            Ok(_) => FileHealth::Valid,
            Err(_) => FileHealth::Invalid,
        },
        Err(_) => FileHealth::Invalid,
    }
}
