//! Generic JSON collection file
//!
//! Each collection lives in its own file as `{ "<key>": [ ... ] }`. Record
//! order on disk is the collection order the engine relies on for tie-breaks,
//! so it is preserved exactly on load and save.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use super::file_io::{read_json, write_json_atomic};
use crate::error::TuitionResult;

/// One collection file
pub struct JsonCollection<T> {
    path: PathBuf,
    key: &'static str,
    _records: PhantomData<T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf, key: &'static str) -> Self {
        Self {
            path,
            key,
            _records: PhantomData,
        }
    }

    /// Read every record; a missing file is an empty collection
    pub fn load(&self) -> TuitionResult<Vec<T>> {
        let mut document: BTreeMap<String, Vec<T>> = read_json(&self.path)?;
        Ok(document.remove(self.key).unwrap_or_default())
    }

    /// Replace the collection on disk
    pub fn save(&self, records: &[T]) -> TuitionResult<()> {
        let mut document = BTreeMap::new();
        document.insert(self.key, records);
        write_json_atomic(&self.path, &document)
    }

    /// Create the file with an empty collection unless it already exists
    pub fn ensure_exists(&self) -> TuitionResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&[])?;
        Ok(true)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
