// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! File-backed JSON storage.
//!
//! Each entity is one pretty-printed JSON file named after its numeric id.
//! Writes go to a temporary file first and are renamed into place.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use super::StoragePaths;

/// Error type for storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations
    Io(io::Error),
    /// JSON serialization/deserialization error
    Json(serde_json::Error),
    /// Entity not found
    NotFound(String),
    /// Entity already exists (or a unique field is taken)
    AlreadyExists(String),
    /// Entity is still referenced by another entity
    InUse(String),
    /// Storage not initialized
    NotInitialized,
    /// Health probe mismatch or exhausted id space
    IntegrityViolation(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::Json(e) => write!(f, "JSON error: {e}"),
            StorageError::NotFound(entity) => write!(f, "Not found: {entity}"),
            StorageError::AlreadyExists(entity) => write!(f, "Already exists: {entity}"),
            StorageError::InUse(entity) => write!(f, "Still in use: {entity}"),
            StorageError::NotInitialized => write!(f, "Storage not initialized"),
            StorageError::IntegrityViolation(msg) => write!(f, "Integrity violation: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::NotFound {
            StorageError::NotFound(e.to_string())
        } else {
            StorageError::Io(e)
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Json(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// JSON document store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    paths: StoragePaths,
    initialized: bool,
}

impl JsonStorage {
    /// Create a new JsonStorage instance.
    ///
    /// Does NOT create the directory structure. Call `initialize()` first.
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            initialized: false,
        }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Create all entity directories. Idempotent.
    pub fn initialize(&mut self) -> StorageResult<()> {
        let dirs = [
            self.paths.users_dir(),
            self.paths.categories_dir(),
            self.paths.products_dir(),
        ];

        for dir in dirs {
            fs::create_dir_all(&dir)?;
        }

        self.initialized = true;
        Ok(())
    }

    /// Write-read-delete probe of the data directory.
    pub fn health_check(&self) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let test_file = self
            .paths
            .root()
            .join(format!(".health_check_{}", Uuid::new_v4().simple()));
        let test_data = b"health_check_data";

        fs::write(&test_file, test_data)?;
        let read_data = fs::read(&test_file)?;
        fs::remove_file(&test_file)?;

        if read_data != test_data {
            return Err(StorageError::IntegrityViolation(
                "Health check data mismatch".to_string(),
            ));
        }

        Ok(())
    }

    /// Read a JSON file and deserialize it.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StorageResult<T> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let value = serde_json::from_reader(reader)?;
        Ok(value)
    }

    /// Write a JSON file (atomic write via rename).
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Per-write temp name; readers only ever see the renamed file.
        let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, path)?;
        Ok(())
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().is_file()
    }

    /// Delete a file.
    pub fn delete(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }
        fs::remove_file(path.as_ref())?;
        Ok(())
    }

    /// Numeric ids of every `<id>.json` file in `dir`, ascending.
    pub fn list_ids(&self, dir: impl AsRef<Path>) -> StorageResult<Vec<i64>> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<i64>().ok())
            {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    /// Next free id in `dir` (one past the largest present, starting at 1).
    pub fn next_id(&self, dir: impl AsRef<Path>) -> StorageResult<i64> {
        match self.list_ids(dir)?.last() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or_else(|| {
                StorageError::IntegrityViolation(format!("no id left after {max}"))
            }),
        }
    }

    /// Read every entity in `dir`, failing on the first unreadable file.
    pub fn read_all_strict<T: DeserializeOwned>(&self, dir: impl AsRef<Path>) -> StorageResult<Vec<T>> {
        let dir = dir.as_ref();
        self.list_ids(dir)?
            .into_iter()
            .map(|id| self.read_json(dir.join(format!("{id}.json"))))
            .collect()
    }

    /// Read every entity in `dir`, skipping unreadable files.
    pub fn read_all<T: DeserializeOwned>(&self, dir: impl AsRef<Path>) -> StorageResult<Vec<T>> {
        let dir = dir.as_ref();
        let mut items = Vec::new();
        for id in self.list_ids(dir)? {
            match self.read_json(dir.join(format!("{id}.json"))) {
                Ok(item) => items.push(item),
                Err(e) => tracing::warn!(id, dir = %dir.display(), error = %e, "skipping unreadable record"),
            }
        }
        Ok(items)
    }
}
