// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path layout for the catalog store.

use std::path::{Path, PathBuf};

use crate::config::DEFAULT_DATA_DIR;

/// Storage path utilities.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== User Paths ==========

    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    pub fn user(&self, user_id: i64) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    // ========== Category Paths ==========

    pub fn categories_dir(&self) -> PathBuf {
        self.root.join("categories")
    }

    pub fn category(&self, category_id: i64) -> PathBuf {
        self.categories_dir().join(format!("{category_id}.json"))
    }

    // ========== Product Paths ==========

    pub fn products_dir(&self) -> PathBuf {
        self.root.join("products")
    }

    pub fn product(&self, product_id: i64) -> PathBuf {
        self.products_dir().join(format!("{product_id}.json"))
    }
}
