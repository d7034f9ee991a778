// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Catalog Storage
//!
//! Persistent storage as JSON documents under `DATA_DIR`.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   users/{id}.json        # Credential records (password hash, profile)
//!   categories/{id}.json
//!   products/{id}.json     # References its category by id
//! ```
//!
//! Callers serialize writers through the `RwLock` in `AppState`; id
//! allocation and uniqueness checks assume they hold the write lock.

pub mod json_store;
pub mod paths;
pub mod repository;

pub use json_store::{JsonStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{
    CategoryRepository, NewUser, ProductRepository, StoredProduct, StoredUser, UserRepository,
};
