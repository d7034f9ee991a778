// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to JSON storage.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using the JsonStorage for all file operations.

pub mod categories;
pub mod products;
pub mod users;

pub use categories::CategoryRepository;
pub use products::{ProductRepository, StoredProduct};
pub use users::{NewUser, StoredUser, UserRepository};
