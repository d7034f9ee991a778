// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Users are the credential records behind login. Each is stored as
//! `users/{id}.json`; usernames are unique across all records.

use serde::{Deserialize, Serialize};

use super::super::{JsonStorage, StorageError, StorageResult};
use crate::auth::CredentialStore;
use crate::models::User;

/// User record as persisted. `password_hash` is an Argon2 PHC string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub photo: String,
}

impl From<StoredUser> for User {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            photo: user.photo,
        }
    }
}

/// Fields for a user that has no id yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub photo: String,
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    storage: &'a JsonStorage,
}

impl<'a> UserRepository<'a> {
    pub fn new(storage: &'a JsonStorage) -> Self {
        Self { storage }
    }

    pub fn exists(&self, user_id: i64) -> bool {
        self.storage.exists(self.storage.paths().user(user_id))
    }

    /// Get a user by ID.
    pub fn get(&self, user_id: i64) -> StorageResult<StoredUser> {
        if !self.exists(user_id) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.storage.read_json(self.storage.paths().user(user_id))
    }

    /// All users, ordered by id.
    pub fn list_all(&self) -> StorageResult<Vec<StoredUser>> {
        self.storage.read_all(self.storage.paths().users_dir())
    }

    /// Look up a user by exact username.
    pub fn find_by_username(&self, username: &str) -> StorageResult<Option<StoredUser>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|user| user.username == username))
    }

    /// Owner of `username`. Unlike [`find_by_username`](Self::find_by_username)
    /// an unreadable record is an error, so uniqueness is never judged on a
    /// partial view.
    fn username_owner(&self, username: &str) -> StorageResult<Option<StoredUser>> {
        let users: Vec<StoredUser> = self
            .storage
            .read_all_strict(self.storage.paths().users_dir())?;
        Ok(users.into_iter().find(|user| user.username == username))
    }

    /// Create a user, assigning the next id. Fails if the username is taken.
    pub fn create(&self, user: NewUser) -> StorageResult<StoredUser> {
        if self.username_owner(&user.username)?.is_some() {
            return Err(StorageError::AlreadyExists(format!("User {}", user.username)));
        }

        let stored = StoredUser {
            id: self.storage.next_id(self.storage.paths().users_dir())?,
            name: user.name,
            username: user.username,
            password_hash: user.password_hash,
            photo: user.photo,
        };
        self.storage
            .write_json(self.storage.paths().user(stored.id), &stored)?;
        Ok(stored)
    }

    /// Replace an existing user. The username may not belong to another id.
    pub fn update(&self, user: &StoredUser) -> StorageResult<()> {
        if !self.exists(user.id) {
            return Err(StorageError::NotFound(format!("User {}", user.id)));
        }

        if let Some(owner) = self.username_owner(&user.username)? {
            if owner.id != user.id {
                return Err(StorageError::AlreadyExists(format!("User {}", user.username)));
            }
        }

        self.storage
            .write_json(self.storage.paths().user(user.id), user)
    }
}

impl CredentialStore for UserRepository<'_> {
    fn find_by_username(&self, username: &str) -> StorageResult<Option<StoredUser>> {
        UserRepository::find_by_username(self, username)
    }
}
