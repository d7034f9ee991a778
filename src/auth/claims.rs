// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated user representation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::storage::StoredUser;

/// The caller behind a validated bearer token.
///
/// This is the primary type used by handlers to represent the user making a
/// request. Built fresh from storage on every request.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Storage id of the user
    pub user_id: i64,

    /// Login name (token `sub` claim)
    pub username: String,

    /// Token expiration
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedUser {
    pub fn from_record(user: &StoredUser, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            expires_at,
        }
    }
}
