// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{token::strip_bearer, AuthError, AuthenticatedUser};
use crate::state::AppState;
use crate::storage::UserRepository;

/// Extractor for authenticated users.
///
/// Reads `Authorization: Bearer <token>`, checks the signature, loads the
/// named user from storage and then runs the full validation (subject and
/// expiry) against that record. A token for a deleted or renamed user is
/// rejected.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Already resolved earlier in this request
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = strip_bearer(auth_header).ok_or(AuthError::InvalidAuthHeader)?;

        let user = verify_bearer(token, state).await?;
        parts.extensions.insert(user.clone());

        Ok(Auth(user))
    }
}

/// Resolve a raw token to the user it was issued to.
async fn verify_bearer(token: &str, state: &AppState) -> Result<AuthenticatedUser, AuthError> {
    let username = state.tokens.extract_subject(token)?;

    let record = {
        let storage = state.storage.read().await;
        UserRepository::new(&storage)
            .find_by_username(&username)
            .map_err(|e| AuthError::Internal(format!("user lookup failed: {e}")))?
    };

    let Some(record) = record else {
        tracing::debug!(username, "token names an unknown user");
        return Err(AuthError::InvalidToken);
    };

    if !state.tokens.validate(token, &record.username) {
        return Err(AuthError::InvalidToken);
    }

    let expires_at = state.tokens.extract_expiry(token)?;
    Ok(AuthenticatedUser::from_record(&record, expires_at))
}
