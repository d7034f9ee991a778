// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Username/password login.
//!
//! [`Authenticator`] looks up the credential record, checks the password
//! and mints a token. Every failure, including an unreachable store, comes
//! back as [`AuthError::InvalidCredentials`]; the real cause goes to the log.

use super::{password::SecretHasher, token::BEARER_PREFIX, AuthError, TokenService};
use crate::models::LoginResponse;
use crate::storage::{StorageResult, StoredUser};

/// Read access to credential records.
pub trait CredentialStore {
    fn find_by_username(&self, username: &str) -> StorageResult<Option<StoredUser>>;
}

/// A record already loaded from storage, so verification can run after the
/// storage lock has been released.
impl CredentialStore for Option<StoredUser> {
    fn find_by_username(&self, username: &str) -> StorageResult<Option<StoredUser>> {
        Ok(self.as_ref().filter(|user| user.username == username).cloned())
    }
}

/// Login flow over explicit collaborators.
pub struct Authenticator<'a, S: ?Sized, H: ?Sized> {
    store: &'a S,
    hasher: &'a H,
    tokens: &'a TokenService,
}

impl<'a, S, H> Authenticator<'a, S, H>
where
    S: CredentialStore + ?Sized,
    H: SecretHasher + ?Sized,
{
    pub fn new(store: &'a S, hasher: &'a H, tokens: &'a TokenService) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Verify `username`/`password` and return the profile with a fresh token.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let user = match self.store.find_by_username(username) {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.hasher.simulate_verify(password);
                tracing::info!(username, "login rejected: unknown user");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                tracing::warn!(username, error = %e, "login rejected: credential lookup failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        match self.hasher.verify(password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(username, "login rejected: password mismatch");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                tracing::warn!(username, error = %e, "login rejected: stored hash unusable");
                return Err(AuthError::InvalidCredentials);
            }
        }

        let token = self.tokens.issue_token(&user.username).map_err(|e| {
            tracing::warn!(username, error = %e, "login rejected: token signing failed");
            AuthError::InvalidCredentials
        })?;

        tracing::info!(user_id = user.id, "login succeeded");

        Ok(LoginResponse {
            id: user.id,
            name: user.name,
            username: user.username,
            photo: user.photo,
            password: String::new(),
            token: format!("{BEARER_PREFIX}{token}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::tests::fast_hasher;
    use crate::auth::token::tests::test_service;
    use crate::storage::StorageError;
    use std::collections::HashMap;

    struct MapStore(HashMap<String, StoredUser>);

    impl CredentialStore for MapStore {
        fn find_by_username(&self, username: &str) -> StorageResult<Option<StoredUser>> {
            Ok(self.0.get(username).cloned())
        }
    }

    struct BrokenStore;

    impl CredentialStore for BrokenStore {
        fn find_by_username(&self, _username: &str) -> StorageResult<Option<StoredUser>> {
            Err(StorageError::NotInitialized)
        }
    }

    fn store_with_alice(hasher: &dyn SecretHasher) -> MapStore {
        let alice = StoredUser {
            id: 1,
            name: "Alice".to_string(),
            username: "alice".to_string(),
            password_hash: hasher.hash("correct-secret").unwrap(),
            photo: "https://img.example/alice.png".to_string(),
        };
        MapStore(HashMap::from([("alice".to_string(), alice)]))
    }

    #[test]
    fn correct_password_yields_cleared_secret_and_bearer_token() {
        let hasher = fast_hasher();
        let tokens = test_service();
        let store = store_with_alice(&hasher);

        let response = Authenticator::new(&store, &hasher, &tokens)
            .authenticate("alice", "correct-secret")
            .expect("login succeeds");

        assert_eq!(response.id, 1);
        assert_eq!(response.name, "Alice");
        assert_eq!(response.photo, "https://img.example/alice.png");
        assert_eq!(response.password, "");
        assert!(response.token.starts_with("Bearer "));

        let raw = response.token.strip_prefix(BEARER_PREFIX).unwrap();
        assert_eq!(tokens.extract_subject(raw).unwrap(), "alice");
        assert!(tokens.validate(raw, "alice"));
    }

    #[test]
    fn wrong_password_and_unknown_user_look_the_same() {
        let hasher = fast_hasher();
        let tokens = test_service();
        let store = store_with_alice(&hasher);
        let authenticator = Authenticator::new(&store, &hasher, &tokens);

        let wrong = authenticator.authenticate("alice", "wrong-secret").unwrap_err();
        let unknown = authenticator.authenticate("nobody", "anything").unwrap_err();

        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert_eq!(wrong.error_code(), unknown.error_code());
    }

    #[test]
    fn prefetched_record_authenticates_only_its_username() {
        let hasher = fast_hasher();
        let tokens = test_service();
        let prefetched = store_with_alice(&hasher).0.remove("alice");

        let authenticator = Authenticator::new(&prefetched, &hasher, &tokens);
        assert!(authenticator.authenticate("alice", "correct-secret").is_ok());
        assert!(matches!(
            authenticator.authenticate("bob", "correct-secret"),
            Err(AuthError::InvalidCredentials)
        ));

        let missing: Option<StoredUser> = None;
        let result = Authenticator::new(&missing, &hasher, &tokens).authenticate("alice", "x");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn store_failure_collapses_to_invalid_credentials() {
        let hasher = fast_hasher();
        let tokens = test_service();

        let result = Authenticator::new(&BrokenStore, &hasher, &tokens)
            .authenticate("alice", "correct-secret");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn corrupt_stored_hash_collapses_to_invalid_credentials() {
        let hasher = fast_hasher();
        let tokens = test_service();
        let mut store = store_with_alice(&hasher);
        if let Some(alice) = store.0.get_mut("alice") {
            alice.password_hash = "plaintext?".to_string();
        }

        let result = Authenticator::new(&store, &hasher, &tokens)
            .authenticate("alice", "plaintext?");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }
}
