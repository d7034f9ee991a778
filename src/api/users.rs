// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints: registration, login and account management.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::{Auth, AuthError, AuthenticatedUser, Authenticator},
    error::ApiError,
    models::{LoginRequest, LoginResponse, RegisterUserRequest, UpdateUserRequest, User},
    state::AppState,
    storage::{NewUser, StoredUser, UserRepository},
};

/// Argon2 hashing on the blocking pool; no storage lock is held.
async fn hash_password(state: &AppState, password: String) -> Result<String, ApiError> {
    let hasher = Arc::clone(&state.hasher);
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing task failed");
            ApiError::internal("Could not store credentials")
        })?
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            ApiError::internal("Could not store credentials")
        })
}

/// Exchange a username and password for a bearer token.
///
/// Unknown usernames and wrong passwords produce the same 401 response. The
/// record is read under the storage lock; password verification runs on the
/// blocking pool after the lock is released.
#[utoipa::path(
    post,
    path = "/v1/users/login",
    request_body = LoginRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 401, description = "Invalid username or password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let record = {
        let storage = state.storage.read().await;
        UserRepository::new(&storage).find_by_username(&request.username)
    };
    let record = record.map_err(|e| {
        tracing::warn!(username = %request.username, error = %e, "login rejected: credential lookup failed");
        AuthError::InvalidCredentials
    })?;

    let hasher = Arc::clone(&state.hasher);
    let tokens = Arc::clone(&state.tokens);
    let response = tokio::task::spawn_blocking(move || {
        Authenticator::new(&record, hasher.as_ref(), tokens.as_ref())
            .authenticate(&request.username, &request.password)
    })
    .await
    .map_err(|e| {
        tracing::warn!(error = %e, "login rejected: verification task failed");
        AuthError::InvalidCredentials
    })??;

    Ok(Json(response))
}

/// Create an account. The password is stored only as an Argon2 hash.
#[utoipa::path(
    post,
    path = "/v1/users/register",
    request_body = RegisterUserRequest,
    tag = "Users",
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input or username already taken"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    request.validate()?;
    let password_hash = hash_password(&state, request.password).await?;

    let storage = state.storage.write().await;
    let user = UserRepository::new(&storage).create(NewUser {
        name: request.name,
        username: request.username,
        password_hash,
        photo: request.photo,
    })?;

    tracing::info!(user_id = user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Replace an account's profile and password.
#[utoipa::path(
    put,
    path = "/v1/users/update",
    request_body = UpdateUserRequest,
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid input or username owned by another user"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "User not found"),
    )
)]
pub async fn update_user(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    request.validate()?;
    let password_hash = hash_password(&state, request.password).await?;

    let user = StoredUser {
        id: request.id,
        name: request.name,
        username: request.username,
        password_hash,
        photo: request.photo,
    };

    let storage = state.storage.write().await;
    UserRepository::new(&storage).update(&user)?;

    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/v1/users/all",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [User]),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn list_users(
    Auth(_caller): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, ApiError> {
    let storage = state.storage.read().await;
    let users = UserRepository::new(&storage).list_all()?;
    Ok(Json(users.into_iter().map(User::from).collect()))
}

#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = User),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "User not found"),
    )
)]
pub async fn get_user(
    Auth(_caller): Auth,
    Path(user_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    let storage = state.storage.read().await;
    let user = UserRepository::new(&storage).get(user_id)?;
    Ok(Json(user.into()))
}

/// Identity behind the presented token.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = AuthenticatedUser),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(Auth(user): Auth) -> Json<AuthenticatedUser> {
    Json(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BEARER_PREFIX;
    use crate::auth::password::tests::fast_hasher;
    use crate::auth::{Argon2Hasher, SecretHasher};
    use crate::state::tests::{alice, seed_user, test_state, test_state_with};
    use chrono::Utc;
    use std::sync::{mpsc, Mutex};
    use std::time::Duration;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

    /// Hasher whose `verify` parks until the test lets it finish.
    struct GatedHasher {
        inner: Argon2Hasher,
        entered: UnboundedSender<()>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl GatedHasher {
        fn new() -> (Self, UnboundedReceiver<()>, mpsc::Sender<()>) {
            let (entered_tx, entered_rx) = unbounded_channel();
            let (release_tx, release_rx) = mpsc::channel();
            let hasher = Self {
                inner: fast_hasher(),
                entered: entered_tx,
                release: Mutex::new(release_rx),
            };
            (hasher, entered_rx, release_tx)
        }
    }

    impl SecretHasher for GatedHasher {
        fn hash(&self, secret: &str) -> Result<String, AuthError> {
            self.inner.hash(secret)
        }

        fn verify(&self, secret: &str, hash: &str) -> Result<bool, AuthError> {
            let _ = self.entered.send(());
            let _ = self.release.lock().unwrap().recv();
            self.inner.verify(secret, hash)
        }
    }

    fn caller(user: &StoredUser) -> Auth {
        Auth(AuthenticatedUser {
            user_id: user.id,
            username: user.username.clone(),
            expires_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn register_hashes_password_and_hides_it() {
        let (state, _dir) = test_state();

        let (status, Json(user)) = register(State(state.clone()), Json(alice()))
            .await
            .expect("registration succeeds");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user.username, "alice");

        let storage = state.storage.read().await;
        let stored = UserRepository::new(&storage).get(user.id).unwrap();
        assert_ne!(stored.password_hash, "correct-secret");
        assert!(state
            .hasher
            .verify("correct-secret", &stored.password_hash)
            .unwrap());
    }

    #[tokio::test]
    async fn register_duplicate_username_is_bad_request() {
        let (state, _dir) = test_state();
        seed_user(&state, alice()).await;

        let err = register(State(state), Json(alice())).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_returns_bearer_token() {
        let (state, _dir) = test_state();
        seed_user(&state, alice()).await;

        let Json(response) = login(
            State(state.clone()),
            Json(LoginRequest {
                username: "alice".to_string(),
                password: "correct-secret".to_string(),
            }),
        )
        .await
        .expect("login succeeds");

        assert_eq!(response.password, "");
        let token = response.token.strip_prefix(BEARER_PREFIX).unwrap();
        assert!(state.tokens.validate(token, "alice"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn writers_proceed_while_login_verifies() {
        let (hasher, mut entered, release) = GatedHasher::new();
        let (state, _dir) = test_state_with(hasher);
        seed_user(&state, alice()).await;

        let pending = tokio::spawn(login(
            State(state.clone()),
            Json(LoginRequest {
                username: "alice".to_string(),
                password: "correct-secret".to_string(),
            }),
        ));
        entered.recv().await.expect("verification started");

        // Password verification is in flight; storage must still be writable.
        let writer = tokio::time::timeout(Duration::from_secs(5), state.storage.write()).await;
        assert!(writer.is_ok(), "writer blocked behind password verification");
        drop(writer);

        release.send(()).unwrap();
        let Json(response) = pending.await.unwrap().expect("login succeeds");
        assert_eq!(response.username, "alice");
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let (state, _dir) = test_state();
        seed_user(&state, alice()).await;

        let wrong = login(
            State(state.clone()),
            Json(LoginRequest {
                username: "alice".to_string(),
                password: "wrong-secret".to_string(),
            }),
        )
        .await
        .unwrap_err();
        let unknown = login(
            State(state),
            Json(LoginRequest {
                username: "nobody".to_string(),
                password: "anything".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(wrong.error_code(), "invalid_credentials");
        assert_eq!(unknown.error_code(), "invalid_credentials");
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn update_rehashes_password() {
        let (state, _dir) = test_state();
        let stored = seed_user(&state, alice()).await;

        let Json(updated) = update_user(
            caller(&stored),
            State(state.clone()),
            Json(UpdateUserRequest {
                id: stored.id,
                name: "Alice B.".to_string(),
                username: "alice".to_string(),
                password: "a-new-secret".to_string(),
                photo: String::new(),
            }),
        )
        .await
        .expect("update succeeds");
        assert_eq!(updated.name, "Alice B.");

        let storage = state.storage.read().await;
        let reloaded = UserRepository::new(&storage).get(stored.id).unwrap();
        assert!(state.hasher.verify("a-new-secret", &reloaded.password_hash).unwrap());
        assert!(!state.hasher.verify("correct-secret", &reloaded.password_hash).unwrap());
    }

    #[tokio::test]
    async fn update_unknown_user_is_not_found() {
        let (state, _dir) = test_state();
        let stored = seed_user(&state, alice()).await;

        let err = update_user(
            caller(&stored),
            State(state),
            Json(UpdateUserRequest {
                id: 999,
                name: "Nobody".to_string(),
                username: "nobody".to_string(),
                password: "long-enough".to_string(),
                photo: String::new(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_to_taken_username_is_bad_request() {
        let (state, _dir) = test_state();
        let first = seed_user(&state, alice()).await;
        let mut bob = alice();
        bob.username = "bob".to_string();
        let second = seed_user(&state, bob).await;

        let err = update_user(
            caller(&first),
            State(state),
            Json(UpdateUserRequest {
                id: second.id,
                name: "Bob".to_string(),
                username: "alice".to_string(),
                password: "long-enough".to_string(),
                photo: String::new(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_and_get_users() {
        let (state, _dir) = test_state();
        let stored = seed_user(&state, alice()).await;

        let Json(all) = list_users(caller(&stored), State(state.clone())).await.unwrap();
        assert_eq!(all.len(), 1);

        let Json(one) = get_user(caller(&stored), Path(stored.id), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(one.username, "alice");

        let err = get_user(caller(&stored), Path(404), State(state)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
