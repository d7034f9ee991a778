// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{SecretHasher, TokenService};
use crate::storage::JsonStorage;

/// Shared handler state.
///
/// The token service and hasher are immutable and shared without locking.
/// Storage writers take the write lock so id allocation and username
/// uniqueness checks do not race.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<RwLock<JsonStorage>>,
    pub tokens: Arc<TokenService>,
    pub hasher: Arc<dyn SecretHasher>,
}

impl AppState {
    pub fn new(
        storage: JsonStorage,
        tokens: TokenService,
        hasher: impl SecretHasher + 'static,
    ) -> Self {
        Self {
            storage: Arc::new(RwLock::new(storage)),
            tokens: Arc::new(tokens),
            hasher: Arc::new(hasher),
        }
    }
}
