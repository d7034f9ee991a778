// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Username/password login issuing short-lived bearer tokens.
//!
//! ## Auth Flow
//!
//! 1. Client posts `{username, password}` to `/v1/users/login`
//! 2. Server:
//!    - Loads the credential record by username
//!    - Verifies the password against its Argon2 hash
//!    - Issues an HMAC-signed JWT (`sub`, `iat`, `exp`, one hour)
//! 3. Client sends `Authorization: Bearer <token>` on later requests
//! 4. The `Auth` extractor verifies signature, subject and expiry
//!
//! ## Security
//!
//! - One symmetric key, loaded once at startup, signs and verifies everything
//! - No server-side sessions: tokens die by expiry or a secret change
//! - Unknown user and wrong password are indistinguishable to the caller

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod service;
pub mod token;

pub use claims::AuthenticatedUser;
pub use error::AuthError;
pub use extractor::Auth;
pub use password::{Argon2Hasher, SecretHasher};
pub use service::{Authenticator, CredentialStore};
pub use token::{TokenClaims, TokenService, BEARER_PREFIX};
