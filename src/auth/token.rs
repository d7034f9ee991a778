// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token issuance and verification.
//!
//! Tokens are HMAC-signed JWTs carrying `sub`, `iat`, `exp` and `jti`. Nothing is
//! stored server-side: a token stops working when it expires or when the
//! signing secret changes.
//!
//! Only [`TokenService::validate`] enforces expiry. The `extract_*` calls
//! check the signature and structure and nothing else, so callers that use
//! them directly must not assume the token is still live.

use std::fmt;

use base64ct::{Base64, Encoding};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;
use crate::config::ConfigError;

/// Scheme tag prepended to tokens handed to clients.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Lifetime of an issued token.
pub const TOKEN_TTL_MINUTES: i64 = 60;

/// Smallest HMAC key accepted (HS256 needs 256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

/// Claims signed into every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Username the token was issued to
    pub sub: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
    /// Random token id; two tokens issued in the same second still differ
    pub jti: String,
}

/// Symmetric key material. Never printed.
struct SigningKey {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::SecretTooShort {
                len: bytes.len(),
                min: MIN_SECRET_BYTES,
            });
        }

        // Strongest HMAC variant the key length supports.
        let algorithm = match bytes.len() {
            n if n >= 64 => Algorithm::HS512,
            n if n >= 48 => Algorithm::HS384,
            _ => Algorithm::HS256,
        };

        Ok(Self {
            algorithm,
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        })
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Issues and verifies bearer tokens with a single process-wide key.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Debug)]
pub struct TokenService {
    key: SigningKey,
    validation: Validation,
}

impl TokenService {
    /// Build the service from a base64-encoded secret.
    pub fn new(secret_b64: &str) -> Result<Self, ConfigError> {
        let bytes = Base64::decode_vec(secret_b64.trim())
            .map_err(|e| ConfigError::MalformedSecret(e.to_string()))?;
        let key = SigningKey::from_bytes(&bytes)?;

        let mut validation = Validation::new(key.algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self { key, validation })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.key.algorithm
    }

    /// Issue a token for `subject`, valid for the next hour.
    pub fn issue_token(&self, subject: &str) -> Result<String, AuthError> {
        self.issue_token_at(subject, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_token_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat,
            exp: iat + Duration::minutes(TOKEN_TTL_MINUTES).num_seconds(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(self.key.algorithm), &claims, &self.key.encoding)
            .map_err(|e| AuthError::Internal(format!("failed to sign token: {e}")))
    }

    /// Verify signature and structure, returning the claims. Expiry is not checked.
    pub fn decode_claims(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.key.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(kind = ?e.kind(), "token rejected");
                AuthError::InvalidToken
            })
    }

    /// Subject of a correctly signed token, expired or not.
    pub fn extract_subject(&self, token: &str) -> Result<String, AuthError> {
        self.decode_claims(token).map(|claims| claims.sub)
    }

    /// Expiry of a correctly signed token, expired or not.
    pub fn extract_expiry(&self, token: &str) -> Result<DateTime<Utc>, AuthError> {
        let claims = self.decode_claims(token)?;
        Utc.timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(AuthError::InvalidToken)
    }

    /// True only if the token verifies, names `expected_subject` and has not expired.
    pub fn validate(&self, token: &str, expected_subject: &str) -> bool {
        self.validate_at(token, expected_subject, Utc::now())
    }

    /// [`validate`](Self::validate) against an explicit clock.
    pub fn validate_at(&self, token: &str, expected_subject: &str, now: DateTime<Utc>) -> bool {
        match self.decode_claims(token) {
            Ok(claims) => claims.sub == expected_subject && now.timestamp() < claims.exp,
            Err(_) => false,
        }
    }
}

/// Strip the `Bearer ` scheme tag, if present.
pub fn strip_bearer(value: &str) -> Option<&str> {
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
