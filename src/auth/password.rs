// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing and verification using Argon2id.
//!
//! Hashes are PHC strings carrying their own salt and parameters, so
//! verification works across parameter changes.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use super::AuthError;

/// One-way hashing of user passwords.
pub trait SecretHasher: Send + Sync {
    /// Hash a plaintext password with a fresh salt.
    fn hash(&self, secret: &str) -> Result<String, AuthError>;

    /// Check a plaintext password against a stored hash.
    fn verify(&self, secret: &str, hash: &str) -> Result<bool, AuthError>;

    /// Spend roughly the cost of a verification without a stored hash.
    ///
    /// Called when a login names an unknown user so both failure paths take
    /// comparable time.
    fn simulate_verify(&self, secret: &str) {
        let _ = self.hash(secret);
    }
}

/// Argon2id hasher.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Hasher with the crate's recommended default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with explicit cost parameters (memory in KiB, iterations, lanes).
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, AuthError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| AuthError::Internal(format!("invalid argon2 parameters: {e}")))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl SecretHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("failed to hash password: {e}")))
    }

    fn verify(&self, secret: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::Internal(format!("invalid password hash format: {e}")))?;

        Ok(self
            .argon2
            .verify_password(secret.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Cheap parameters so tests stay fast.
    pub(crate) fn fast_hasher() -> Argon2Hasher {
        Argon2Hasher::with_params(8, 1, 1).expect("valid params")
    }

    #[test]
    fn hash_and_verify() {
        let hasher = fast_hasher();
        let password = "correct-horse-battery-staple";
        let hash = hasher.hash(password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains(password));
        assert!(hasher.verify(password, &hash).unwrap());
        assert!(!hasher.verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn different_salts() {
        let hasher = fast_hasher();
        let hash1 = hasher.hash("same-password").unwrap();
        let hash2 = hasher.hash("same-password").unwrap();

        assert_ne!(hash1, hash2);
        assert!(hasher.verify("same-password", &hash1).unwrap());
        assert!(hasher.verify("same-password", &hash2).unwrap());
    }

    #[test]
    fn hashes_verify_across_parameter_sets() {
        let hash = fast_hasher().hash("portable").unwrap();
        assert!(Argon2Hasher::new().verify("portable", &hash).unwrap());
    }

    #[test]
    fn invalid_hash_format() {
        let result = fast_hasher().verify("password", "not-a-valid-hash");
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[test]
    fn invalid_params_rejected() {
        assert!(Argon2Hasher::with_params(0, 0, 0).is_err());
    }
}
