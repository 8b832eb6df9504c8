// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password digests.

use argon2::{
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use crate::error::AppError;

/// One-way password hashing capability.
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted digest of `raw`.
    fn hash(&self, raw: &str) -> Result<String, AppError>;

    /// Whether `raw` hashes to `digest`. Unparseable digests never match.
    fn matches(&self, raw: &str, digest: &str) -> bool;
}

/// Argon2id with the crate's default parameters, stored as PHC strings.
#[derive(Default, Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Argon2id with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, raw: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Argon2 hash error: {}", e)))?
            .to_string();

        tracing::debug!("Password hashed with Argon2");
        Ok(digest)
    }

    fn matches(&self, raw: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password digest is not a valid PHC string");
                return false;
            }
        };

        self.argon2
            .verify_password(raw.as_bytes(), &parsed)
            .is_ok()
    }
}
