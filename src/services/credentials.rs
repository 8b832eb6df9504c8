// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, access-token refresh and logout.
//!
//! Login and refresh failures are deliberately vague: an unknown email and a
//! wrong password produce the same error, as do every flavor of bad refresh
//! token and a refresh token whose student no longer exists.
//!
//! Refresh tokens are stateless. They are not rotated on use and there is no
//! deny-list, so a refresh token stays valid until it expires, even after
//! logout.

use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, SameSite};
use once_cell::sync::OnceCell;

use crate::config::REFRESH_COOKIE_NAME;
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::StudentResponse;
use crate::services::password::PasswordHasher;
use crate::services::token::{TokenCodec, TokenKind};

const INVALID_LOGIN: &str = "Invalid email or password.";
const INVALID_REFRESH: &str = "Invalid refresh token.";
/// Verified against when the email is unknown, so both login failures cost
/// one password check.
const DUMMY_PASSWORD: &str = "dummy password for unknown emails";

/// Result of a successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    /// Profile plus access token, for the JSON body.
    pub student: StudentResponse,
    /// `Set-Cookie` directive carrying the refresh token.
    pub refresh_cookie: Cookie<'static>,
}

/// Credential checks and token issuance.
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn Store>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenCodec,
    cookie_secure: bool,
    dummy_digest: Arc<OnceCell<String>>,
}

impl CredentialService {
    pub fn new(
        store: Arc<dyn Store>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: TokenCodec,
        cookie_secure: bool,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            cookie_secure,
            dummy_digest: Arc::new(OnceCell::new()),
        }
    }

    /// Verify email + password and issue an access/refresh token pair.
    pub fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        tracing::debug!("Looking up student by email");
        let student = match self.store.find_student_by_email(email)? {
            Some(student) => student,
            None => {
                let digest = self
                    .dummy_digest
                    .get_or_try_init(|| self.hasher.hash(DUMMY_PASSWORD))?;
                self.hasher.matches(password, digest);
                tracing::info!("Login rejected: unknown email");
                return Err(AppError::InvalidLogin(INVALID_LOGIN.to_string()));
            }
        };

        if !self.hasher.matches(password, &student.password_hash) {
            tracing::info!(student_id = %student.id, "Login rejected: password mismatch");
            return Err(AppError::InvalidLogin(INVALID_LOGIN.to_string()));
        }

        let refresh_token = self.tokens.issue_refresh(student.id).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Refresh token creation failed: {}", e))
        })?;
        let access_token = self.tokens.issue_access(student.id).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Access token creation failed: {}", e))
        })?;

        tracing::info!(student_id = %student.id, "Student logged in");

        Ok(LoginOutcome {
            student: student.to_response(Some(access_token)),
            refresh_cookie: self.refresh_cookie(
                refresh_token,
                time::Duration::seconds(self.tokens.refresh_ttl().num_seconds()),
            ),
        })
    }

    /// Exchange a refresh token for a fresh access token.
    pub fn refresh(&self, refresh_token: &str) -> Result<StudentResponse> {
        let claims = self.tokens.decode(refresh_token).map_err(|e| {
            tracing::info!(reason = %e, "Refresh rejected: token did not verify");
            AppError::InvalidLogin(INVALID_REFRESH.to_string())
        })?;

        if claims.kind != TokenKind::Refresh {
            tracing::info!("Refresh rejected: not a refresh token");
            return Err(AppError::InvalidLogin(INVALID_REFRESH.to_string()));
        }

        let student = self
            .store
            .find_student_by_id(claims.subject)?
            .ok_or_else(|| {
                tracing::warn!(student_id = %claims.subject, "Refresh rejected: student no longer exists");
                AppError::InvalidLogin(INVALID_REFRESH.to_string())
            })?;

        let access_token = self.tokens.issue_access(student.id).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Access token creation failed: {}", e))
        })?;

        tracing::info!(student_id = %student.id, "Access token refreshed");
        Ok(student.to_response(Some(access_token)))
    }

    /// Directive that makes the client drop its refresh cookie.
    pub fn logout(&self) -> Cookie<'static> {
        tracing::debug!("Clearing refresh token cookie");
        self.refresh_cookie(String::new(), time::Duration::ZERO)
    }

    /// Issuing and clearing share every attribute but value and max-age, so
    /// the browser treats them as the same cookie.
    fn refresh_cookie(&self, value: String, max_age: time::Duration) -> Cookie<'static> {
        Cookie::build((REFRESH_COOKIE_NAME, value))
            .http_only(true)
            .path("/")
            .same_site(SameSite::Lax)
            .secure(self.cookie_secure)
            .max_age(max_age)
            .build()
    }
}
