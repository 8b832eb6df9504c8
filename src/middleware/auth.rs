// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer-token authentication.
//!
//! The `authenticate` middleware runs on every request. It never rejects:
//! a valid access token binds an [`AuthUser`] into the request extensions,
//! anything else leaves the request anonymous. Handlers that need a caller
//! take `AuthUser` as an extractor, which turns "nothing bound" into 401.

use crate::error::AppError;
use crate::services::token::{TokenCodec, TokenKind};
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated student for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub student_id: Uuid,
}

/// Bind the caller's identity, if the request carries a usable access token.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(user) = principal_from_headers(request.headers(), &state.tokens) {
        request.extensions_mut().insert(user);
    }
    next.run(request).await
}

/// Resolve the principal carried by `Authorization: Bearer <token>`.
pub fn principal_from_headers(headers: &HeaderMap, tokens: &TokenCodec) -> Option<AuthUser> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?
        .strip_prefix(BEARER_PREFIX)?;

    let claims = match tokens.decode(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(reason = %e, "Ignoring bearer token");
            return None;
        }
    };

    if claims.kind != TokenKind::Access {
        tracing::debug!("Ignoring bearer token of non-access kind");
        return None;
    }

    Some(AuthUser {
        student_id: claims.subject,
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(AppError::AuthenticationRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Duration;

    fn codec() -> TokenCodec {
        TokenCodec::new(
            b"test_jwt_key_32_bytes_minimum!!!",
            Duration::hours(1),
            Duration::days(7),
        )
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_access_token_binds_principal() {
        let id = Uuid::new_v4();
        let token = codec().issue_access(id).unwrap();

        let user = principal_from_headers(&headers(&format!("Bearer {token}")), &codec());
        assert_eq!(user, Some(AuthUser { student_id: id }));
    }

    #[test]
    fn test_missing_or_unusable_header_stays_anonymous() {
        let id = Uuid::new_v4();
        let refresh = codec().issue_refresh(id).unwrap();
        let access = codec().issue_access(id).unwrap();

        assert_eq!(principal_from_headers(&HeaderMap::new(), &codec()), None);
        assert_eq!(
            principal_from_headers(&headers(&format!("Bearer {refresh}")), &codec()),
            None
        );
        assert_eq!(
            principal_from_headers(&headers(&format!("Basic {access}")), &codec()),
            None
        );
        assert_eq!(
            principal_from_headers(&headers("Bearer invalid.token.here"), &codec()),
            None
        );
    }

    #[test]
    fn test_expired_token_stays_anonymous() {
        let id = Uuid::new_v4();
        let token = codec()
            .issue_at(
                id,
                TokenKind::Access,
                Duration::hours(1),
                chrono::Utc::now() - Duration::hours(2),
            )
            .unwrap();

        assert_eq!(
            principal_from_headers(&headers(&format!("Bearer {token}")), &codec()),
            None
        );
    }
}
