// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signup, login, token refresh and logout.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use validator::Validate;

use crate::config::REFRESH_COOKIE_NAME;
use crate::error::Result;
use crate::models::{LoginRequest, SignupRequest, StudentResponse};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth", delete(logout))
}

/// Create a new student account.
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<StudentResponse>)> {
    request.validate()?;
    let student = state.students.create(request)?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// Log in. The access token goes in the body, the refresh token in an
/// HttpOnly cookie.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<StudentResponse>)> {
    request.validate()?;
    let outcome = state.credentials.login(&request.email, &request.password)?;
    Ok((jar.add(outcome.refresh_cookie), Json(outcome.student)))
}

/// Mint a new access token from the refresh cookie.
async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<StudentResponse>> {
    let token = match jar.get(REFRESH_COOKIE_NAME) {
        Some(cookie) => cookie.value().to_string(),
        None => {
            tracing::debug!("Refresh requested without a refresh cookie");
            String::new()
        }
    };
    Ok(Json(state.credentials.refresh(&token)?))
}

/// Clear the refresh cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (StatusCode, CookieJar) {
    (StatusCode::NO_CONTENT, jar.add(state.credentials.logout()))
}
