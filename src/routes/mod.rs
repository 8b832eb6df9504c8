// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod activities;
pub mod auth;
pub mod students;

use crate::error::Result;
use crate::middleware::auth::authenticate;
use crate::models::{PageRequest, SortOrder};
use crate::AppState;
use axum::http::{header, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Turn raw `page`, `size` and repeated `sort` query parameters into a
/// [`PageRequest`].
pub(crate) fn page_request(
    page: Option<u32>,
    size: Option<u32>,
    sort: &[String],
) -> Result<PageRequest> {
    let sort = sort
        .iter()
        .map(|raw| SortOrder::parse(raw))
        .collect::<Result<Vec<_>>>()?;
    Ok(PageRequest::new(page, size, sort))
}

/// Build the complete router with all routes.
///
/// Authentication runs on every route and only binds the caller; handlers
/// that need a caller reject anonymous requests themselves.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    Router::new()
        .route("/health", get(health_check))
        .merge(auth::routes())
        .merge(students::routes())
        .merge(activities::routes())
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::Direction;

    #[test]
    fn test_page_request_from_query_parts() {
        let request = page_request(
            Some(2),
            Some(500),
            &["category,desc".to_string(), "timestamp".to_string()],
        )
        .unwrap();

        assert_eq!(request.page, 2);
        assert_eq!(request.size, 100);
        assert_eq!(
            request.sort,
            vec![
                SortOrder::new("category", Direction::Desc),
                SortOrder::new("timestamp", Direction::Asc),
            ]
        );
    }

    #[test]
    fn test_page_request_rejects_bad_direction() {
        assert!(matches!(
            page_request(None, None, &["timestamp,sideways".to_string()]),
            Err(AppError::BadRequest(_))
        ));
    }
}
