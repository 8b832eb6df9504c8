// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity routes. Every route is scoped to the authenticated student.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::Query;
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ActivityRequest, ActivityResponse, DashboardSummary, Page};
use crate::routes::page_request;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/activities", get(list_activities).post(create_activity))
        .route("/activities/dashboard", get(get_dashboard))
        .route(
            "/activities/{id}",
            get(get_activity).put(update_activity).delete(delete_activity),
        )
}

#[derive(Deserialize)]
struct ActivitiesQuery {
    /// Zero-based page number
    page: Option<u32>,
    size: Option<u32>,
    /// Repeatable `field[,asc|desc]`
    #[serde(default)]
    sort: Vec<String>,
    /// Free-text search over category and description
    query: Option<String>,
    /// Restrict to one calendar day (YYYY-MM-DD)
    date: Option<String>,
}

fn parse_date(date: Option<&str>) -> Result<Option<NaiveDate>> {
    date.filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                AppError::BadRequest("Invalid 'date' parameter: must be YYYY-MM-DD".to_string())
            })
        })
        .transpose()
}

async fn list_activities(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<Page<ActivityResponse>>> {
    tracing::debug!(
        student_id = %user.student_id,
        page = ?params.page,
        size = ?params.size,
        sort = ?params.sort,
        date = ?params.date,
        "Fetching activities"
    );

    let request = page_request(params.page, params.size, &params.sort)?;
    let date = parse_date(params.date.as_deref())?;
    let page = state
        .activities
        .list(user.student_id, request, params.query.as_deref(), date)?;
    Ok(Json(page))
}

async fn create_activity(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<ActivityRequest>,
) -> Result<(StatusCode, Json<ActivityResponse>)> {
    request.validate()?;
    let created = state.activities.create(request, user.student_id)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<DashboardSummary>> {
    Ok(Json(state.activities.dashboard(user.student_id)?))
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ActivityResponse>> {
    Ok(Json(state.activities.get(id, user.student_id)?))
}

async fn update_activity(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ActivityRequest>,
) -> Result<Json<ActivityResponse>> {
    request.validate()?;
    Ok(Json(state.activities.update(id, request, user.student_id)?))
}

async fn delete_activity(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.activities.delete(id, user.student_id)?;
    Ok(StatusCode::NO_CONTENT)
}
