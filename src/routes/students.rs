// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Student profile routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::Query;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Page, StudentResponse, UpdateStudentRequest};
use crate::routes::page_request;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/students", get(list_students))
        .route(
            "/students/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}

#[derive(Deserialize)]
struct StudentsQuery {
    page: Option<u32>,
    size: Option<u32>,
    #[serde(default)]
    sort: Vec<String>,
}

async fn list_students(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<StudentsQuery>,
) -> Result<Json<Page<StudentResponse>>> {
    tracing::debug!(student_id = %user.student_id, "Listing students");
    let request = page_request(params.page, params.size, &params.sort)?;
    Ok(Json(state.students.find_all(&request)?))
}

async fn get_student(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentResponse>> {
    Ok(Json(state.students.find(id)?))
}

async fn update_student(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStudentRequest>,
) -> Result<Json<StudentResponse>> {
    request.validate()?;
    Ok(Json(state.students.update(id, request, user.student_id)?))
}

/// Delete the caller's own account together with their activities.
async fn delete_student(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.students.delete(id, user.student_id)?;
    Ok(StatusCode::NO_CONTENT)
}
