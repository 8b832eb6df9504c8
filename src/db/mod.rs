// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer.
//!
//! Services talk to storage only through [`Store`]. [`MemoryStore`] is the
//! in-process implementation the server and tests run against.

pub mod memory;

pub use memory::MemoryStore;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Activity, ActivityRow, ActivityType, Page, PageRequest, Student};
use crate::services::query::ActivityFilter;

/// Storage operations consumed by the services.
///
/// Calls are synchronous and never retried by callers; failures surface as
/// [`AppError::Database`] (or [`AppError::BadRequest`] for unorderable sort
/// fields).
pub trait Store: Send + Sync {
    // ─── Students ────────────────────────────────────────────────

    fn find_student_by_email(&self, email: &str) -> Result<Option<Student>, AppError>;

    fn find_student_by_id(&self, id: Uuid) -> Result<Option<Student>, AppError>;

    /// Insert or replace by id.
    fn save_student(&self, student: Student) -> Result<Student, AppError>;

    /// Remove a student and every activity they own.
    fn delete_student_by_id(&self, id: Uuid) -> Result<(), AppError>;

    fn find_students(&self, request: &PageRequest) -> Result<Page<Student>, AppError>;

    // ─── Activity types ──────────────────────────────────────────

    fn find_activity_type_by_name(&self, name: &str) -> Result<Option<ActivityType>, AppError>;

    fn save_activity_type(&self, activity_type: ActivityType) -> Result<ActivityType, AppError>;

    // ─── Activities ──────────────────────────────────────────────

    /// Insert or replace by id, returning the joined row.
    fn save_activity(&self, activity: Activity) -> Result<ActivityRow, AppError>;

    fn find_activity_by_id(&self, id: Uuid) -> Result<Option<ActivityRow>, AppError>;

    fn delete_activity_by_id(&self, id: Uuid) -> Result<(), AppError>;

    /// Rows matching `filter`, ordered by `request.sort` (physical field paths)
    /// and sliced into the requested page.
    fn find_activities(
        &self,
        filter: &ActivityFilter,
        request: &PageRequest,
    ) -> Result<Page<ActivityRow>, AppError>;

    fn count_activities(&self, filter: &ActivityFilter) -> Result<u64, AppError>;

    /// `(category name, count)` for one student, sorted by name.
    fn count_activities_by_category(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<(String, u64)>, AppError>;

    /// `(day, count)` for one student, oldest day first. Only days with
    /// activity appear.
    fn count_activities_by_day(&self, student_id: Uuid)
        -> Result<Vec<(NaiveDate, u64)>, AppError>;

    /// Mean activities per day over the days that have any.
    fn daily_activity_average(&self, student_id: Uuid) -> Result<f64, AppError>;
}
