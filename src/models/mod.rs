// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod page;
pub mod stats;
pub mod student;

pub use activity::{Activity, ActivityRequest, ActivityResponse, ActivityRow, ActivityType};
pub use page::{Direction, Page, PageRequest, SortOrder};
pub use stats::{ActivityCount, DailyCount, DashboardSummary};
pub use student::{LoginRequest, SignupRequest, Student, StudentResponse, UpdateStudentRequest};
