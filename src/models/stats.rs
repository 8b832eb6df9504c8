// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard statistics returned to the frontend.
//!
//! Each figure is computed by its own store query, scoped to one student.

use chrono::NaiveDate;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// Per-student activity summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardSummary {
    pub student_id: Uuid,
    /// All activities ever logged
    pub total_count: u64,
    /// Activities logged today (UTC calendar)
    pub today_count: u64,
    /// Mean activities per day, over days with at least one activity
    pub daily_average: f64,
    /// Histogram by category name, sorted by name
    pub count_per_activity: Vec<ActivityCount>,
    /// Histogram by calendar day, oldest first
    pub count_per_day: Vec<DailyCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityCount {
    pub activity: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}
