// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity service.
//!
//! Every operation is scoped to one student. Listings filter by owner in the
//! query; single-row operations fetch the row first and then check the owner,
//! so "does not exist" and "not yours" stay distinguishable.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{
    Activity, ActivityCount, ActivityRequest, ActivityResponse, ActivityRow, ActivityType,
    DailyCount, DashboardSummary, Page, PageRequest,
};
use crate::services::query::{build_filter, date_filter, owner_filter, remap_sort};
use crate::time_utils::{now_naive, today};

/// Filtered, owner-scoped activity queries and mutations.
#[derive(Clone)]
pub struct ActivityService {
    store: Arc<dyn Store>,
}

impl ActivityService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Log a new activity, creating its category on first use.
    pub fn create(&self, request: ActivityRequest, student_id: Uuid) -> Result<ActivityResponse> {
        let activity_type = self.find_or_create_type(&request.activity)?;

        tracing::debug!(student_id = %student_id, "Fetching student details");
        if self.store.find_student_by_id(student_id)?.is_none() {
            tracing::warn!(student_id = %student_id, "Activity for unknown student");
            return Err(AppError::NotFound("Student does not exist.".to_string()));
        }

        let now = now_naive();
        let row = self.store.save_activity(Activity {
            id: Uuid::new_v4(),
            student_id,
            activity_type_id: activity_type.id,
            description: request.description,
            timestamp: request.timestamp.unwrap_or(now),
            created_at: now,
            updated_at: now,
        })?;

        tracing::info!(
            student_id = %student_id,
            activity_id = %row.activity.id,
            activity_type = %row.activity_type.name,
            "Activity created"
        );
        Ok(row.to_response())
    }

    /// One page of a student's activities, optionally narrowed by free-text
    /// search and by calendar day.
    pub fn list(
        &self,
        student_id: Uuid,
        page_request: PageRequest,
        search: Option<&str>,
        date: Option<NaiveDate>,
    ) -> Result<Page<ActivityResponse>> {
        let filter = build_filter(student_id, search, date);
        let sort = remap_sort(page_request.sort.clone());
        let page_request = page_request.with_sort(sort);

        tracing::debug!(
            student_id = %student_id,
            page = page_request.page,
            size = page_request.size,
            sort = ?page_request.sort,
            "Fetching activities"
        );

        let page = self.store.find_activities(&filter, &page_request)?;
        Ok(page.map(|row| row.to_response()))
    }

    /// Fetch one activity the requester owns.
    pub fn get(&self, activity_id: Uuid, requester_id: Uuid) -> Result<ActivityResponse> {
        self.find_owned(activity_id, requester_id, "access")
            .map(|row| row.to_response())
    }

    pub fn update(
        &self,
        activity_id: Uuid,
        request: ActivityRequest,
        requester_id: Uuid,
    ) -> Result<ActivityResponse> {
        let row = self.find_owned(activity_id, requester_id, "edit")?;
        let activity_type = self.find_or_create_type(&request.activity)?;

        let mut activity = row.activity;
        activity.activity_type_id = activity_type.id;
        activity.description = request.description;
        if let Some(timestamp) = request.timestamp {
            activity.timestamp = timestamp;
        }
        activity.updated_at = now_naive();

        let saved = self.store.save_activity(activity)?;
        tracing::info!(activity_id = %activity_id, "Activity updated");
        Ok(saved.to_response())
    }

    pub fn delete(&self, activity_id: Uuid, requester_id: Uuid) -> Result<()> {
        self.find_owned(activity_id, requester_id, "delete")?;
        self.store.delete_activity_by_id(activity_id)?;
        tracing::info!(activity_id = %activity_id, "Activity deleted");
        Ok(())
    }

    /// Dashboard figures as of today (UTC).
    pub fn dashboard(&self, student_id: Uuid) -> Result<DashboardSummary> {
        self.dashboard_on(student_id, today())
    }

    /// Dashboard figures, treating `day` as today.
    pub fn dashboard_on(&self, student_id: Uuid, day: NaiveDate) -> Result<DashboardSummary> {
        tracing::debug!(student_id = %student_id, "Fetching numerical summary");
        let owner = owner_filter(student_id);
        let total_count = self.store.count_activities(&owner)?;
        let today_count = self
            .store
            .count_activities(&owner.clone().and(date_filter(Some(day))))?;
        let daily_average = self.store.daily_activity_average(student_id)?;

        tracing::debug!(student_id = %student_id, "Getting activities per activity type");
        let count_per_activity = self
            .store
            .count_activities_by_category(student_id)?
            .into_iter()
            .map(|(activity, count)| ActivityCount { activity, count })
            .collect();

        tracing::debug!(student_id = %student_id, "Getting activities per day");
        let count_per_day = self
            .store
            .count_activities_by_day(student_id)?
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect();

        Ok(DashboardSummary {
            student_id,
            total_count,
            today_count,
            daily_average,
            count_per_activity,
            count_per_day,
        })
    }

    /// Fetch, then check ownership.
    fn find_owned(&self, activity_id: Uuid, requester_id: Uuid, action: &str) -> Result<ActivityRow> {
        let row = self.store.find_activity_by_id(activity_id)?.ok_or_else(|| {
            tracing::info!(activity_id = %activity_id, "Activity does not exist");
            AppError::NotFound("Activity does not exist.".to_string())
        })?;

        if row.activity.student_id != requester_id {
            tracing::warn!(
                activity_id = %activity_id,
                requester_id = %requester_id,
                action,
                "Student is not the activity owner"
            );
            return Err(AppError::Unauthorized(format!(
                "Student is not authorized to {action} this activity."
            )));
        }
        Ok(row)
    }

    fn find_or_create_type(&self, name: &str) -> Result<ActivityType> {
        let name = name.trim();
        if let Some(existing) = self.store.find_activity_type_by_name(name)? {
            return Ok(existing);
        }

        tracing::debug!(activity_type = %name, "Creating activity type");
        self.store.save_activity_type(ActivityType {
            id: Uuid::new_v4(),
            name: name.to_string(),
        })
    }
}
