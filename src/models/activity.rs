// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity and activity-type models for storage and API.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

/// Free-form activity category ("Running", "Reading", ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityType {
    pub id: Uuid,
    /// Unique category name
    pub name: String,
}

/// Stored activity record.
#[derive(Debug, Clone)]
pub struct Activity {
    pub id: Uuid,
    /// Owning student
    pub student_id: Uuid,
    pub activity_type_id: Uuid,
    pub description: String,
    /// When the activity happened (server calendar, no offset)
    pub timestamp: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Activity joined with its type. Filters and sorts run against this shape.
#[derive(Debug, Clone)]
pub struct ActivityRow {
    pub activity: Activity,
    pub activity_type: ActivityType,
}

impl ActivityRow {
    pub fn to_response(&self) -> ActivityResponse {
        ActivityResponse {
            id: self.activity.id,
            activity: self.activity_type.name.clone(),
            description: self.activity.description.clone(),
            timestamp: self.activity.timestamp,
        }
    }
}

/// Create/update body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActivityRequest {
    /// Category name; created on first use.
    #[validate(custom(function = "not_blank", message = "Activity type is required."))]
    pub activity: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to now.
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// Activity as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityResponse {
    pub id: Uuid,
    pub activity: String,
    pub description: String,
    pub timestamp: NaiveDateTime,
}
