// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Composable activity filters and sort remapping.
//!
//! Filters are plain values: each optional input contributes a clause or
//! nothing, and the clauses are ANDed together. The store evaluates the
//! resulting tree against joined activity rows.

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::models::{ActivityRow, SortOrder};
use crate::time_utils::day_bounds;

/// Logical sort field exposed to clients.
pub const CATEGORY_SORT_ALIAS: &str = "category";
/// Where the category actually lives: the joined activity type's name.
pub const CATEGORY_SORT_PATH: &str = "activity_type.name";

/// Predicate over joined activity rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityFilter {
    /// Row belongs to this student.
    Owner(Uuid),
    /// Lower-cased needle contained in the category name (case-insensitive).
    CategoryContains(String),
    /// Lower-cased needle contained in the description (case-insensitive).
    DescriptionContains(String),
    /// `start <= timestamp < end`
    TimestampRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    And(Vec<ActivityFilter>),
    Or(Vec<ActivityFilter>),
}

impl ActivityFilter {
    /// The filter that constrains nothing.
    pub fn all() -> Self {
        ActivityFilter::And(Vec::new())
    }

    pub fn is_unconstrained(&self) -> bool {
        matches!(self, ActivityFilter::And(clauses) | ActivityFilter::Or(clauses) if clauses.is_empty())
    }

    /// AND two filters, flattening nested conjunctions and dropping identities.
    pub fn and(self, other: ActivityFilter) -> Self {
        let mut clauses = match self {
            ActivityFilter::And(clauses) => clauses,
            other_self => vec![other_self],
        };
        match other {
            ActivityFilter::And(more) => clauses.extend(more),
            single => clauses.push(single),
        }
        clauses.retain(|c| !c.is_unconstrained());
        ActivityFilter::And(clauses)
    }

    pub fn matches(&self, row: &ActivityRow) -> bool {
        match self {
            ActivityFilter::Owner(id) => row.activity.student_id == *id,
            ActivityFilter::CategoryContains(needle) => {
                row.activity_type.name.to_lowercase().contains(needle.as_str())
            }
            ActivityFilter::DescriptionContains(needle) => {
                row.activity.description.to_lowercase().contains(needle.as_str())
            }
            ActivityFilter::TimestampRange { start, end } => {
                *start <= row.activity.timestamp && row.activity.timestamp < *end
            }
            // An empty clause list constrains nothing, for OR as well as AND.
            ActivityFilter::Or(clauses) if clauses.is_empty() => true,
            ActivityFilter::And(clauses) => clauses.iter().all(|c| c.matches(row)),
            ActivityFilter::Or(clauses) => clauses.iter().any(|c| c.matches(row)),
        }
    }
}

/// Free-text search over category name OR description. Blank input adds no
/// constraint; otherwise the text is matched as given, surrounding
/// whitespace included.
pub fn text_filter(search: Option<&str>) -> ActivityFilter {
    match search {
        Some(text) if !text.trim().is_empty() => {
            let needle = text.to_lowercase();
            ActivityFilter::Or(vec![
                ActivityFilter::CategoryContains(needle.clone()),
                ActivityFilter::DescriptionContains(needle),
            ])
        }
        _ => ActivityFilter::all(),
    }
}

/// Restrict to one calendar day, `[day 00:00, day+1 00:00)`.
pub fn date_filter(date: Option<NaiveDate>) -> ActivityFilter {
    match date {
        Some(day) => {
            let (start, end) = day_bounds(day);
            ActivityFilter::TimestampRange { start, end }
        }
        None => ActivityFilter::all(),
    }
}

pub fn owner_filter(student_id: Uuid) -> ActivityFilter {
    ActivityFilter::Owner(student_id)
}

/// Combined filter for a student's activity listing.
pub fn build_filter(
    student_id: Uuid,
    search: Option<&str>,
    date: Option<NaiveDate>,
) -> ActivityFilter {
    owner_filter(student_id)
        .and(text_filter(search))
        .and(date_filter(date))
}

/// Rewrite logical sort fields to their storage paths. Order and directions
/// are preserved; unknown fields pass through untouched.
pub fn remap_sort(sort: Vec<SortOrder>) -> Vec<SortOrder> {
    sort.into_iter()
        .map(|order| {
            if order.field == CATEGORY_SORT_ALIAS {
                SortOrder::new(CATEGORY_SORT_PATH, order.direction)
            } else {
                order
            }
        })
        .collect()
}
