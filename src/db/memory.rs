// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process [`Store`] backed by concurrent hash maps.
//!
//! Unique indexes (student email, activity-type name) are kept in side maps
//! so uniqueness checks and inserts happen under one entry lock.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use super::Store;
use crate::error::AppError;
use crate::models::{
    Activity, ActivityRow, ActivityType, Direction, Page, PageRequest, SortOrder, Student,
};
use crate::services::query::{owner_filter, ActivityFilter, CATEGORY_SORT_PATH};

/// Fields activity listings can be ordered by. Both the storage spelling and
/// the camelCase wire spelling are accepted.
const ACTIVITY_SORT_FIELDS: &[&str] = &[
    "id",
    "description",
    "timestamp",
    "created_at",
    "createdAt",
    "updated_at",
    "updatedAt",
    CATEGORY_SORT_PATH,
];

/// Fields student listings can be ordered by.
const STUDENT_SORT_FIELDS: &[&str] = &[
    "id",
    "first_name",
    "firstName",
    "last_name",
    "lastName",
    "email",
    "created_at",
    "createdAt",
];

/// In-memory database.
#[derive(Default)]
pub struct MemoryStore {
    students: DashMap<Uuid, Student>,
    /// Lower-cased email -> student id
    student_emails: DashMap<String, Uuid>,
    activity_types: DashMap<Uuid, ActivityType>,
    /// Type name -> type id
    activity_type_names: DashMap<String, Uuid>,
    activities: DashMap<Uuid, Activity>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn join(&self, activity: Activity) -> Result<ActivityRow, AppError> {
        let activity_type = self
            .activity_types
            .get(&activity.activity_type_id)
            .map(|t| t.value().clone())
            .ok_or_else(|| {
                AppError::Database(format!(
                    "Activity {} references missing activity type {}",
                    activity.id, activity.activity_type_id
                ))
            })?;
        Ok(ActivityRow {
            activity,
            activity_type,
        })
    }

    fn matching_rows(&self, filter: &ActivityFilter) -> Result<Vec<ActivityRow>, AppError> {
        let activities: Vec<Activity> = self.activities.iter().map(|a| a.value().clone()).collect();

        let mut rows = Vec::new();
        for activity in activities {
            let row = self.join(activity)?;
            if filter.matches(&row) {
                rows.push(row);
            }
        }
        Ok(rows)
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

// ─── Sorting ─────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey<'a> {
    Text(&'a str),
    Time(NaiveDateTime),
    Id(Uuid),
}

fn activity_sort_key<'a>(row: &'a ActivityRow, field: &str) -> Option<SortKey<'a>> {
    match field {
        "id" => Some(SortKey::Id(row.activity.id)),
        "description" => Some(SortKey::Text(&row.activity.description)),
        "timestamp" => Some(SortKey::Time(row.activity.timestamp)),
        "created_at" | "createdAt" => Some(SortKey::Time(row.activity.created_at)),
        "updated_at" | "updatedAt" => Some(SortKey::Time(row.activity.updated_at)),
        CATEGORY_SORT_PATH => Some(SortKey::Text(&row.activity_type.name)),
        _ => None,
    }
}

fn student_sort_key<'a>(student: &'a Student, field: &str) -> Option<SortKey<'a>> {
    match field {
        "id" => Some(SortKey::Id(student.id)),
        "first_name" | "firstName" => Some(SortKey::Text(&student.first_name)),
        "last_name" | "lastName" => Some(SortKey::Text(&student.last_name)),
        "email" => Some(SortKey::Text(&student.email)),
        "created_at" | "createdAt" => Some(SortKey::Time(student.created_at)),
        _ => None,
    }
}

/// Order `items` by `sort`, falling back to `tie_break` so pages are stable.
fn sort_items<T, K, B>(
    items: &mut [T],
    sort: &[SortOrder],
    known_fields: &[&str],
    key: K,
    tie_break: B,
) -> Result<(), AppError>
where
    K: for<'a> Fn(&'a T, &str) -> Option<SortKey<'a>>,
    B: Fn(&T, &T) -> Ordering,
{
    if let Some(unknown) = sort
        .iter()
        .find(|o| !known_fields.contains(&o.field.as_str()))
    {
        return Err(AppError::BadRequest(format!(
            "Cannot sort by unknown property '{}'",
            unknown.field
        )));
    }

    items.sort_by(|a, b| {
        sort.iter()
            .map(|order| {
                let ord = key(a, &order.field).cmp(&key(b, &order.field));
                match order.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            })
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| tie_break(a, b))
    });
    Ok(())
}

impl Store for MemoryStore {
    fn find_student_by_email(&self, email: &str) -> Result<Option<Student>, AppError> {
        let id = match self.student_emails.get(&email_key(email)) {
            Some(id) => *id,
            None => return Ok(None),
        };
        self.find_student_by_id(id)
    }

    fn find_student_by_id(&self, id: Uuid) -> Result<Option<Student>, AppError> {
        Ok(self.students.get(&id).map(|s| s.value().clone()))
    }

    fn save_student(&self, student: Student) -> Result<Student, AppError> {
        let key = email_key(&student.email);
        match self.student_emails.entry(key.clone()) {
            Entry::Occupied(owner) if *owner.get() != student.id => {
                return Err(AppError::Duplicate("Email already exists.".to_string()));
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                slot.insert(student.id);
            }
        }

        if let Some(previous) = self.students.insert(student.id, student.clone()) {
            let previous_key = email_key(&previous.email);
            if previous_key != key {
                self.student_emails
                    .remove_if(&previous_key, |_, id| *id == student.id);
            }
        }
        Ok(student)
    }

    fn delete_student_by_id(&self, id: Uuid) -> Result<(), AppError> {
        if let Some((_, student)) = self.students.remove(&id) {
            self.student_emails
                .remove_if(&email_key(&student.email), |_, owner| *owner == id);
        }
        self.activities.retain(|_, a| a.student_id != id);
        Ok(())
    }

    fn find_students(&self, request: &PageRequest) -> Result<Page<Student>, AppError> {
        let mut students: Vec<Student> = self.students.iter().map(|s| s.value().clone()).collect();
        sort_items(
            &mut students,
            &request.sort,
            STUDENT_SORT_FIELDS,
            student_sort_key,
            |a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
        )?;
        Page::from_ordered(students, request)
    }

    fn find_activity_type_by_name(&self, name: &str) -> Result<Option<ActivityType>, AppError> {
        let id = match self.activity_type_names.get(name) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.activity_types.get(&id).map(|t| t.value().clone()))
    }

    fn save_activity_type(&self, activity_type: ActivityType) -> Result<ActivityType, AppError> {
        // A concurrent insert of the same name wins; hand back the stored type.
        let id = *self
            .activity_type_names
            .entry(activity_type.name.clone())
            .or_insert(activity_type.id);

        if id == activity_type.id {
            self.activity_types.insert(id, activity_type.clone());
            return Ok(activity_type);
        }

        self.activity_types
            .get(&id)
            .map(|t| t.value().clone())
            .ok_or_else(|| AppError::Database(format!("Activity type {id} vanished")))
    }

    fn save_activity(&self, activity: Activity) -> Result<ActivityRow, AppError> {
        if !self.students.contains_key(&activity.student_id) {
            return Err(AppError::Database(format!(
                "Activity {} references missing student {}",
                activity.id, activity.student_id
            )));
        }
        let row = self.join(activity)?;
        self.activities
            .insert(row.activity.id, row.activity.clone());
        Ok(row)
    }

    fn find_activity_by_id(&self, id: Uuid) -> Result<Option<ActivityRow>, AppError> {
        let activity = match self.activities.get(&id) {
            Some(a) => a.value().clone(),
            None => return Ok(None),
        };
        self.join(activity).map(Some)
    }

    fn delete_activity_by_id(&self, id: Uuid) -> Result<(), AppError> {
        self.activities.remove(&id);
        Ok(())
    }

    fn find_activities(
        &self,
        filter: &ActivityFilter,
        request: &PageRequest,
    ) -> Result<Page<ActivityRow>, AppError> {
        let mut rows = self.matching_rows(filter)?;
        sort_items(
            &mut rows,
            &request.sort,
            ACTIVITY_SORT_FIELDS,
            activity_sort_key,
            |a, b| {
                a.activity
                    .timestamp
                    .cmp(&b.activity.timestamp)
                    .then(a.activity.id.cmp(&b.activity.id))
            },
        )?;
        Page::from_ordered(rows, request)
    }

    fn count_activities(&self, filter: &ActivityFilter) -> Result<u64, AppError> {
        Ok(self.matching_rows(filter)?.len() as u64)
    }

    fn count_activities_by_category(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<(String, u64)>, AppError> {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for row in self.matching_rows(&owner_filter(student_id))? {
            *counts.entry(row.activity_type.name).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }

    fn count_activities_by_day(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<(NaiveDate, u64)>, AppError> {
        let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for activity in self.activities.iter().filter(|a| a.student_id == student_id) {
            *counts.entry(activity.timestamp.date()).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }

    fn daily_activity_average(&self, student_id: Uuid) -> Result<f64, AppError> {
        let per_day = self.count_activities_by_day(student_id)?;
        if per_day.is_empty() {
            return Ok(0.0);
        }
        let total: u64 = per_day.iter().map(|(_, count)| count).sum();
        Ok(total as f64 / per_day.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(raw: &str) -> NaiveDateTime {
        raw.parse().unwrap()
    }

    fn student(email: &str) -> Student {
        let now = ts("2024-01-01T00:00:00");
        Student {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password_hash: "digest".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn log(store: &MemoryStore, owner: Uuid, category: &str, when: &str) -> ActivityRow {
        let activity_type = store
            .save_activity_type(ActivityType {
                id: Uuid::new_v4(),
                name: category.to_string(),
            })
            .unwrap();
        store
            .save_activity(Activity {
                id: Uuid::new_v4(),
                student_id: owner,
                activity_type_id: activity_type.id,
                description: String::new(),
                timestamp: ts(when),
                created_at: ts(when),
                updated_at: ts(when),
            })
            .unwrap()
    }

    #[test]
    fn test_email_uniqueness_is_case_insensitive() {
        let store = MemoryStore::new();
        store.save_student(student("ada@example.com")).unwrap();

        let err = store.save_student(student("ADA@example.com")).unwrap_err();
        assert!(matches!(err, AppError::Duplicate(_)));
        assert!(store
            .find_student_by_email("Ada@Example.com")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_changing_email_frees_the_old_address() {
        let store = MemoryStore::new();
        let mut ada = store.save_student(student("ada@example.com")).unwrap();
        ada.email = "countess@example.com".to_string();
        store.save_student(ada).unwrap();

        assert!(store.find_student_by_email("ada@example.com").unwrap().is_none());
        store.save_student(student("ada@example.com")).unwrap();
    }

    #[test]
    fn test_activity_type_names_are_unique() {
        let store = MemoryStore::new();
        let first = store
            .save_activity_type(ActivityType {
                id: Uuid::new_v4(),
                name: "Running".to_string(),
            })
            .unwrap();
        let second = store
            .save_activity_type(ActivityType {
                id: Uuid::new_v4(),
                name: "Running".to_string(),
            })
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_sort_by_category_path() {
        let store = MemoryStore::new();
        let owner = store.save_student(student("ada@example.com")).unwrap().id;
        log(&store, owner, "Swimming", "2024-03-01T08:00:00");
        log(&store, owner, "Chess", "2024-03-02T08:00:00");
        log(&store, owner, "Running", "2024-03-03T08:00:00");

        let request = PageRequest::default()
            .with_sort(vec![SortOrder::new(CATEGORY_SORT_PATH, Direction::Desc)]);
        let page = store
            .find_activities(&owner_filter(owner), &request)
            .unwrap();
        let names: Vec<_> = page
            .content
            .iter()
            .map(|r| r.activity_type.name.as_str())
            .collect();

        assert_eq!(names, vec!["Swimming", "Running", "Chess"]);
    }

    #[test]
    fn test_unknown_sort_field_is_rejected() {
        let store = MemoryStore::new();
        let request =
            PageRequest::default().with_sort(vec![SortOrder::new("password_hash", Direction::Asc)]);

        let err = store
            .find_activities(&ActivityFilter::all(), &request)
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_daily_aggregates() {
        let store = MemoryStore::new();
        let owner = store.save_student(student("ada@example.com")).unwrap().id;
        let other = store.save_student(student("bob@example.com")).unwrap().id;
        log(&store, owner, "Running", "2024-03-01T07:00:00");
        log(&store, owner, "Running", "2024-03-01T12:00:00");
        log(&store, owner, "Reading", "2024-03-01T21:00:00");
        log(&store, owner, "Reading", "2024-03-07T09:00:00");
        log(&store, other, "Reading", "2024-03-07T09:00:00");

        assert_eq!(
            store.count_activities_by_day(owner).unwrap(),
            vec![
                (NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 3),
                (NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(), 1),
            ]
        );
        assert_eq!(
            store.count_activities_by_category(owner).unwrap(),
            vec![("Reading".to_string(), 2), ("Running".to_string(), 2)]
        );
        assert_eq!(store.daily_activity_average(owner).unwrap(), 2.0);
    }

    #[test]
    fn test_deleting_student_removes_their_activities() {
        let store = MemoryStore::new();
        let owner = store.save_student(student("ada@example.com")).unwrap().id;
        let row = log(&store, owner, "Running", "2024-03-01T07:00:00");

        store.delete_student_by_id(owner).unwrap();

        assert!(store.find_activity_by_id(row.activity.id).unwrap().is_none());
        assert!(store.find_student_by_email("ada@example.com").unwrap().is_none());
    }
}
