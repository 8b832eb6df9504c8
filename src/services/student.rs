// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Student accounts: signup, profile reads, updates and deletion.

use std::sync::Arc;

use uuid::Uuid;

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{Page, PageRequest, SignupRequest, Student, StudentResponse, UpdateStudentRequest};
use crate::services::password::PasswordHasher;
use crate::time_utils::now_naive;

#[derive(Clone)]
pub struct StudentService {
    store: Arc<dyn Store>,
    hasher: Arc<dyn PasswordHasher>,
}

impl StudentService {
    pub fn new(store: Arc<dyn Store>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    /// Register a new student. The email must not be taken.
    pub fn create(&self, request: SignupRequest) -> Result<StudentResponse> {
        tracing::debug!("Checking if email is unique");
        if self.store.find_student_by_email(&request.email)?.is_some() {
            tracing::info!("Signup rejected: email already exists");
            return Err(AppError::Duplicate("Email already exists.".to_string()));
        }

        let now = now_naive();
        let student = self.store.save_student(Student {
            id: Uuid::new_v4(),
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email.trim().to_string(),
            password_hash: self.hasher.hash(&request.password)?,
            created_at: now,
            updated_at: now,
        })?;

        tracing::info!(student_id = %student.id, "Student created");
        Ok(student.to_response(None))
    }

    pub fn find(&self, id: Uuid) -> Result<StudentResponse> {
        self.load(id).map(|s| s.to_response(None))
    }

    pub fn find_all(&self, page_request: &PageRequest) -> Result<Page<StudentResponse>> {
        tracing::debug!(page = page_request.page, size = page_request.size, "Fetching students");
        Ok(self
            .store
            .find_students(page_request)?
            .map(|s| s.to_response(None)))
    }

    /// Update a profile. Students may only update themselves, and a supplied
    /// password must match the current one.
    pub fn update(
        &self,
        id: Uuid,
        request: UpdateStudentRequest,
        requester_id: Uuid,
    ) -> Result<StudentResponse> {
        ensure_self(id, requester_id, "edit")?;

        tracing::debug!(student_id = %id, "Checking if email is unique");
        if let Some(holder) = self.store.find_student_by_email(&request.email)? {
            if holder.id != id {
                tracing::info!(student_id = %id, "Update rejected: email already exists");
                return Err(AppError::Duplicate("Email already exists.".to_string()));
            }
        }

        let mut student = self.load(id)?;

        if let Some(password) = request.password.as_deref() {
            if !self.hasher.matches(password, &student.password_hash) {
                tracing::info!(student_id = %id, "Update rejected: credentials incorrect");
                return Err(AppError::InvalidCredentials(
                    "Given credentials is incorrect.".to_string(),
                ));
            }
        }

        student.first_name = request.first_name;
        student.last_name = request.last_name;
        student.email = request.email.trim().to_string();
        student.updated_at = now_naive();

        let saved = self.store.save_student(student)?;
        tracing::info!(student_id = %id, "Student updated");
        Ok(saved.to_response(None))
    }

    /// Delete a student and all their activities.
    pub fn delete(&self, id: Uuid, requester_id: Uuid) -> Result<()> {
        ensure_self(id, requester_id, "delete")?;
        self.load(id)?;
        self.store.delete_student_by_id(id)?;
        tracing::info!(student_id = %id, "Student deleted");
        Ok(())
    }

    fn load(&self, id: Uuid) -> Result<Student> {
        self.store.find_student_by_id(id)?.ok_or_else(|| {
            tracing::info!(student_id = %id, "Student not found");
            AppError::NotFound("Student does not exist.".to_string())
        })
    }
}

fn ensure_self(id: Uuid, requester_id: Uuid, action: &str) -> Result<()> {
    if id != requester_id {
        tracing::warn!(student_id = %id, requester_id = %requester_id, action, "Student is not the account owner");
        return Err(AppError::Unauthorized(format!(
            "Student is not authorized to {action} this account."
        )));
    }
    Ok(())
}
