// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Student activity tracker backend.
//!
//! Students sign up, log in with email and password, and record dated
//! activities under named categories. The API lists, searches and pages
//! through those activities and summarizes them on a dashboard.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use db::Store;
use services::{ActivityService, Argon2Hasher, CredentialService, PasswordHasher, StudentService, TokenCodec};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub tokens: TokenCodec,
    pub credentials: CredentialService,
    pub students: StudentService,
    pub activities: ActivityService,
}

impl AppState {
    /// Wire the services on top of `store`, hashing passwords with Argon2.
    pub fn new(config: Config, store: Arc<dyn Store>) -> Self {
        Self::with_hasher(config, store, Arc::new(Argon2Hasher::default()))
    }

    pub fn with_hasher(
        config: Config,
        store: Arc<dyn Store>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        let tokens = TokenCodec::from_config(&config);
        let credentials = CredentialService::new(
            store.clone(),
            hasher.clone(),
            tokens.clone(),
            config.cookie_secure,
        );
        let students = StudentService::new(store.clone(), hasher);
        let activities = ActivityService::new(store.clone());

        Self {
            config,
            store,
            tokens,
            credentials,
            students,
            activities,
        }
    }
}
