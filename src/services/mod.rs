// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod credentials;
pub mod password;
pub mod query;
pub mod student;
pub mod token;

pub use activity::ActivityService;
pub use credentials::{CredentialService, LoginOutcome};
pub use password::{Argon2Hasher, PasswordHasher};
pub use student::StudentService;
pub use token::{TokenClaims, TokenCodec, TokenError, TokenKind};
