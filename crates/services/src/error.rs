//! Shared error types for the services crate.

use thiserror::Error;

use spell_core::model::{AccountError, WordListError};
use spell_core::session::SessionError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `AuthService`. Shown to the user as-is.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    InvalidEmail(#[from] AccountError),
    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },
    #[error("an account with this email already exists")]
    EmailInUse,
    #[error("incorrect email or password")]
    InvalidCredentials,
    #[error("no user role found, please contact support")]
    RoleNotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ParentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParentError {
    #[error("child name cannot be empty")]
    EmptyName,
    #[error("child not found")]
    ChildNotFound,
    #[error(transparent)]
    WordList(#[from] WordListError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `PracticeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeError {
    #[error(
        "no child named {username:?}; the child's name must match the part of their email before the @"
    )]
    NoMatchingChild { username: String },
    #[error("child not found")]
    ChildNotFound,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
