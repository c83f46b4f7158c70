//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{CredentialsError, TaskError};
use storage::repository::StorageError;

/// Errors emitted by the quiz session and its driving loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no such category")]
    InvalidSelection,

    #[error("category {name:?} has no questions")]
    EmptyCategory { name: String },

    #[error("session already completed")]
    Completed,

    #[error("session is not complete yet")]
    NotComplete,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("incorrect password")]
    IncorrectPassword,

    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the password generator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PasswordError {
    #[error("select at least one character class")]
    NoClassSelected,

    #[error("length {length} cannot fit one character from each of {classes} classes")]
    LengthTooShort { length: usize, classes: usize },
}

/// Errors emitted by `TaskService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TaskServiceError {
    #[error(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
