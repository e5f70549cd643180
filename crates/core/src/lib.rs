//! Shared primitives for all Rust crates in the blend service.

#![forbid(unsafe_code)]

/// Redacted credential values.
pub mod secret;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use secret::SecretString;

/// Result type used across blend crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid caller input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Referenced directory resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Resource exists but is of the wrong kind for the operation.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Computation succeeded but produced no allowed groups.
    #[error("no intersection groups found: {0}")]
    NoIntersection(String),

    /// Transport or authentication failure talking to an upstream service.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
