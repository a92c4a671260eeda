//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout the tracker.
//! Every error maps to a stable error code so the controller can decide how to
//! report it (hard failure vs. "no rows affected").
//!
//! # Error Categories
//! - `ConnectivityFailure`: Store unreachable at startup or during a query
//! - `ConstraintViolation`: Foreign-key, uniqueness, or check rule rejected a write
//! - `NotFound`: An update/delete matched no row
//! - `ValidationFailure`: User input failed a local check (before any store call)
//! - `QueryFailed`: Any other store-side statement failure
//! - `ConfigError`: Configuration file or connection parameter errors
//! - `PromptFailed`: The interactive prompt could not read input

use thiserror::Error;

/// Main error type for tracker operations
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Store unreachable or connection dropped
    #[error("Connection failed: {0}")]
    ConnectivityFailure(String),

    /// A store constraint rejected a write; no partial mutation was applied
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Update or delete targeted a nonexistent row
    #[error("No rows affected: {0}")]
    NotFound(String),

    /// User input failed a local check
    #[error("{0}")]
    ValidationFailure(String),

    /// Statement execution failed for a reason other than a constraint
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Configuration error (file not found, invalid JSON, missing parameter)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Interactive prompt failed (terminal closed, interrupted)
    #[error("Prompt failed: {0}")]
    PromptFailed(String),

    /// Writing rendered output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    /// Convert error to a stable error code string
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectivityFailure(_) => "CONNECTIVITY_FAILURE",
            Self::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ValidationFailure(_) => "VALIDATION_FAILURE",
            Self::QueryFailed(_) => "QUERY_FAILED",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::PromptFailed(_) => "PROMPT_FAILED",
            Self::Io(_) => "IO_ERROR",
        }
    }

    /// Get the plain-language message shown to the user
    ///
    /// Never contains credentials: connection errors are built from driver
    /// messages, which do not echo passwords.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Whether this error is reported as a warning rather than a failure
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Create a connectivity failure error
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::ConnectivityFailure(message.into())
    }

    /// Create a constraint violation error
    pub fn constraint_violation(message: impl Into<String>) -> Self {
        Self::ConstraintViolation(message.into())
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation failure error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailure(message.into())
    }

    /// Create a query failed error
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed(message.into())
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a prompt failed error
    pub fn prompt_failed(message: impl Into<String>) -> Self {
        Self::PromptFailed(message.into())
    }
}

impl From<dialoguer::Error> for TrackerError {
    fn from(err: dialoguer::Error) -> Self {
        Self::PromptFailed(err.to_string())
    }
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;
