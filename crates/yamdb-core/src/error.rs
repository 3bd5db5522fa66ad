//! # AppError
//!
//! Centralized error handling for the YaMDb model layer.
//! The model itself only ever raises `ValidationError`; the remaining
//! variants are how persistence adapters report what the engine rejected.

use thiserror::Error;

/// The primary error type for all yamdb-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Resource not found (e.g., Title, Review, User)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., year in the future, reserved username)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Uniqueness violation (e.g., duplicate slug, second review by the same author)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Foreign-key violation (e.g., review pointing at a missing title)
    #[error("integrity error: {0}")]
    Integrity(String),

    /// Infrastructure failure (e.g., DB down, migration failed)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError(message.into())
    }

    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        AppError::NotFound(entity.to_string(), id.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::ValidationError(_))
    }
}

/// A specialized Result type for YaMDb logic.
pub type Result<T> = std::result::Result<T, AppError>;
