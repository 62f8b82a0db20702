//! Cross-cutting error types for Seva-Setu.
//!
//! Storage, auth, and HTTP errors live in their own crates and wrap this one
//! where a core check (validation, lookup) fails.

use thiserror::Error;

/// Errors that can be raised by any Seva-Setu crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Record lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (missing fields, unknown enum values).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Shorthand for a [`CoreError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
