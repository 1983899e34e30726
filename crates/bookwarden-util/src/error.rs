//! Error types for bookwarden

use thiserror::Error;

/// Service-level error type for bookwarden operations
#[derive(Debug, Error)]
pub enum BookwardenError {
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        details: Vec<String>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BookwardenError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
            details: Vec::new(),
        }
    }

    /// Invalid input with one line per individual problem
    pub fn invalid_input_with_details(
        msg: impl Into<String>,
        details: impl IntoIterator<Item = impl ToString>,
    ) -> Self {
        Self::InvalidInput {
            message: msg.into(),
            details: details.into_iter().map(|d| d.to_string()).collect(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
