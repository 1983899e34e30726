//! Response payloads for the bookwarden HTTP surface

use bookwarden_util::BookwardenError;
use serde::{Deserialize, Serialize};

/// Error information returned in error bodies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: String,
    /// One entry per individual problem, when there is more than one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ErrorInfo {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

impl From<&BookwardenError> for ErrorInfo {
    fn from(err: &BookwardenError) -> Self {
        match err {
            BookwardenError::InvalidInput { message, details } => {
                ErrorInfo::new(ErrorCode::InvalidInput, message.clone())
                    .with_details(details.clone())
            }
            BookwardenError::NotFound(what) => ErrorInfo::new(ErrorCode::NotFound, what.clone()),
            BookwardenError::Internal(msg) => ErrorInfo::new(ErrorCode::Internal, msg.clone()),
        }
    }
}

/// Error codes for the HTTP surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Request body has the wrong shape or a field is out of bounds
    InvalidInput,
    NotFound,
    Internal,
}

/// Liveness payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
        }
    }
}

/// Result of checking a registration body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationCheck {
    pub valid: bool,
}
