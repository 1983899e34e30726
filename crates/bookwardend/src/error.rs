//! HTTP error mapping

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bookwarden_api::{ErrorInfo, RegistrationError};
use bookwarden_config::RuleError;
use bookwarden_util::BookwardenError;
use tracing::{debug, error};

/// Handler error; renders as a JSON `ErrorInfo` body
#[derive(Debug)]
pub struct ApiError(pub BookwardenError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            BookwardenError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BookwardenError::NotFound(_) => StatusCode::NOT_FOUND,
            BookwardenError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        } else {
            debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }
        (status, Json(ErrorInfo::from(&self.0))).into_response()
    }
}

impl From<BookwardenError> for ApiError {
    fn from(err: BookwardenError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(BookwardenError::invalid_input(rejection.body_text()))
    }
}

impl From<RuleError> for ApiError {
    fn from(err: RuleError) -> Self {
        ApiError(BookwardenError::invalid_input_with_details(
            "Invalid rule",
            err.errors(),
        ))
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        ApiError(BookwardenError::invalid_input(err.to_string()))
    }
}
