use axum::Json;
use axum::extract::rejection::JsonRejection;
use bookwarden_api::{RawRegistration, Registration, RegistrationCheck};
use tracing::debug;

use crate::error::ApiError;

/// Dry-run of the registration checks; nothing is stored
pub async fn validate_registration(
    body: Result<Json<RawRegistration>, JsonRejection>,
) -> Result<Json<RegistrationCheck>, ApiError> {
    let Json(body) = body?;
    let registration = Registration::try_from(body)?;
    debug!(name = registration.name(), "Registration accepted");

    Ok(Json(RegistrationCheck { valid: true }))
}
