use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use bookwarden_api::{ReservationWindow, Verdict};
use bookwarden_config::{GroupRule, RawGroupRule};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Ad-hoc check: the caller supplies the rule alongside the reservation
#[derive(Debug, Deserialize)]
pub struct RuleCheckRequest {
    pub rule: RawGroupRule,
    pub reservation: ReservationWindow,
    #[serde(default)]
    pub current_reservations: Vec<ReservationWindow>,
    #[serde(default)]
    pub weekly_hours: f64,
}

pub async fn validate_rule(
    State(state): State<AppState>,
    body: Result<Json<RuleCheckRequest>, JsonRejection>,
) -> Result<Json<Verdict>, ApiError> {
    let Json(body) = body?;
    let rule = GroupRule::from_raw(body.rule)?;

    Ok(Json(state.evaluate(
        &rule,
        &body.reservation,
        &body.current_reservations,
        body.weekly_hours,
    )))
}
