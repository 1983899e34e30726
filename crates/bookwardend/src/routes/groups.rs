use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use bookwarden_api::{GroupSummary, ReservationWindow, Verdict};
use bookwarden_config::{Group, GroupRule};
use bookwarden_util::BookwardenError;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Check against a configured group's rule
#[derive(Debug, Deserialize)]
pub struct GroupCheckRequest {
    pub reservation: ReservationWindow,
    #[serde(default)]
    pub current_reservations: Vec<ReservationWindow>,
    #[serde(default)]
    pub weekly_hours: f64,
}

pub async fn list_groups(State(state): State<AppState>) -> Json<Vec<GroupSummary>> {
    Json(state.config.group_summaries())
}

pub async fn get_group_rule(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<GroupRule>, ApiError> {
    let group = find_group(&state, &slug)?;
    Ok(Json(group.rule.clone()))
}

pub async fn validate_group(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    body: Result<Json<GroupCheckRequest>, JsonRejection>,
) -> Result<Json<Verdict>, ApiError> {
    let group = find_group(&state, &slug)?;
    let Json(body) = body?;

    Ok(Json(state.evaluate(
        &group.rule,
        &body.reservation,
        &body.current_reservations,
        body.weekly_hours,
    )))
}

fn find_group<'a>(state: &'a AppState, slug: &str) -> Result<&'a Group, ApiError> {
    state
        .config
        .get_group(slug)
        .ok_or_else(|| BookwardenError::not_found(format!("Group '{}'", slug)).into())
}
