use std::any::Any;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use bookwarden_util::{BookwardenError, RequestId};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::info_span;

use crate::error::ApiError;
use crate::state::AppState;

mod auth;
mod groups;
mod health;
mod rules;

pub use groups::GroupCheckRequest;
pub use rules::RuleCheckRequest;

/// Build the full service router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/rules/validate", post(rules::validate_rule))
        .route("/groups", get(groups::list_groups))
        .route("/groups/:slug/rule", get(groups::get_group_rule))
        .route("/groups/:slug/validate", post(groups::validate_group))
        .route("/auth/register/validate", post(auth::validate_registration))
        .fallback(handler_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                info_span!(
                    "request",
                    request_id = %RequestId::new(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}

async fn handler_not_found() -> ApiError {
    ApiError(BookwardenError::not_found("No such route"))
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    ApiError(BookwardenError::internal(format!("Handler panicked: {}", detail))).into_response()
}
