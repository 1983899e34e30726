//! bookwardend - reservation policy evaluation over HTTP
//!
//! The service is stateless: every request carries the candidate reservation
//! and the requester's usage snapshot, and the answer is a verdict computed
//! by [`bookwarden_core::evaluate`]. Configured groups supply named rules.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
