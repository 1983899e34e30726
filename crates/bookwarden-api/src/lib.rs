//! Wire types for bookwarden
//!
//! This crate defines the stable shapes exchanged with callers:
//! - Reservation windows and verdicts (with their reason codes)
//! - Response payloads (health, errors)
//! - The registration schema and its construction-time checks
//! - Versioning

mod auth;
mod responses;
mod types;

pub use auth::*;
pub use responses::*;
pub use types::*;
