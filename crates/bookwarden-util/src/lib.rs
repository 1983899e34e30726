//! Shared utilities for bookwarden
//!
//! This crate provides:
//! - Time utilities (wall-clock time of day, weekday masks, mockable clock)
//! - ID types (RequestId)
//! - Error types
//! - Default paths for the configuration file

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
