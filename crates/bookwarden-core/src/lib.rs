//! Reservation policy evaluator for bookwarden
//!
//! Given a group rule, a candidate reservation, the requester's existing
//! reservations and the hours they already used this week, decide whether
//! the reservation is allowed and list every reason it is not.
//!
//! Evaluation is pure: no I/O, no shared state, no clock reads. The caller
//! supplies `now`.

mod engine;

pub use engine::*;
