//! Shared types for the bookwarden API

use chrono::{DateTime, FixedOffset, TimeDelta, Timelike};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A candidate or existing reservation.
///
/// Both timestamps carry an explicit offset; a timestamp without one is
/// rejected when the window is deserialized, as is a leap second (`:60`).
/// `start < end` is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationWindow {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start: DateTime<FixedOffset>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub end: DateTime<FixedOffset>,
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<FixedOffset>, D::Error> {
    let timestamp = DateTime::<FixedOffset>::deserialize(deserializer)?;
    // chrono encodes a leap second as a nanosecond count past one second
    if timestamp.nanosecond() >= 1_000_000_000 {
        return Err(de::Error::custom(format!(
            "leap second in {} is not supported",
            timestamp.to_rfc3339()
        )));
    }
    Ok(timestamp)
}

impl ReservationWindow {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    /// Signed length of the window (negative when `end < start`)
    pub fn duration(&self) -> TimeDelta {
        self.end.signed_duration_since(self.start)
    }

    /// Signed length of the window in fractional hours, microsecond precision
    pub fn duration_hours(&self) -> f64 {
        let delta = self.duration();
        match delta.num_microseconds() {
            Some(us) => us as f64 / 3_600_000_000.0,
            None => delta.num_seconds() as f64 / 3600.0,
        }
    }
}

/// Why a reservation was not auto-allowed.
///
/// Serializes to the exact reason strings returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonCode {
    #[serde(rename = "reservation too far in future")]
    TooFarInFuture,
    #[serde(rename = "reservation too close to start time")]
    TooCloseToStart,
    #[serde(rename = "too many active reservations")]
    TooManyActiveReservations,
    #[serde(rename = "weekly hour limit exceeded")]
    WeeklyHourLimitExceeded,
    #[serde(rename = "weekday not allowed")]
    WeekdayNotAllowed,
    #[serde(rename = "time outside allowed ranges")]
    OutsideAllowedTimeRanges,
    /// Informational, but still counts as a reason
    #[serde(rename = "host approval required")]
    HostApprovalRequired,
}

impl ReasonCode {
    /// Every reason, in the order checks are evaluated
    pub const ALL: [ReasonCode; 7] = [
        ReasonCode::TooFarInFuture,
        ReasonCode::TooCloseToStart,
        ReasonCode::TooManyActiveReservations,
        ReasonCode::WeeklyHourLimitExceeded,
        ReasonCode::WeekdayNotAllowed,
        ReasonCode::OutsideAllowedTimeRanges,
        ReasonCode::HostApprovalRequired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::TooFarInFuture => "reservation too far in future",
            ReasonCode::TooCloseToStart => "reservation too close to start time",
            ReasonCode::TooManyActiveReservations => "too many active reservations",
            ReasonCode::WeeklyHourLimitExceeded => "weekly hour limit exceeded",
            ReasonCode::WeekdayNotAllowed => "weekday not allowed",
            ReasonCode::OutsideAllowedTimeRanges => "time outside allowed ranges",
            ReasonCode::HostApprovalRequired => "host approval required",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating a reservation against a group rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub allowed: bool,
    /// In check evaluation order
    pub reasons: Vec<ReasonCode>,
}

impl Verdict {
    /// Build a verdict; allowed iff there are no reasons
    pub fn from_reasons(reasons: Vec<ReasonCode>) -> Self {
        Self {
            allowed: reasons.is_empty(),
            reasons,
        }
    }
}

/// Configured group, as listed to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}
