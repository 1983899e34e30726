//! Raw configuration schema (as parsed from TOML or a request body)

use serde::{Deserialize, Serialize};

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// HTTP service settings
    #[serde(default)]
    pub server: RawServerConfig,

    /// Named groups with their reservation rules
    #[serde(default)]
    pub groups: Vec<RawGroup>,
}

/// Service-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServerConfig {
    /// Listen address (default: 127.0.0.1:8000)
    pub bind: Option<String>,

    /// Log level filter, e.g. "info" or "bookwardend=debug"
    pub log_level: Option<String>,
}

/// Raw group definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawGroup {
    /// Unique stable slug, used in URLs
    pub slug: String,

    /// Display name
    pub name: String,

    /// Free-form note shown to members
    pub memo: Option<String>,

    /// Reservation rule; an absent table means no restrictions
    #[serde(default)]
    pub rule: RawGroupRule,
}

/// Reservation rule as written by a caller.
///
/// Numeric fields use wide signed types so out-of-range values reach
/// validation and get a precise message instead of a generic parse error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawGroupRule {
    /// Furthest booking horizon, in days
    #[serde(default)]
    pub reservation_open_days_before: Option<i64>,

    /// Minimum lead time before start, in minutes
    #[serde(default)]
    pub reservation_close_minutes_before: Option<i64>,

    /// Cap on the requester's active reservations
    #[serde(default)]
    pub max_simultaneous_reservations: Option<i64>,

    /// Cap on reserved hours per week
    #[serde(default)]
    pub max_weekly_hours: Option<f64>,

    /// Allowed daily time ranges
    #[serde(default)]
    pub allowed_time_ranges: Option<Vec<RawTimeRange>>,

    /// Weekdays on which no reservation may start
    #[serde(default)]
    pub restricted_weekdays: RawDays,

    /// Surface "host approval required" on every evaluation
    #[serde(default)]
    pub requires_host_approval: bool,
}

/// Allowed daily time range
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawTimeRange {
    /// Start time (HH:MM or HH:MM:SS)
    pub start: String,

    /// End time (HH:MM or HH:MM:SS)
    pub end: String,
}

/// Days specification: a preset ("weekdays", "weekends", "all") or a list
/// of weekday indices (0 = Monday) and/or names ("sat", "sunday")
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawDays {
    Preset(String),
    List(Vec<RawDay>),
}

impl Default for RawDays {
    fn default() -> Self {
        RawDays::List(Vec::new())
    }
}

/// A single weekday, by index or by name
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawDay {
    Index(i64),
    Name(String),
}
