//! Validated rule and server structures

use crate::schema::{RawConfig, RawGroup, RawGroupRule, RawServerConfig, RawTimeRange};
use crate::validation::{parse_days, parse_time, validate_group_rule};
use crate::RuleError;
use bookwarden_api::GroupSummary;
use bookwarden_util::{DaysOfWeek, WallClock};
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;

/// Default listen address
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000);

/// Validated service configuration
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub server: ServerSettings,

    /// Configured groups, in file order
    pub groups: Vec<Group>,
}

impl ServerConfig {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            server: ServerSettings::from_raw(raw.server),
            groups: raw.groups.into_iter().map(Group::from_raw).collect(),
        }
    }

    /// Get group by slug
    pub fn get_group(&self, slug: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.slug == slug)
    }

    pub fn group_summaries(&self) -> Vec<GroupSummary> {
        self.groups.iter().map(Group::summary).collect()
    }
}

/// HTTP service settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub bind: SocketAddr,
    pub log_level: Option<String>,
}

impl ServerSettings {
    fn from_raw(raw: RawServerConfig) -> Self {
        Self {
            bind: raw
                .bind
                .and_then(|b| b.parse().ok())
                .unwrap_or(DEFAULT_BIND),
            log_level: raw.log_level,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND,
            log_level: None,
        }
    }
}

/// Validated group definition
#[derive(Debug, Clone)]
pub struct Group {
    pub slug: String,
    pub name: String,
    pub memo: Option<String>,
    pub rule: GroupRule,
}

impl Group {
    fn from_raw(raw: RawGroup) -> Self {
        Self {
            slug: raw.slug,
            name: raw.name,
            memo: raw.memo,
            rule: GroupRule::convert(raw.rule),
        }
    }

    pub fn summary(&self) -> GroupSummary {
        GroupSummary {
            slug: self.slug.clone(),
            name: self.name.clone(),
            memo: self.memo.clone(),
        }
    }
}

/// Reservation rule for a group.
///
/// Every constraint is independently optional; `None` disables the check
/// rather than meaning zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupRule {
    pub reservation_open_days_before: Option<u32>,
    pub reservation_close_minutes_before: Option<u32>,
    pub max_simultaneous_reservations: Option<NonZeroU32>,
    pub max_weekly_hours: Option<f64>,
    /// Checked only when present and non-empty
    pub allowed_time_ranges: Option<Vec<TimeRange>>,
    pub restricted_weekdays: DaysOfWeek,
    pub requires_host_approval: bool,
}

impl GroupRule {
    /// Rule with every constraint disabled
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Validate and convert a raw rule
    pub fn from_raw(raw: RawGroupRule) -> Result<Self, RuleError> {
        let errors = validate_group_rule(&raw);
        if !errors.is_empty() {
            return Err(RuleError::Invalid { errors });
        }
        Ok(Self::convert(raw))
    }

    // Caller must have validated `raw`
    fn convert(raw: RawGroupRule) -> Self {
        Self {
            reservation_open_days_before: raw
                .reservation_open_days_before
                .and_then(|d| u32::try_from(d).ok()),
            reservation_close_minutes_before: raw
                .reservation_close_minutes_before
                .and_then(|m| u32::try_from(m).ok()),
            max_simultaneous_reservations: raw
                .max_simultaneous_reservations
                .and_then(|c| u32::try_from(c).ok())
                .and_then(NonZeroU32::new),
            max_weekly_hours: raw.max_weekly_hours,
            allowed_time_ranges: raw
                .allowed_time_ranges
                .map(|ranges| ranges.iter().filter_map(convert_time_range).collect()),
            restricted_weekdays: parse_days(&raw.restricted_weekdays).unwrap_or_default(),
            requires_host_approval: raw.requires_host_approval,
        }
    }
}

/// Allowed daily interval. Inverted ranges are kept as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: WallClock,
    pub end: WallClock,
}

impl TimeRange {
    pub fn new(start: WallClock, end: WallClock) -> Self {
        Self { start, end }
    }

    /// `start <= from && to <= end`, with no wraparound across midnight
    pub fn covers(&self, from: WallClock, to: WallClock) -> bool {
        self.start <= from && to <= self.end
    }
}

fn convert_time_range(raw: &RawTimeRange) -> Option<TimeRange> {
    Some(TimeRange {
        start: parse_time(&raw.start).ok()?,
        end: parse_time(&raw.end).ok()?,
    })
}
