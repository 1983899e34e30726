//! Configuration and rule validation

use crate::schema::{RawConfig, RawDay, RawDays, RawGroup, RawGroupRule, RawTimeRange};
use bookwarden_util::{DaysOfWeek, WallClock};
use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("Invalid time format '{value}': {message}")]
    InvalidTimeFormat { value: String, message: String },

    #[error("Invalid day specification: {0}")]
    InvalidDaySpec(String),

    #[error("Group '{slug}': {message}")]
    GroupError { slug: String, message: String },

    #[error("Duplicate group slug: {0}")]
    DuplicateGroupSlug(String),

    #[error("Global config error: {0}")]
    GlobalError(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(bind) = &config.server.bind
        && bind.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::GlobalError(format!(
            "server.bind '{}' is not a socket address",
            bind
        )));
    }

    // Check for duplicate slugs
    let mut seen = HashSet::new();
    for group in &config.groups {
        if !seen.insert(&group.slug) {
            errors.push(ValidationError::DuplicateGroupSlug(group.slug.clone()));
        }
    }

    for group in &config.groups {
        errors.extend(validate_group(group));
    }

    errors
}

fn validate_group(group: &RawGroup) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if group.slug.is_empty() {
        errors.push(ValidationError::GroupError {
            slug: group.slug.clone(),
            message: "slug cannot be empty".into(),
        });
    } else if !group
        .slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        errors.push(ValidationError::GroupError {
            slug: group.slug.clone(),
            message: "slug may only contain ASCII letters, digits, '-' and '_'".into(),
        });
    }

    if group.name.trim().is_empty() {
        errors.push(ValidationError::GroupError {
            slug: group.slug.clone(),
            message: "name cannot be empty".into(),
        });
    }

    errors.extend(
        validate_group_rule(&group.rule)
            .into_iter()
            .map(|e| ValidationError::GroupError {
                slug: group.slug.clone(),
                message: e.to_string(),
            }),
    );

    errors
}

/// Validate a raw reservation rule, collecting every problem
pub fn validate_group_rule(rule: &RawGroupRule) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(days) = rule.reservation_open_days_before
        && let Err(message) = check_u32_at_least(days, 0)
    {
        errors.push(ValidationError::InvalidField {
            field: "reservation_open_days_before",
            message,
        });
    }

    if let Some(minutes) = rule.reservation_close_minutes_before
        && let Err(message) = check_u32_at_least(minutes, 0)
    {
        errors.push(ValidationError::InvalidField {
            field: "reservation_close_minutes_before",
            message,
        });
    }

    if let Some(cap) = rule.max_simultaneous_reservations
        && let Err(message) = check_u32_at_least(cap, 1)
    {
        errors.push(ValidationError::InvalidField {
            field: "max_simultaneous_reservations",
            message,
        });
    }

    if let Some(hours) = rule.max_weekly_hours {
        if !hours.is_finite() {
            errors.push(ValidationError::InvalidField {
                field: "max_weekly_hours",
                message: "must be a finite number".into(),
            });
        } else if hours < 0.0 {
            errors.push(ValidationError::InvalidField {
                field: "max_weekly_hours",
                message: "must be >= 0".into(),
            });
        }
    }

    if let Some(ranges) = &rule.allowed_time_ranges {
        for range in ranges {
            errors.extend(validate_time_range(range));
        }
    }

    if let Err(e) = parse_days(&rule.restricted_weekdays) {
        errors.push(ValidationError::InvalidDaySpec(e));
    }

    errors
}

fn check_u32_at_least(value: i64, min: i64) -> Result<u32, String> {
    if value < min {
        return Err(format!("must be >= {}", min));
    }
    u32::try_from(value).map_err(|_| format!("must be <= {}", u32::MAX))
}

fn validate_time_range(range: &RawTimeRange) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Err(e) = parse_time(&range.start) {
        errors.push(ValidationError::InvalidTimeFormat {
            value: range.start.clone(),
            message: e,
        });
    }

    if let Err(e) = parse_time(&range.end) {
        errors.push(ValidationError::InvalidTimeFormat {
            value: range.end.clone(),
            message: e,
        });
    }

    errors
}

/// Parse HH:MM or HH:MM:SS time format
pub fn parse_time(s: &str) -> Result<WallClock, String> {
    WallClock::parse(s)
}

/// Parse days specification
pub fn parse_days(days: &RawDays) -> Result<DaysOfWeek, String> {
    match days {
        RawDays::Preset(preset) => match preset.to_lowercase().as_str() {
            "all" | "every" | "daily" => Ok(DaysOfWeek::ALL_DAYS),
            "weekdays" => Ok(DaysOfWeek::WEEKDAYS),
            "weekends" => Ok(DaysOfWeek::WEEKENDS),
            "none" => Ok(DaysOfWeek::NONE),
            other => Err(format!("Unknown day preset: {}", other)),
        },
        RawDays::List(list) => {
            let mut indices = Vec::with_capacity(list.len());
            for day in list {
                indices.push(parse_day(day)?);
            }
            DaysOfWeek::from_indices(indices)
                .map_err(|bad| format!("Weekday index {} out of range 0-6", bad))
        }
    }
}

fn parse_day(day: &RawDay) -> Result<u8, String> {
    match day {
        RawDay::Index(index) => u8::try_from(*index)
            .ok()
            .filter(|i| *i <= 6)
            .ok_or_else(|| format!("Weekday index {} out of range 0-6", index)),
        RawDay::Name(name) => match name.to_lowercase().as_str() {
            "mon" | "monday" => Ok(0),
            "tue" | "tuesday" => Ok(1),
            "wed" | "wednesday" => Ok(2),
            "thu" | "thursday" => Ok(3),
            "fri" | "friday" => Ok(4),
            "sat" | "saturday" => Ok(5),
            "sun" | "sunday" => Ok(6),
            other => Err(format!("Unknown day: {}", other)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(slug: &str, rule: RawGroupRule) -> RawGroup {
        RawGroup {
            slug: slug.into(),
            name: format!("Group {}", slug),
            memo: None,
            rule,
        }
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("14:30").unwrap(), WallClock::new(14, 30, 0).unwrap());
        assert_eq!(parse_time("00:00").unwrap(), WallClock::new(0, 0, 0).unwrap());
        assert_eq!(parse_time("23:59:59").unwrap(), WallClock::new(23, 59, 59).unwrap());

        assert!(parse_time("24:00").is_err());
        assert!(parse_time("12:60").is_err());
        assert!(parse_time("invalid").is_err());
    }

    #[test]
    fn test_parse_days() {
        assert_eq!(
            parse_days(&RawDays::Preset("weekdays".into())).unwrap(),
            DaysOfWeek::WEEKDAYS
        );
        assert_eq!(
            parse_days(&RawDays::Preset("Weekends".into())).unwrap(),
            DaysOfWeek::WEEKENDS
        );
        assert!(parse_days(&RawDays::Preset("someday".into())).is_err());

        let mixed = RawDays::List(vec![
            RawDay::Name("mon".into()),
            RawDay::Index(2),
            RawDay::Name("Friday".into()),
        ]);
        assert_eq!(parse_days(&mixed).unwrap().indices(), vec![0, 2, 4]);

        assert!(parse_days(&RawDays::List(vec![RawDay::Index(7)])).is_err());
        assert!(parse_days(&RawDays::List(vec![RawDay::Index(-1)])).is_err());
        assert!(parse_days(&RawDays::List(vec![])).unwrap().is_empty());
    }

    #[test]
    fn test_valid_rule_has_no_errors() {
        let rule = RawGroupRule {
            reservation_open_days_before: Some(0),
            reservation_close_minutes_before: Some(0),
            max_simultaneous_reservations: Some(1),
            max_weekly_hours: Some(0.0),
            allowed_time_ranges: Some(vec![RawTimeRange {
                start: "22:00".into(),
                end: "02:00".into(),
            }]),
            restricted_weekdays: RawDays::List(vec![RawDay::Index(0), RawDay::Index(6)]),
            requires_host_approval: true,
        };
        assert!(validate_group_rule(&rule).is_empty());
    }

    #[test]
    fn test_rule_errors_are_collected() {
        let rule = RawGroupRule {
            reservation_open_days_before: Some(-1),
            reservation_close_minutes_before: Some(i64::from(u32::MAX) + 1),
            max_simultaneous_reservations: Some(0),
            max_weekly_hours: Some(-2.5),
            allowed_time_ranges: Some(vec![RawTimeRange {
                start: "9am".into(),
                end: "25:00".into(),
            }]),
            restricted_weekdays: RawDays::List(vec![RawDay::Index(9)]),
            requires_host_approval: false,
        };

        let errors = validate_group_rule(&rule);
        assert_eq!(errors.len(), 7);
        assert_eq!(
            errors[0],
            ValidationError::InvalidField {
                field: "reservation_open_days_before",
                message: "must be >= 0".into(),
            }
        );
        assert!(matches!(
            &errors[2],
            ValidationError::InvalidField { field: "max_simultaneous_reservations", .. }
        ));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidDaySpec(_))));
    }

    #[test]
    fn test_non_finite_weekly_hours() {
        let rule = RawGroupRule {
            max_weekly_hours: Some(f64::INFINITY),
            ..Default::default()
        };
        assert_eq!(validate_group_rule(&rule).len(), 1);
    }

    #[test]
    fn test_duplicate_slug_detection() {
        let config = RawConfig {
            config_version: 1,
            server: Default::default(),
            groups: vec![
                group("lab", RawGroupRule::default()),
                group("lab", RawGroupRule::default()),
            ],
        };

        let errors = validate_config(&config);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::DuplicateGroupSlug(s) if s == "lab")));
    }

    #[test]
    fn test_group_rule_errors_name_the_group() {
        let config = RawConfig {
            config_version: 1,
            server: Default::default(),
            groups: vec![group(
                "lab-b",
                RawGroupRule {
                    max_simultaneous_reservations: Some(0),
                    ..Default::default()
                },
            )],
        };

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "Group 'lab-b': max_simultaneous_reservations: must be >= 1"
        );
    }

    #[test]
    fn test_bad_slug_and_bind() {
        let mut config = RawConfig {
            config_version: 1,
            server: Default::default(),
            groups: vec![group("lab a", RawGroupRule::default())],
        };
        config.server.bind = Some("localhost".into());

        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::GlobalError(_))));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::GroupError { .. })));
    }
}
