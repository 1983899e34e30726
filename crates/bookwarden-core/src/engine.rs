//! Reservation policy evaluation

use bookwarden_api::{ReasonCode, ReservationWindow, Verdict};
use bookwarden_config::GroupRule;
use bookwarden_util::WallClock;
use chrono::{DateTime, Datelike, FixedOffset, TimeDelta};
use tracing::debug;

/// Evaluate a candidate reservation against a group rule.
///
/// `current` and `weekly_hours_used` are caller-computed snapshots of the
/// requester's usage; the candidate is not part of either. `now` should be
/// expressed in the candidate's offset (comparisons are on absolute instants,
/// so any offset gives the same answer).
///
/// Every check runs, in a fixed order, and contributes at most one reason.
/// The verdict is allowed only when no reason was produced, which means a
/// rule with `requires_host_approval` never yields an allowed verdict.
pub fn evaluate(
    rule: &GroupRule,
    candidate: &ReservationWindow,
    current: &[ReservationWindow],
    weekly_hours_used: f64,
    now: DateTime<FixedOffset>,
) -> Verdict {
    let mut reasons = Vec::new();

    // Booking horizon
    if let Some(days) = rule.reservation_open_days_before {
        let max_start =
            TimeDelta::try_days(i64::from(days)).and_then(|d| now.checked_add_signed(d));
        // An unrepresentable horizon never blocks
        if max_start.is_some_and(|max_start| candidate.start > max_start) {
            reasons.push(ReasonCode::TooFarInFuture);
        }
    }

    // Minimum lead time
    if let Some(minutes) = rule.reservation_close_minutes_before {
        let min_start =
            TimeDelta::try_minutes(i64::from(minutes)).and_then(|d| now.checked_add_signed(d));
        // An unrepresentable lead time can never be met
        if min_start.is_none_or(|min_start| candidate.start < min_start) {
            reasons.push(ReasonCode::TooCloseToStart);
        }
    }

    // Concurrency cap: existing reservations only
    if let Some(cap) = rule.max_simultaneous_reservations
        && current.len() as u64 >= u64::from(cap.get())
    {
        reasons.push(ReasonCode::TooManyActiveReservations);
    }

    // Weekly hour cap
    if let Some(cap) = rule.max_weekly_hours
        && weekly_hours_used + candidate.duration_hours() > cap
    {
        reasons.push(ReasonCode::WeeklyHourLimitExceeded);
    }

    // Restricted weekdays, in the candidate's own offset
    if !rule.restricted_weekdays.is_empty()
        && rule.restricted_weekdays.contains(candidate.start.weekday())
    {
        reasons.push(ReasonCode::WeekdayNotAllowed);
    }

    // Allowed daily time ranges
    if let Some(ranges) = &rule.allowed_time_ranges
        && !ranges.is_empty()
    {
        let start = WallClock::of(&candidate.start);
        let end = WallClock::of(&candidate.end);
        if !ranges.iter().any(|range| range.covers(start, end)) {
            reasons.push(ReasonCode::OutsideAllowedTimeRanges);
        }
    }

    if rule.requires_host_approval {
        reasons.push(ReasonCode::HostApprovalRequired);
    }

    let verdict = Verdict::from_reasons(reasons);

    debug!(
        start = %candidate.start,
        end = %candidate.end,
        current_count = current.len(),
        weekly_hours_used,
        allowed = verdict.allowed,
        reasons = ?verdict.reasons,
        "Reservation evaluated"
    );

    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookwarden_config::TimeRange;
    use bookwarden_util::DaysOfWeek;
    use chrono::{Duration, TimeZone};
    use std::num::NonZeroU32;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    /// Tuesday 2025-06-10 12:00 +09:00
    fn now() -> DateTime<FixedOffset> {
        jst().with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    fn window(start: DateTime<FixedOffset>, hours: i64) -> ReservationWindow {
        ReservationWindow::new(start, start + Duration::hours(hours))
    }

    fn at(day: u32, h: u32, m: u32) -> DateTime<FixedOffset> {
        jst().with_ymd_and_hms(2025, 6, day, h, m, 0).unwrap()
    }

    fn clock(h: u32, m: u32) -> WallClock {
        WallClock::new(h, m, 0).unwrap()
    }

    fn run(rule: &GroupRule, candidate: &ReservationWindow) -> Verdict {
        evaluate(rule, candidate, &[], 0.0, now())
    }

    #[test]
    fn test_unrestricted_rule_allows_anything() {
        let rule = GroupRule::unrestricted();
        let candidates = [
            window(now() + Duration::days(400), 1),
            window(now() - Duration::days(3), 2),
            // inverted window
            ReservationWindow::new(at(10, 15, 0), at(10, 14, 0)),
        ];

        for candidate in &candidates {
            let existing = vec![window(now(), 1); 50];
            let verdict = evaluate(&rule, candidate, &existing, 1_000.0, now());
            assert!(verdict.allowed);
            assert!(verdict.reasons.is_empty());
        }
    }

    #[test]
    fn test_booking_horizon() {
        let rule = GroupRule {
            reservation_open_days_before: Some(7),
            ..Default::default()
        };

        let far = run(&rule, &window(now() + Duration::days(8), 1));
        assert_eq!(far.reasons, vec![ReasonCode::TooFarInFuture]);
        assert!(!far.allowed);

        let near = run(&rule, &window(now() + Duration::days(1), 1));
        assert!(near.allowed);

        // Exactly on the horizon is still allowed
        let edge = run(&rule, &window(now() + Duration::days(7), 1));
        assert!(edge.allowed);
    }

    #[test]
    fn test_minimum_lead_time() {
        let rule = GroupRule {
            reservation_close_minutes_before: Some(30),
            ..Default::default()
        };

        let soon = run(&rule, &window(now() + Duration::minutes(10), 1));
        assert_eq!(soon.reasons, vec![ReasonCode::TooCloseToStart]);

        let later = run(&rule, &window(now() + Duration::minutes(60), 1));
        assert!(later.allowed);

        let edge = run(&rule, &window(now() + Duration::minutes(30), 1));
        assert!(edge.allowed);

        let past = run(&rule, &window(now() - Duration::hours(1), 1));
        assert_eq!(past.reasons, vec![ReasonCode::TooCloseToStart]);
    }

    #[test]
    fn test_open_and_close_limits_together() {
        let rule = GroupRule {
            reservation_open_days_before: Some(7),
            reservation_close_minutes_before: Some(30),
            ..Default::default()
        };

        assert!(!run(&rule, &window(now() + Duration::days(8), 1)).allowed);
        assert!(run(&rule, &window(now() + Duration::days(1), 1)).allowed);
    }

    #[test]
    fn test_concurrency_cap_counts_existing_only() {
        let rule = GroupRule {
            max_simultaneous_reservations: NonZeroU32::new(2),
            ..Default::default()
        };
        let candidate = window(at(12, 10, 0), 1);
        let existing = [window(at(11, 10, 0), 1), window(at(11, 14, 0), 1)];

        let full = evaluate(&rule, &candidate, &existing, 0.0, now());
        assert_eq!(full.reasons, vec![ReasonCode::TooManyActiveReservations]);

        let one_left = evaluate(&rule, &candidate, &existing[..1], 0.0, now());
        assert!(one_left.allowed);

        let single = GroupRule {
            max_simultaneous_reservations: NonZeroU32::new(1),
            ..Default::default()
        };
        assert!(evaluate(&single, &candidate, &[], 0.0, now()).allowed);
    }

    #[test]
    fn test_weekly_hour_cap() {
        let rule = GroupRule {
            max_weekly_hours: Some(10.0),
            ..Default::default()
        };

        let two_hours = evaluate(&rule, &window(at(12, 10, 0), 2), &[], 9.0, now());
        assert_eq!(two_hours.reasons, vec![ReasonCode::WeeklyHourLimitExceeded]);

        // 9 + 1 = 10 is not over the cap
        let one_hour = evaluate(&rule, &window(at(12, 10, 0), 1), &[], 9.0, now());
        assert!(one_hour.allowed);

        let half_hour = ReservationWindow::new(at(12, 10, 0), at(12, 10, 30));
        assert!(!evaluate(&rule, &half_hour, &[], 9.75, now()).allowed);
    }

    #[test]
    fn test_negative_duration_lowers_weekly_total() {
        let rule = GroupRule {
            max_weekly_hours: Some(10.0),
            ..Default::default()
        };
        let inverted = ReservationWindow::new(at(12, 12, 0), at(12, 10, 0));

        let verdict = evaluate(&rule, &inverted, &[], 11.0, now());
        assert!(verdict.allowed);
    }

    #[test]
    fn test_zero_weekly_cap_is_enforced() {
        let rule = GroupRule {
            max_weekly_hours: Some(0.0),
            ..Default::default()
        };
        let verdict = run(&rule, &window(at(12, 10, 0), 1));
        assert_eq!(verdict.reasons, vec![ReasonCode::WeeklyHourLimitExceeded]);
    }

    #[test]
    fn test_restricted_weekdays() {
        let rule = GroupRule {
            restricted_weekdays: DaysOfWeek::from_indices([5, 6]).unwrap(),
            ..Default::default()
        };

        // 2025-06-14 is a Saturday
        let saturday = run(&rule, &window(at(14, 10, 0), 1));
        assert_eq!(saturday.reasons, vec![ReasonCode::WeekdayNotAllowed]);

        // 2025-06-17 is a Tuesday
        let tuesday = run(&rule, &window(at(17, 10, 0), 1));
        assert!(tuesday.allowed);
    }

    #[test]
    fn test_weekday_uses_candidate_offset() {
        let rule = GroupRule {
            restricted_weekdays: DaysOfWeek::WEEKENDS,
            ..Default::default()
        };

        // Saturday 01:00 in +09:00 is still Friday in UTC
        let start = at(14, 1, 0);
        assert_eq!(start.with_timezone(&chrono::Utc).weekday(), chrono::Weekday::Fri);

        let verdict = run(&rule, &window(start, 1));
        assert_eq!(verdict.reasons, vec![ReasonCode::WeekdayNotAllowed]);
    }

    #[test]
    fn test_allowed_time_ranges() {
        let rule = GroupRule {
            allowed_time_ranges: Some(vec![TimeRange::new(clock(9, 0), clock(12, 0))]),
            ..Default::default()
        };

        let inside = run(&rule, &ReservationWindow::new(at(12, 10, 0), at(12, 11, 0)));
        assert!(inside.allowed);

        let early = run(&rule, &ReservationWindow::new(at(12, 8, 0), at(12, 10, 0)));
        assert_eq!(early.reasons, vec![ReasonCode::OutsideAllowedTimeRanges]);

        let late = run(&rule, &ReservationWindow::new(at(12, 11, 0), at(12, 12, 30)));
        assert_eq!(late.reasons, vec![ReasonCode::OutsideAllowedTimeRanges]);
    }

    #[test]
    fn test_any_time_range_may_match() {
        let rule = GroupRule {
            allowed_time_ranges: Some(vec![
                TimeRange::new(clock(9, 0), clock(12, 0)),
                TimeRange::new(clock(13, 0), clock(17, 0)),
            ]),
            ..Default::default()
        };

        assert!(run(&rule, &ReservationWindow::new(at(12, 14, 0), at(12, 16, 0))).allowed);
        // Spanning the lunch gap fits neither range
        assert!(!run(&rule, &ReservationWindow::new(at(12, 11, 0), at(12, 14, 0))).allowed);
    }

    #[test]
    fn test_empty_time_ranges_disable_check() {
        let rule = GroupRule {
            allowed_time_ranges: Some(vec![]),
            ..Default::default()
        };
        assert!(run(&rule, &ReservationWindow::new(at(12, 2, 0), at(12, 4, 0))).allowed);
    }

    #[test]
    fn test_inverted_time_range_does_not_wrap() {
        let rule = GroupRule {
            allowed_time_ranges: Some(vec![TimeRange::new(clock(22, 0), clock(2, 0))]),
            ..Default::default()
        };

        let evening = run(&rule, &ReservationWindow::new(at(12, 23, 0), at(12, 23, 30)));
        assert_eq!(evening.reasons, vec![ReasonCode::OutsideAllowedTimeRanges]);

        // Start and end times of day are compared separately, so 23:00 >= 22:00
        // and 01:00 <= 02:00 both hold here
        let overnight = run(&rule, &ReservationWindow::new(at(12, 23, 0), at(13, 1, 0)));
        assert!(overnight.allowed);
        assert!(overnight.reasons.is_empty());
    }

    #[test]
    fn test_host_approval_alone_blocks() {
        let rule = GroupRule {
            requires_host_approval: true,
            ..Default::default()
        };

        let verdict = run(&rule, &window(at(12, 10, 0), 1));
        assert!(!verdict.allowed);
        assert_eq!(verdict.reasons, vec![ReasonCode::HostApprovalRequired]);
        assert_eq!(
            serde_json::to_value(&verdict.reasons).unwrap(),
            serde_json::json!(["host approval required"])
        );
    }

    #[test]
    fn test_reasons_follow_check_order() {
        let rule = GroupRule {
            reservation_open_days_before: Some(0),
            // thousands of years of lead time
            reservation_close_minutes_before: Some(u32::MAX),
            max_simultaneous_reservations: NonZeroU32::new(1),
            max_weekly_hours: Some(1.0),
            allowed_time_ranges: Some(vec![TimeRange::new(clock(9, 0), clock(10, 0))]),
            restricted_weekdays: DaysOfWeek::WEEKENDS,
            requires_host_approval: true,
        };

        // Saturday, a week out, 18:00-21:00
        let candidate = window(at(21, 18, 0), 3);
        let existing = [window(at(11, 10, 0), 1)];

        let verdict = evaluate(&rule, &candidate, &existing, 0.0, now());
        assert!(!verdict.allowed);
        assert_eq!(verdict.reasons, ReasonCode::ALL.to_vec());
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let rule = GroupRule {
            reservation_open_days_before: Some(3),
            max_weekly_hours: Some(4.0),
            restricted_weekdays: DaysOfWeek::WEEKENDS,
            requires_host_approval: true,
            ..Default::default()
        };
        let candidate = window(at(14, 9, 0), 5);
        let existing = [window(at(11, 10, 0), 1)];

        let first = evaluate(&rule, &candidate, &existing, 1.0, now());
        let second = evaluate(&rule, &candidate, &existing, 1.0, now());
        assert_eq!(first, second);
        assert_eq!(
            first.reasons,
            vec![
                ReasonCode::TooFarInFuture,
                ReasonCode::WeeklyHourLimitExceeded,
                ReasonCode::WeekdayNotAllowed,
                ReasonCode::HostApprovalRequired,
            ]
        );
    }

    #[test]
    fn test_now_offset_does_not_change_outcome() {
        let rule = GroupRule {
            reservation_open_days_before: Some(1),
            reservation_close_minutes_before: Some(30),
            ..Default::default()
        };
        let candidate = window(now() + Duration::hours(20), 1);
        let utc_now = now().with_timezone(&FixedOffset::east_opt(0).unwrap());

        assert_eq!(
            evaluate(&rule, &candidate, &[], 0.0, now()),
            evaluate(&rule, &candidate, &[], 0.0, utc_now)
        );
    }

    #[test]
    fn test_unrepresentable_horizon_never_blocks() {
        let rule = GroupRule {
            reservation_open_days_before: Some(u32::MAX),
            ..Default::default()
        };
        let verdict = run(&rule, &window(now() + Duration::days(365 * 1000), 1));
        assert!(verdict.allowed);
    }

    #[test]
    fn test_concurrent_evaluation() {
        let rule = std::sync::Arc::new(GroupRule {
            max_simultaneous_reservations: NonZeroU32::new(1),
            restricted_weekdays: DaysOfWeek::WEEKENDS,
            ..Default::default()
        });
        let candidate = window(at(14, 10, 0), 1);
        let expected = run(&rule, &candidate);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let rule = rule.clone();
                std::thread::spawn(move || evaluate(&rule, &candidate, &[], 0.0, now()))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
