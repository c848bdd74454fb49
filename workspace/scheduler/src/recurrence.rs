//! Recurrence calculator.
//!
//! Pure date arithmetic: no I/O, no clock. All inputs and outputs are calendar
//! days already normalized by [`crate::calendar::Calendar`].

use chrono::{Datelike, Days, Months, NaiveDate};
use model::recurrence::{DayOfMonth, Recurrence, RecurrencePattern};

/// Returns the number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

// Dates past chrono's range saturate; a rule that far out never becomes due.
fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Moves `date` to `day` within its own month, clamped to the month's length.
fn clamp_to_day(date: NaiveDate, day: Option<DayOfMonth>) -> NaiveDate {
    let Some(day) = day else {
        return date;
    };
    let day = (day.value() as u32).min(days_in_month(date.year(), date.month()));
    date.with_day(day).unwrap_or(date)
}

/// Advances one period from `anchor`.
///
/// Called after a real firing, so the advance is unconditional: a weekly rule
/// whose advanced date already falls on its weekday is not shifted further.
pub fn next_from(anchor: NaiveDate, pattern: &RecurrencePattern) -> NaiveDate {
    let interval = pattern.interval();

    match pattern.recurrence() {
        Recurrence::Daily => add_days(anchor, interval as u64),
        Recurrence::Weekly { day_of_week } => {
            let advanced = add_days(anchor, 7 * interval as u64);
            match day_of_week {
                Some(day) => add_days(advanced, day.days_from(advanced) as u64),
                None => advanced,
            }
        }
        Recurrence::Monthly { day_of_month } => {
            clamp_to_day(add_months(anchor, interval), day_of_month)
        }
        Recurrence::Yearly { day_of_month } => {
            clamp_to_day(add_months(anchor, interval.saturating_mul(12)), day_of_month)
        }
    }
}

/// First execution date for a newly created or re-parameterized rule.
///
/// A start date in the future is used as is. Otherwise the result is strictly
/// after `today`, so an edit never schedules into the past and never re-fires
/// the day it was made.
pub fn initial_next_from(
    start_date: NaiveDate,
    today: NaiveDate,
    pattern: &RecurrencePattern,
) -> NaiveDate {
    if start_date > today {
        return start_date;
    }

    match pattern.recurrence() {
        Recurrence::Weekly {
            day_of_week: Some(day),
        } => match day.days_from(today) {
            0 => add_days(today, 7 * pattern.interval() as u64),
            shift => add_days(today, shift as u64),
        },
        _ => next_from(today, pattern),
    }
}

/// Upcoming execution dates starting at `first`, stopping after `end_date` or
/// once `limit` dates have been collected.
pub fn occurrences_from(
    first: NaiveDate,
    end_date: Option<NaiveDate>,
    pattern: &RecurrencePattern,
    limit: usize,
) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(limit.min(64));
    let mut current = first;

    while dates.len() < limit {
        if end_date.is_some_and(|end| current > end) {
            break;
        }
        dates.push(current);

        let next = next_from(current, pattern);
        if next <= current {
            break;
        }
        current = next;
    }

    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
    }

    #[test]
    fn daily_advances_by_interval() {
        let pattern = RecurrencePattern::daily(3).unwrap();
        assert_eq!(next_from(date(2025, 2, 27), &pattern), date(2025, 3, 2));
    }

    #[test]
    fn weekly_without_anchor_advances_whole_weeks() {
        let pattern = RecurrencePattern::weekly(2, None).unwrap();
        assert_eq!(next_from(date(2025, 6, 4), &pattern), date(2025, 6, 18));
    }

    #[test]
    fn weekly_with_anchor_always_lands_on_that_weekday() {
        let monday = RecurrencePattern::weekly(1, Some(1)).unwrap();

        // Any anchor weekday, every result is a Monday within a week of anchor + 7.
        let mut anchor = date(2025, 6, 1);
        for _ in 0..14 {
            let next = next_from(anchor, &monday);
            assert_eq!(next.weekday(), Weekday::Mon, "anchor {}", anchor);
            let delta = (next - anchor).num_days();
            assert!((7..=13).contains(&delta), "anchor {} -> {}", anchor, next);
            anchor = anchor.succ_opt().unwrap();
        }

        // Already on the weekday after advancing: no extra shift.
        assert_eq!(next_from(date(2025, 6, 2), &monday), date(2025, 6, 9));
    }

    #[test]
    fn monthly_day_31_clamps_to_february() {
        let pattern = RecurrencePattern::monthly(1, Some(31)).unwrap();
        assert_eq!(next_from(date(2025, 1, 31), &pattern), date(2025, 2, 28));
        assert_eq!(next_from(date(2024, 1, 31), &pattern), date(2024, 2, 29));
        // The anchor day comes back once the month is long enough.
        assert_eq!(next_from(date(2025, 2, 28), &pattern), date(2025, 3, 31));
        assert_eq!(next_from(date(2025, 3, 31), &pattern), date(2025, 4, 30));
    }

    #[test]
    fn monthly_without_anchor_keeps_day_and_clamps() {
        let pattern = RecurrencePattern::monthly(1, None).unwrap();
        assert_eq!(next_from(date(2025, 1, 15), &pattern), date(2025, 2, 15));
        assert_eq!(next_from(date(2025, 1, 31), &pattern), date(2025, 2, 28));

        let quarterly = RecurrencePattern::monthly(3, None).unwrap();
        assert_eq!(next_from(date(2025, 11, 30), &quarterly), date(2026, 2, 28));
    }

    #[test]
    fn yearly_clamps_leap_day() {
        let pattern = RecurrencePattern::yearly(1, Some(29)).unwrap();
        assert_eq!(next_from(date(2024, 2, 29), &pattern), date(2025, 2, 28));

        let pattern = RecurrencePattern::yearly(4, Some(29)).unwrap();
        assert_eq!(next_from(date(2024, 2, 29), &pattern), date(2028, 2, 29));

        let plain = RecurrencePattern::yearly(1, None).unwrap();
        assert_eq!(next_from(date(2024, 2, 29), &plain), date(2025, 2, 28));
    }

    #[test]
    fn initial_placement_uses_future_start_date_verbatim() {
        let pattern = RecurrencePattern::monthly(1, Some(31)).unwrap();
        let start = date(2025, 3, 1);
        let today = date(2025, 2, 15);
        assert_eq!(initial_next_from(start, today, &pattern), start);

        // The second occurrence is where the day-of-month clamp first applies.
        assert_eq!(next_from(start, &pattern), date(2025, 4, 30));
    }

    #[test]
    fn initial_placement_weekly_other_day_moves_within_the_week() {
        // Sunday rule, every two weeks, created on Wednesday 2025-06-04.
        let pattern = RecurrencePattern::weekly(2, Some(0)).unwrap();
        let wednesday = date(2025, 6, 4);
        let first = initial_next_from(wednesday, wednesday, &pattern);
        assert_eq!(first, date(2025, 6, 8));
        assert_eq!(first.weekday(), Weekday::Sun);
    }

    #[test]
    fn initial_placement_weekly_same_day_skips_a_full_cycle() {
        let pattern = RecurrencePattern::weekly(2, Some(3)).unwrap();
        let wednesday = date(2025, 6, 4);
        assert_eq!(
            initial_next_from(date(2025, 5, 1), wednesday, &pattern),
            date(2025, 6, 18)
        );
    }

    #[test]
    fn initial_placement_past_start_is_strictly_after_today() {
        let today = date(2025, 1, 31);
        let start = date(2024, 6, 10);

        let daily = RecurrencePattern::daily(1).unwrap();
        assert_eq!(initial_next_from(start, today, &daily), date(2025, 2, 1));

        let weekly = RecurrencePattern::weekly(1, None).unwrap();
        assert_eq!(initial_next_from(start, today, &weekly), date(2025, 2, 7));

        let monthly = RecurrencePattern::monthly(1, Some(10)).unwrap();
        assert_eq!(initial_next_from(start, today, &monthly), date(2025, 2, 10));

        let yearly = RecurrencePattern::yearly(1, Some(31)).unwrap();
        assert_eq!(initial_next_from(start, today, &yearly), date(2026, 1, 31));

        // Start date equal to today counts as consumed.
        assert_eq!(initial_next_from(today, today, &daily), date(2025, 2, 1));
    }

    #[test]
    fn occurrences_stop_at_end_date_and_limit() {
        let pattern = RecurrencePattern::monthly(1, Some(31)).unwrap();
        let dates = occurrences_from(date(2025, 1, 31), Some(date(2025, 4, 30)), &pattern, 10);
        assert_eq!(
            dates,
            vec![
                date(2025, 1, 31),
                date(2025, 2, 28),
                date(2025, 3, 31),
                date(2025, 4, 30)
            ]
        );

        let daily = RecurrencePattern::daily(1).unwrap();
        assert_eq!(occurrences_from(date(2025, 1, 1), None, &daily, 3).len(), 3);
        assert!(occurrences_from(date(2025, 5, 1), Some(date(2025, 4, 30)), &daily, 3).is_empty());
    }
}
