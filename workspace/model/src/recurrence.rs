//! Closed recurrence types.
//!
//! The database stores a recurrence as a handful of loose columns
//! (`recurrence_type`, `recurrence_interval`, `day_of_month`, `day_of_week`).
//! Everything that computes dates works on [`RecurrencePattern`] instead, which
//! can only be built from a valid combination of those columns.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::entities::automatic_transaction::RecurrenceType;

/// Errors raised when a rule's parameters cannot describe a valid schedule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Recurrence interval must be at least 1, got {0}")]
    InvalidInterval(i64),

    #[error("Day of month must be between 1 and 31, got {0}")]
    DayOfMonthOutOfRange(i32),

    #[error("Day of week must be between 0 (Sunday) and 6 (Saturday), got {0}")]
    DayOfWeekOutOfRange(i32),

    #[error("Day of month is not applicable to {0:?} recurrences")]
    DayOfMonthNotApplicable(RecurrenceType),

    #[error("Day of week is not applicable to {0:?} recurrences")]
    DayOfWeekNotApplicable(RecurrenceType),

    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("End date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("Currency must be a three-letter ISO 4217 code, got '{0}'")]
    InvalidCurrency(String),
}

/// Day of the week with Sunday as day 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub fn new(value: i32) -> Result<Self, ValidationError> {
        if (0..=6).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::DayOfWeekOutOfRange(value))
        }
    }

    /// The weekday `date` falls on.
    pub fn of(date: NaiveDate) -> Self {
        Self(date.weekday().num_days_from_sunday() as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn weekday(self) -> Weekday {
        match self.0 {
            0 => Weekday::Sun,
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            _ => Weekday::Sat,
        }
    }

    /// Days to move forward from `from` to land on this weekday (0..=6).
    pub fn days_from(self, from: NaiveDate) -> i64 {
        let current = Self::of(from).0 as i64;
        (self.0 as i64 - current).rem_euclid(7)
    }
}

/// Day of the month, 1..=31. Months shorter than the value clamp to their last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayOfMonth(u8);

impl DayOfMonth {
    pub fn new(value: i32) -> Result<Self, ValidationError> {
        if (1..=31).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::DayOfMonthOutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// The base period of a rule together with the anchoring that applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    Daily,
    Weekly { day_of_week: Option<DayOfWeek> },
    Monthly { day_of_month: Option<DayOfMonth> },
    Yearly { day_of_month: Option<DayOfMonth> },
}

impl Recurrence {
    /// Builds a recurrence from the persisted column values.
    ///
    /// Anchors that do not apply to the recurrence type are rejected rather than
    /// ignored, so a stored rule never carries a value nobody consults.
    pub fn from_parts(
        kind: RecurrenceType,
        day_of_month: Option<i32>,
        day_of_week: Option<i32>,
    ) -> Result<Self, ValidationError> {
        let day_of_month = day_of_month.map(DayOfMonth::new).transpose()?;
        let day_of_week = day_of_week.map(DayOfWeek::new).transpose()?;

        match kind {
            RecurrenceType::Daily | RecurrenceType::Weekly if day_of_month.is_some() => {
                Err(ValidationError::DayOfMonthNotApplicable(kind))
            }
            RecurrenceType::Daily | RecurrenceType::Monthly | RecurrenceType::Yearly
                if day_of_week.is_some() =>
            {
                Err(ValidationError::DayOfWeekNotApplicable(kind))
            }
            RecurrenceType::Daily => Ok(Recurrence::Daily),
            RecurrenceType::Weekly => Ok(Recurrence::Weekly { day_of_week }),
            RecurrenceType::Monthly => Ok(Recurrence::Monthly { day_of_month }),
            RecurrenceType::Yearly => Ok(Recurrence::Yearly { day_of_month }),
        }
    }

    pub fn kind(&self) -> RecurrenceType {
        match self {
            Recurrence::Daily => RecurrenceType::Daily,
            Recurrence::Weekly { .. } => RecurrenceType::Weekly,
            Recurrence::Monthly { .. } => RecurrenceType::Monthly,
            Recurrence::Yearly { .. } => RecurrenceType::Yearly,
        }
    }

    pub fn day_of_month(&self) -> Option<DayOfMonth> {
        match self {
            Recurrence::Monthly { day_of_month } | Recurrence::Yearly { day_of_month } => {
                *day_of_month
            }
            _ => None,
        }
    }

    pub fn day_of_week(&self) -> Option<DayOfWeek> {
        match self {
            Recurrence::Weekly { day_of_week } => *day_of_week,
            _ => None,
        }
    }
}

/// A recurrence with its interval multiplier (interval 2 + weekly = biweekly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrencePattern {
    recurrence: Recurrence,
    interval: u32,
}

impl RecurrencePattern {
    pub fn new(recurrence: Recurrence, interval: i32) -> Result<Self, ValidationError> {
        if interval < 1 {
            return Err(ValidationError::InvalidInterval(interval as i64));
        }
        Ok(Self {
            recurrence,
            interval: interval as u32,
        })
    }

    pub fn daily(interval: i32) -> Result<Self, ValidationError> {
        Self::new(Recurrence::Daily, interval)
    }

    pub fn weekly(interval: i32, day_of_week: Option<i32>) -> Result<Self, ValidationError> {
        let day_of_week = day_of_week.map(DayOfWeek::new).transpose()?;
        Self::new(Recurrence::Weekly { day_of_week }, interval)
    }

    pub fn monthly(interval: i32, day_of_month: Option<i32>) -> Result<Self, ValidationError> {
        let day_of_month = day_of_month.map(DayOfMonth::new).transpose()?;
        Self::new(Recurrence::Monthly { day_of_month }, interval)
    }

    pub fn yearly(interval: i32, day_of_month: Option<i32>) -> Result<Self, ValidationError> {
        let day_of_month = day_of_month.map(DayOfMonth::new).transpose()?;
        Self::new(Recurrence::Yearly { day_of_month }, interval)
    }

    pub fn recurrence(&self) -> Recurrence {
        self.recurrence
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_of_week_counts_from_sunday() {
        // 2025-06-01 is a Sunday.
        let sunday = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(DayOfWeek::of(sunday).value(), 0);
        assert_eq!(DayOfWeek::new(1).unwrap().weekday(), Weekday::Mon);
        assert_eq!(DayOfWeek::new(1).unwrap().days_from(sunday), 1);
        assert_eq!(DayOfWeek::new(0).unwrap().days_from(sunday), 0);
        // From Wednesday back round to Sunday.
        let wednesday = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
        assert_eq!(DayOfWeek::new(0).unwrap().days_from(wednesday), 4);
    }

    #[test]
    fn rejects_out_of_range_anchors() {
        assert_eq!(DayOfWeek::new(7), Err(ValidationError::DayOfWeekOutOfRange(7)));
        assert_eq!(DayOfMonth::new(0), Err(ValidationError::DayOfMonthOutOfRange(0)));
        assert_eq!(DayOfMonth::new(32), Err(ValidationError::DayOfMonthOutOfRange(32)));
        assert_eq!(
            RecurrencePattern::daily(0),
            Err(ValidationError::InvalidInterval(0))
        );
    }

    #[test]
    fn rejects_anchor_for_wrong_recurrence_type() {
        assert_eq!(
            Recurrence::from_parts(RecurrenceType::Weekly, Some(15), None),
            Err(ValidationError::DayOfMonthNotApplicable(RecurrenceType::Weekly))
        );
        assert_eq!(
            Recurrence::from_parts(RecurrenceType::Monthly, None, Some(2)),
            Err(ValidationError::DayOfWeekNotApplicable(RecurrenceType::Monthly))
        );
        assert_eq!(
            Recurrence::from_parts(RecurrenceType::Yearly, Some(29), None)
                .unwrap()
                .day_of_month()
                .map(DayOfMonth::value),
            Some(29)
        );
    }
}
