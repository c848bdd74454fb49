//! Calendar normalization.
//!
//! Every schedule comparison in the engine happens on calendar days in one
//! canonical timezone. The timezone is a fixed UTC offset configured once for
//! the whole deployment; the process' local timezone is never consulted.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use tracing::warn;

use crate::error::ValidationError;

/// Canonical calendar used for midnight normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    /// UTC midnight, the default policy.
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// A calendar whose days start at midnight `minutes` east of UTC.
    ///
    /// Offsets outside ±24h are rejected by chrono; those fall back to UTC.
    pub fn with_offset_minutes(minutes: i32) -> Self {
        match minutes.checked_mul(60).and_then(FixedOffset::east_opt) {
            Some(offset) => Self { offset },
            None => {
                warn!(minutes, "Invalid calendar offset, falling back to UTC");
                Self::utc()
            }
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The calendar day `now` falls on.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// Start of the calendar day containing `date`, as an instant.
    pub fn midnight(&self, date: NaiveDate) -> DateTime<Utc> {
        // A fixed offset has no DST gaps, so local midnight always maps to one instant.
        self.offset
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .single()
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
    }

    /// Strips the time of day from `instant`.
    pub fn normalize_to_midnight(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        self.midnight(self.today(instant))
    }
}

/// Parses a date-only string (`YYYY-MM-DD`) as that calendar day.
pub fn parse_date_only(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}
