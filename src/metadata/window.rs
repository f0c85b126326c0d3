//! Date-range resolution
//!
//! Turns a symbolic [`DateRange`] into an inclusive `[start, end]` pair of
//! calendar dates. `end` is always the calendar date of `now` in whatever
//! timezone `now` carries, so callers pass a clock reading already shifted
//! into the farm's configured zone.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::DateRange;

/// Inclusive window of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Number of calendar days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Resolve `range` relative to `now`
pub fn resolve<Tz: TimeZone>(range: DateRange, now: &DateTime<Tz>) -> DateWindow {
    resolve_date(range, now.date_naive())
}

/// Resolve `range` relative to an already-localized calendar date
pub fn resolve_date(range: DateRange, today: NaiveDate) -> DateWindow {
    let start = match range {
        DateRange::Last7Days => today.checked_sub_days(Days::new(6)),
        DateRange::Last30Days => today.checked_sub_days(Days::new(29)),
        DateRange::ThisMonth => today.with_day(1),
    }
    // Only reachable at the very start of chrono's calendar
    .unwrap_or(today);

    DateWindow { start, end: today }
}
