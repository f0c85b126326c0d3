//! "Now" provider for date-range resolution and generation stamps

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;

/// Source of the current instant in the farm's timezone
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Calendar date of `now()`
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Timezone of the farm: a tz database zone or a fixed UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarmTimezone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl FarmTimezone {
    /// `instant` expressed in this zone; named zones follow their DST rules
    pub fn at(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            FarmTimezone::Named(tz) => instant.with_timezone(tz).fixed_offset(),
            FarmTimezone::Fixed(offset) => instant.with_timezone(offset),
        }
    }
}

impl From<Tz> for FarmTimezone {
    fn from(tz: Tz) -> Self {
        FarmTimezone::Named(tz)
    }
}

impl From<FixedOffset> for FarmTimezone {
    fn from(offset: FixedOffset) -> Self {
        FarmTimezone::Fixed(offset)
    }
}

/// Wall clock shifted into the farm's timezone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    zone: FarmTimezone,
}

impl SystemClock {
    pub fn new(zone: impl Into<FarmTimezone>) -> Self {
        Self { zone: zone.into() }
    }

    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.zone.at(Utc::now())
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
