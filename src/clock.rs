use std::cell::Cell;

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;

/// Source of "now" for the store, the classifier and the services.
pub trait Clock {
    fn now(&self) -> Timestamp;

    fn time_zone(&self) -> TimeZone;

    /// The calendar day `now` falls on in this clock's time zone
    fn today(&self) -> Day {
        Day::of(self.now(), self.time_zone())
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn time_zone(&self) -> TimeZone {
        (**self).time_zone()
    }
}

/// Wall clock in the system time zone
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn time_zone(&self) -> TimeZone {
        TimeZone::system()
    }
}

/// A clock that only moves when told to
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<Timestamp>,
    tz: TimeZone,
}

impl FixedClock {
    pub fn new(now: Timestamp, tz: TimeZone) -> Self {
        Self {
            now: Cell::new(now),
            tz,
        }
    }

    pub fn utc(now: Timestamp) -> Self {
        Self::new(now, TimeZone::UTC)
    }

    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }

    fn time_zone(&self) -> TimeZone {
        self.tz.clone()
    }
}

/// One calendar day in a given time zone.
///
/// Every "is this today?" question goes through [`Day::date_of`], so the
/// half-open interval `[start of today, start of tomorrow)` is applied with
/// the same truncation for every timestamp.
#[derive(Debug, Clone)]
pub struct Day {
    date: Date,
    tz: TimeZone,
}

impl Day {
    pub fn of(now: Timestamp, tz: TimeZone) -> Self {
        let date = now.to_zoned(tz.clone()).date();
        Self { date, tz }
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn time_zone(&self) -> &TimeZone {
        &self.tz
    }

    /// Truncates a timestamp to its calendar day in this day's time zone
    pub fn date_of(&self, timestamp: Timestamp) -> Date {
        timestamp.to_zoned(self.tz.clone()).date()
    }

    pub fn contains(&self, timestamp: Timestamp) -> bool {
        self.date_of(timestamp) == self.date
    }

    /// True when the timestamp falls on a day strictly before this one
    pub fn is_after(&self, timestamp: Timestamp) -> bool {
        self.date_of(timestamp) < self.date
    }
}
