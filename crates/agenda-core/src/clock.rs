//! Wall-clock source for creation stamps, the date window and the current
//! period flag.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the present instant.
pub trait Clock {
    /// Current wall time.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date (UTC).
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Real system clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a fixed instant, used for deterministic runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    frozen_at: DateTime<Utc>,
}

impl FixedClock {
    #[must_use]
    pub const fn new(frozen_at: DateTime<Utc>) -> Self {
        Self { frozen_at }
    }

    /// Freeze at midnight UTC on `date`.
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        Self::new(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    /// Move the frozen instant.
    pub const fn set(&mut self, frozen_at: DateTime<Utc>) {
        self.frozen_at = frozen_at;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.frozen_at
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
