//! Calendar classification into four-month academic periods, and the
//! creation-time start date window.
//!
//! Month boundaries:
//!
//! ```text
//! 1..=4   -> JanApr
//! 5..=8   -> MayAug
//! 9..=12  -> SepDec
//! (none)  -> NoDate, under the NoYear sentinel
//! ```

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::Clock;

/// One of the three four-month periods, plus the sentinel for undated records.
///
/// Declaration order is the fixed chronological emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    JanApr,
    MayAug,
    SepDec,
    NoDate,
}

impl Period {
    /// Every period in emission order.
    pub const ALL: [Self; 4] = [Self::JanApr, Self::MayAug, Self::SepDec, Self::NoDate];

    /// Period containing calendar month `month` (1-based).
    #[must_use]
    pub const fn from_month(month: u32) -> Self {
        match month {
            1..=4 => Self::JanApr,
            5..=8 => Self::MayAug,
            9..=12 => Self::SepDec,
            _ => Self::NoDate,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JanApr => "jan_apr",
            Self::MayAug => "may_aug",
            Self::SepDec => "sep_dec",
            Self::NoDate => "no_date",
        }
    }

    /// Human label used by presentation layers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::JanApr => "January - April",
            Self::MayAug => "May - August",
            Self::SepDec => "September - December",
            Self::NoDate => "No date",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Year key of a bucket. `NoYear` collects records without a start date.
///
/// `NoYear` orders below every numeric year, so sorting in descending order
/// yields most recent year first and the sentinel last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BucketYear {
    NoYear,
    Year(i32),
}

impl fmt::Display for BucketYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::NoYear => f.write_str("no year"),
        }
    }
}

/// Year and period of a concrete date.
#[must_use]
pub fn period_of(date: NaiveDate) -> (i32, Period) {
    (date.year(), Period::from_month(date.month()))
}

/// Bucket key for an optional start date.
#[must_use]
pub fn classify(date: Option<NaiveDate>) -> (BucketYear, Period) {
    date.map_or((BucketYear::NoYear, Period::NoDate), |date| {
        let (year, period) = period_of(date);
        (BucketYear::Year(year), period)
    })
}

/// The period containing the clock's current date.
pub fn current_period(clock: &impl Clock) -> (i32, Period) {
    period_of(clock.today())
}

/// Inclusive range of start dates accepted at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

impl DateWindow {
    /// `[today - grace_days, today + horizon_days]`, saturating at the
    /// calendar limits.
    #[must_use]
    pub fn around(today: NaiveDate, grace_days: u32, horizon_days: u32) -> Self {
        let earliest = today
            .checked_sub_days(Days::new(u64::from(grace_days)))
            .unwrap_or(NaiveDate::MIN);
        let latest = today
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .unwrap_or(NaiveDate::MAX);
        Self { earliest, latest }
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.earliest..=self.latest).contains(&date)
    }
}
