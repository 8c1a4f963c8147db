//! Two-level grouping of activity records: year, then four-month period.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::model::ActivityRecord;
use crate::period::{BucketYear, Period, classify};

/// All records of one year, plus the same records split by period.
///
/// `periods` always holds the four keys of [`Period::ALL`]; empty periods are
/// left for callers to skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearBucket {
    pub year: BucketYear,
    pub records: Vec<ActivityRecord>,
    pub periods: BTreeMap<Period, Vec<ActivityRecord>>,
}

impl YearBucket {
    fn empty(year: BucketYear) -> Self {
        Self {
            year,
            records: Vec::new(),
            periods: Period::ALL.into_iter().map(|p| (p, Vec::new())).collect(),
        }
    }

    /// Records of `period`, empty when there are none.
    #[must_use]
    pub fn period(&self, period: Period) -> &[ActivityRecord] {
        self.periods
            .get(&period)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Periods that hold at least one record, in chronological order.
    pub fn non_empty_periods(&self) -> impl Iterator<Item = (Period, &[ActivityRecord])> {
        self.periods
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(period, records)| (*period, records.as_slice()))
    }
}

/// Group `records` by year and period.
///
/// Years come out most recent first with the undated bucket last. Inside a
/// year and inside each period, records are ordered by descending start date;
/// records sharing a start date keep their input order.
#[must_use]
pub fn group(records: &[ActivityRecord]) -> Vec<YearBucket> {
    let mut by_year: BTreeMap<BucketYear, YearBucket> = BTreeMap::new();

    for record in records {
        let (year, period) = classify(record.start_date);
        let bucket = by_year
            .entry(year)
            .or_insert_with(|| YearBucket::empty(year));
        bucket.records.push(record.clone());
        bucket.periods.entry(period).or_default().push(record.clone());
    }

    let mut buckets: Vec<YearBucket> = by_year.into_values().rev().collect();
    for bucket in &mut buckets {
        sort_recent_first(&mut bucket.records);
        for list in bucket.periods.values_mut() {
            sort_recent_first(list);
        }
    }

    debug!(
        records = records.len(),
        years = buckets.len(),
        "grouped activities"
    );
    buckets
}

/// Stable sort by descending start date.
fn sort_recent_first(records: &mut [ActivityRecord]) {
    records.sort_by(|a, b| b.start_date.cmp(&a.start_date));
}
