//! The read-side view in one value: year/period buckets with statistics,
//! plus creator, unit and type tables.

use serde::Serialize;
use tracing::debug;

use crate::bucket::{YearBucket, group};
use crate::model::{ActivityRecord, OrganizationalUnit};
use crate::period::{BucketYear, Period};
use crate::stats::{
    self, Band, CreatorSummary, StatusCounts, Thresholds, TypeSummary, UnitSummary,
};

/// A summary row with its presentation band attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banded<T> {
    #[serde(flatten)]
    pub row: T,
    pub band: Band,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodReport {
    pub period: Period,
    pub label: &'static str,
    pub is_current: bool,
    pub counts: StatusCounts,
    pub total: usize,
    pub effectiveness: u8,
    pub band: Band,
    pub records: Vec<ActivityRecord>,
}

/// One year with its non-empty periods in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearReport {
    pub year: BucketYear,
    pub counts: StatusCounts,
    pub total: usize,
    pub effectiveness: u8,
    pub band: Band,
    pub periods: Vec<PeriodReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrentPeriod {
    pub year: i32,
    pub period: Period,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub current: CurrentPeriod,
    pub counts: StatusCounts,
    pub total: usize,
    pub effectiveness: u8,
    pub band: Band,
    pub distinct_creators: usize,
    pub distinct_units: usize,
    pub years: Vec<YearReport>,
    pub creators: Vec<Banded<CreatorSummary>>,
    pub units: Vec<Banded<UnitSummary>>,
    pub types: Vec<Banded<TypeSummary>>,
}

/// Build the full report for `records`.
///
/// `units` is the unit list joined into the per-unit table; pass only the
/// units the reader may see. `current` marks the period flagged as current.
#[must_use]
pub fn build_report(
    records: &[ActivityRecord],
    units: &[OrganizationalUnit],
    current: (i32, Period),
    thresholds: Thresholds,
) -> Report {
    let current = CurrentPeriod {
        year: current.0,
        period: current.1,
    };
    let counts = StatusCounts::of(records);
    let effectiveness = counts.effectiveness();

    let years = group(records)
        .iter()
        .map(|bucket| year_report(bucket, current, thresholds))
        .collect();

    let creators = stats::summarize_by_creator(records)
        .into_iter()
        .map(|row| Banded {
            band: thresholds.band(row.effectiveness),
            row,
        })
        .collect();
    let units = stats::summarize_by_unit(units, records)
        .into_iter()
        .map(|row| Banded {
            band: thresholds.band(row.effectiveness),
            row,
        })
        .collect();
    let types = stats::summarize_by_type(records)
        .into_iter()
        .map(|row| Banded {
            band: thresholds.band(row.effectiveness),
            row,
        })
        .collect();

    debug!(records = records.len(), effectiveness, "built report");

    Report {
        current,
        counts,
        total: counts.total(),
        effectiveness,
        band: thresholds.band(effectiveness),
        distinct_creators: stats::distinct_creators(records),
        distinct_units: stats::distinct_units(records),
        years,
        creators,
        units,
        types,
    }
}

fn year_report(bucket: &YearBucket, current: CurrentPeriod, thresholds: Thresholds) -> YearReport {
    let counts = StatusCounts::of(&bucket.records);
    let periods = bucket
        .non_empty_periods()
        .map(|(period, records)| {
            let counts = StatusCounts::of(records);
            PeriodReport {
                period,
                label: period.label(),
                is_current: bucket.year == BucketYear::Year(current.year)
                    && period == current.period,
                counts,
                total: counts.total(),
                effectiveness: counts.effectiveness(),
                band: thresholds.band(counts.effectiveness()),
                records: records.to_vec(),
            }
        })
        .collect();

    YearReport {
        year: bucket.year,
        counts,
        total: counts.total(),
        effectiveness: counts.effectiveness(),
        band: thresholds.band(counts.effectiveness()),
        periods,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RoleKind, Status};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn rec(id: &str, date: Option<(i32, u32, u32)>, status: Status) -> ActivityRecord {
        ActivityRecord {
            id: id.into(),
            title: id.into(),
            activity_type: "event".into(),
            description: None,
            start_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            end_date: None,
            unit_id: "u1".into(),
            created_by_id: "s1".into(),
            created_by_name: "Sol".into(),
            created_by_role: RoleKind::Staff,
            status,
            images: vec![],
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_periods_are_skipped_and_current_is_flagged() {
        let records = vec![
            rec("a", Some((2024, 2, 10)), Status::Pending),
            rec("b", Some((2024, 6, 1)), Status::Pending),
            rec("c", Some((2024, 6, 15)), Status::Completed),
        ];
        let report = build_report(&records, &[], (2024, Period::MayAug), Thresholds::default());

        assert_eq!(report.years.len(), 1);
        let periods = &report.years[0].periods;
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].period, Period::JanApr);
        assert!(!periods[0].is_current);
        assert_eq!(periods[1].period, Period::MayAug);
        assert!(periods[1].is_current);
        assert_eq!(periods[1].effectiveness, 50);
        assert_eq!(periods[1].band, Band::Warning);
        assert_eq!(report.effectiveness, 33);
        assert_eq!(report.band, Band::Poor);
    }

    #[test]
    fn undated_records_are_never_current() {
        let records = vec![rec("a", None, Status::Completed)];
        let report = build_report(&records, &[], (2024, Period::JanApr), Thresholds::default());
        assert_eq!(report.years[0].year, BucketYear::NoYear);
        assert_eq!(report.years[0].periods[0].period, Period::NoDate);
        assert!(!report.years[0].periods[0].is_current);
    }

    #[test]
    fn empty_report_is_zeroed() {
        let report = build_report(&[], &[], (2024, Period::SepDec), Thresholds::default());
        assert_eq!(report.total, 0);
        assert_eq!(report.effectiveness, 0);
        assert!(report.years.is_empty());
        assert!(report.creators.is_empty());
    }

    #[test]
    fn banded_rows_serialize_flat() {
        let records = vec![rec("a", Some((2024, 9, 1)), Status::Completed)];
        let report = build_report(&records, &[], (2024, Period::SepDec), Thresholds::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["creators"][0]["created_by_id"], "s1");
        assert_eq!(json["creators"][0]["band"], "good");
        assert_eq!(json["years"][0]["year"], 2024);
        assert_eq!(json["years"][0]["periods"][0]["period"], "sep_dec");
    }
}
