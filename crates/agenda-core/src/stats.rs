//! Counts, effectiveness ratios and per-creator / per-unit / per-type
//! summaries over explicit record sets.
//!
//! Nothing here is cached: every function recomputes from its input.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::config::ReportConfig;
use crate::model::{ActivityRecord, OrganizationalUnit, RoleKind, Status};

/// Records per status value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusCounts {
    #[must_use]
    pub fn of(records: &[ActivityRecord]) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.add(record.status);
        }
        counts
    }

    pub const fn add(&mut self, status: Status) {
        match status {
            Status::Pending => self.pending += 1,
            Status::InProgress => self.in_progress += 1,
            Status::Completed => self.completed += 1,
        }
    }

    #[must_use]
    pub const fn get(&self, status: Status) -> usize {
        match status {
            Status::Pending => self.pending,
            Status::InProgress => self.in_progress,
            Status::Completed => self.completed,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.pending + self.in_progress + self.completed
    }

    #[must_use]
    pub fn effectiveness(&self) -> u8 {
        effectiveness(self.completed, self.total())
    }
}

/// `round(completed / total * 100)`, rounding halves up; `0` for an empty set.
#[must_use]
pub fn effectiveness(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    let pct = (200 * completed + total) / (2 * total);
    u8::try_from(pct).unwrap_or(100)
}

/// Presentation band of an effectiveness percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Good,
    Warning,
    Poor,
}

impl Band {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Poor => "poor",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds (inclusive) of the good and warning bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    pub good: u8,
    pub warning: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::from(&ReportConfig::default())
    }
}

impl From<&ReportConfig> for Thresholds {
    fn from(config: &ReportConfig) -> Self {
        Self {
            good: config.good_threshold,
            warning: config.warning_threshold,
        }
    }
}

impl Thresholds {
    #[must_use]
    pub const fn band(&self, effectiveness: u8) -> Band {
        if effectiveness >= self.good {
            Band::Good
        } else if effectiveness >= self.warning {
            Band::Warning
        } else {
            Band::Poor
        }
    }
}

/// Number of distinct creators in `records`.
#[must_use]
pub fn distinct_creators(records: &[ActivityRecord]) -> usize {
    records
        .iter()
        .map(|r| r.created_by_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Number of distinct owning units in `records`.
#[must_use]
pub fn distinct_units(records: &[ActivityRecord]) -> usize {
    records
        .iter()
        .map(|r| r.unit_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// The record created last (by `created_at`, not start date). The earliest
/// such record in input order wins a tie.
#[must_use]
pub fn most_recent<'a, I>(records: I) -> Option<&'a ActivityRecord>
where
    I: IntoIterator<Item = &'a ActivityRecord>,
{
    records.into_iter().fold(None, |best, record| match best {
        Some(current) if record.created_at <= current.created_at => Some(current),
        _ => Some(record),
    })
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Optional narrowing applied to a flat record set before grouping.
///
/// `activity_type` is an opaque key compared after trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub status: Option<Status>,
    pub activity_type: Option<String>,
    pub created_by: Option<String>,
}

impl RecordFilter {
    #[must_use]
    pub fn matches(&self, record: &ActivityRecord) -> bool {
        self.status.is_none_or(|s| record.status == s)
            && self
                .activity_type
                .as_deref()
                .is_none_or(|t| record.activity_type.trim() == t.trim())
            && self
                .created_by
                .as_deref()
                .is_none_or(|id| record.created_by_id == id)
    }

    /// Keep the matching records, preserving order.
    #[must_use]
    pub fn apply(&self, records: Vec<ActivityRecord>) -> Vec<ActivityRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// One row of the per-creator table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatorSummary {
    pub created_by_id: String,
    pub created_by_name: String,
    pub created_by_role: RoleKind,
    pub unit_id: String,
    pub counts: StatusCounts,
    pub total: usize,
    pub effectiveness: u8,
    pub most_recent: Option<ActivityRecord>,
}

/// One row of the per-unit table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitSummary {
    pub unit_id: String,
    /// `None` when records reference a unit absent from the unit list.
    pub unit_name: Option<String>,
    pub counts: StatusCounts,
    pub total: usize,
    pub effectiveness: u8,
    pub distinct_creators: usize,
    pub most_recent: Option<ActivityRecord>,
}

/// Status breakdown for one activity type key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSummary {
    pub activity_type: String,
    pub counts: StatusCounts,
    pub total: usize,
    pub effectiveness: u8,
}

fn partition<'a, K, F>(records: &'a [ActivityRecord], key: F) -> BTreeMap<K, Vec<&'a ActivityRecord>>
where
    K: Ord,
    F: Fn(&'a ActivityRecord) -> K,
{
    let mut groups: BTreeMap<K, Vec<&ActivityRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().push(record);
    }
    groups
}

fn counts_of(records: &[&ActivityRecord]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for record in records {
        counts.add(record.status);
    }
    counts
}

/// Per-creator summaries, ordered by creator name then id.
///
/// Name, role and unit come from the creator's most recent record.
#[must_use]
pub fn summarize_by_creator(records: &[ActivityRecord]) -> Vec<CreatorSummary> {
    let mut rows: Vec<CreatorSummary> = partition(records, |r| r.created_by_id.as_str())
        .into_iter()
        .filter_map(|(id, group)| {
            let latest = most_recent(group.iter().copied())?;
            let counts = counts_of(&group);
            Some(CreatorSummary {
                created_by_id: id.to_string(),
                created_by_name: latest.created_by_name.clone(),
                created_by_role: latest.created_by_role,
                unit_id: latest.unit_id.clone(),
                counts,
                total: counts.total(),
                effectiveness: counts.effectiveness(),
                most_recent: Some(latest.clone()),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.created_by_name
            .cmp(&b.created_by_name)
            .then_with(|| a.created_by_id.cmp(&b.created_by_id))
    });
    rows
}

/// Per-unit summaries joined with `units`.
///
/// Every listed unit appears, in list order, even with zero records. Units
/// referenced by records but missing from the list follow, ordered by id.
#[must_use]
pub fn summarize_by_unit(
    units: &[OrganizationalUnit],
    records: &[ActivityRecord],
) -> Vec<UnitSummary> {
    let mut groups = partition(records, |r| r.unit_id.as_str());

    let row = |unit_id: &str, unit_name: Option<String>, group: &[&ActivityRecord]| {
        let counts = counts_of(group);
        let distinct = group
            .iter()
            .map(|r| r.created_by_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        UnitSummary {
            unit_id: unit_id.to_string(),
            unit_name,
            counts,
            total: counts.total(),
            effectiveness: counts.effectiveness(),
            distinct_creators: distinct,
            most_recent: most_recent(group.iter().copied()).cloned(),
        }
    };

    let mut rows: Vec<UnitSummary> = units
        .iter()
        .map(|unit| {
            let group = groups.remove(unit.id.as_str()).unwrap_or_default();
            row(&unit.id, Some(unit.name.clone()), &group)
        })
        .collect();

    rows.extend(
        groups
            .into_iter()
            .map(|(unit_id, group)| row(unit_id, None, &group)),
    );
    rows
}

/// Status breakdown per activity type, largest first, ties by type.
#[must_use]
pub fn summarize_by_type(records: &[ActivityRecord]) -> Vec<TypeSummary> {
    let mut rows: Vec<TypeSummary> = partition(records, |r| r.activity_type.trim())
        .into_iter()
        .map(|(activity_type, group)| {
            let counts = counts_of(&group);
            TypeSummary {
                activity_type: activity_type.to_string(),
                counts,
                total: counts.total(),
                effectiveness: counts.effectiveness(),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.activity_type.cmp(&b.activity_type))
    });
    rows
}
