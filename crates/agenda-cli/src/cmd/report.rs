//! `agenda report`: year/period buckets with effectiveness, plus per-creator,
//! per-unit and per-type summaries.

use std::io::{self, Write};
use std::path::Path;

use agenda_core::report::{PeriodReport, Report, YearReport};
use agenda_core::stats::{Band, StatusCounts};
use clap::Args;

use super::list::FilterArgs;
use super::{ActorFlags, open_service, resolve_actor};
use crate::output::{OutputMode, fail, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Restrict the report to one unit.
    #[arg(long)]
    pub unit: Option<String>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

fn counts_line(counts: &StatusCounts) -> String {
    format!(
        "{} pending, {} in progress, {} completed",
        counts.pending, counts.in_progress, counts.completed
    )
}

fn score(effectiveness: u8, band: Band) -> String {
    format!("{effectiveness}% ({band})")
}

fn write_period(w: &mut dyn Write, period: &PeriodReport) -> io::Result<()> {
    let marker = if period.is_current { " [current]" } else { "" };
    writeln!(
        w,
        "  {}{marker}: {} activities, {}",
        period.label,
        period.total,
        score(period.effectiveness, period.band)
    )?;
    for record in &period.records {
        writeln!(w, "    {:<12} {}  {}", record.status, record.id, record.title)?;
    }
    Ok(())
}

fn write_year(w: &mut dyn Write, year: &YearReport) -> io::Result<()> {
    writeln!(
        w,
        "{}: {} activities, {}",
        year.year,
        year.total,
        score(year.effectiveness, year.band)
    )?;
    for period in &year.periods {
        write_period(w, period)?;
    }
    Ok(())
}

fn write_pretty(w: &mut dyn Write, report: &Report) -> io::Result<()> {
    pretty_section(w, "Overview")?;
    pretty_kv(
        w,
        "Current",
        format!("{} {}", report.current.year, report.current.period.label()),
    )?;
    pretty_kv(w, "Activities", report.total.to_string())?;
    pretty_kv(w, "Status", counts_line(&report.counts))?;
    pretty_kv(w, "Effectiveness", score(report.effectiveness, report.band))?;
    pretty_kv(w, "Creators", report.distinct_creators.to_string())?;
    pretty_kv(w, "Units", report.distinct_units.to_string())?;

    writeln!(w)?;
    pretty_section(w, "By period")?;
    if report.years.is_empty() {
        writeln!(w, "No activities.")?;
    }
    for year in &report.years {
        write_year(w, year)?;
    }

    if !report.units.is_empty() {
        writeln!(w)?;
        pretty_section(w, "By unit")?;
        for unit in &report.units {
            let name = unit.row.unit_name.as_deref().unwrap_or(&unit.row.unit_id);
            writeln!(
                w,
                "{name:<24} {:>4}  {}  {} creators",
                unit.row.total,
                score(unit.row.effectiveness, unit.band),
                unit.row.distinct_creators
            )?;
        }
    }

    if !report.creators.is_empty() {
        writeln!(w)?;
        pretty_section(w, "By creator")?;
        for creator in &report.creators {
            writeln!(
                w,
                "{:<24} {:>4}  {}",
                creator.row.created_by_name,
                creator.row.total,
                score(creator.row.effectiveness, creator.band)
            )?;
        }
    }

    if !report.types.is_empty() {
        writeln!(w)?;
        pretty_section(w, "By type")?;
        for kind in &report.types {
            writeln!(
                w,
                "{:<24} {:>4}  {}",
                kind.row.activity_type,
                kind.row.total,
                score(kind.row.effectiveness, kind.band)
            )?;
        }
    }
    Ok(())
}

/// One tab-separated line per year and per period.
fn write_text(w: &mut dyn Write, report: &Report) -> io::Result<()> {
    writeln!(
        w,
        "total\t{}\t{}\t{}",
        report.total, report.effectiveness, report.band
    )?;
    for year in &report.years {
        writeln!(
            w,
            "{}\t-\t{}\t{}\t{}",
            year.year, year.total, year.effectiveness, year.band
        )?;
        for period in &year.periods {
            writeln!(
                w,
                "{}\t{}\t{}\t{}\t{}",
                year.year, period.period, period.total, period.effectiveness, period.band
            )?;
        }
    }
    Ok(())
}

/// Execute `agenda report`.
///
/// # Errors
///
/// Returns an error if identity is missing, the unit is outside the actor's
/// scope, or storage fails.
pub fn run_report(
    args: &ReportArgs,
    flags: ActorFlags<'_>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let actor = resolve_actor(flags, output)?;
    let service = open_service(project_root, output)?;
    let report = service
        .report(&actor, args.unit.as_deref(), &args.filter.to_filter())
        .map_err(|e| fail(output, &e))?;

    render_mode(
        output,
        &report,
        |r, w| write_text(w, r),
        |r, w| write_pretty(w, r),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_core::model::{ActivityRecord, OrganizationalUnit, RoleKind, Status};
    use agenda_core::period::Period;
    use agenda_core::report::build_report;
    use agenda_core::stats::Thresholds;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn record(id: &str, start: (i32, u32, u32), status: Status) -> ActivityRecord {
        ActivityRecord {
            id: id.into(),
            title: format!("Activity {id}"),
            activity_type: "event".into(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2),
            end_date: None,
            unit_id: "u1".into(),
            created_by_id: "ana".into(),
            created_by_name: "Ana".into(),
            created_by_role: RoleKind::Staff,
            status,
            images: vec![],
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn sample() -> Report {
        let units = [OrganizationalUnit {
            id: "u1".into(),
            name: "Culture".into(),
            created_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        }];
        let records = [
            record("a", (2024, 6, 1), Status::Pending),
            record("b", (2024, 6, 15), Status::Completed),
            record("c", (2024, 2, 10), Status::Pending),
        ];
        build_report(
            &records,
            &units,
            (2024, Period::MayAug),
            Thresholds::default(),
        )
    }

    #[test]
    fn text_report_has_year_and_period_lines() {
        let mut buf = Vec::new();
        write_text(&mut buf, &sample()).unwrap();
        let s = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines[0], "total\t3\t33\tpoor");
        assert_eq!(lines[1], "2024\t-\t3\t33\tpoor");
        assert_eq!(lines[2], "2024\tjan_apr\t1\t0\tpoor");
        assert_eq!(lines[3], "2024\tmay_aug\t2\t50\twarning");
    }

    #[test]
    fn pretty_report_marks_current_period() {
        let mut buf = Vec::new();
        write_pretty(&mut buf, &sample()).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.contains("May - August [current]: 2 activities, 50% (warning)"));
        assert!(s.contains("Culture"));
        assert!(s.contains("By creator"));
    }
}
