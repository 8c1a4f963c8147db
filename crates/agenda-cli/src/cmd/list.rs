use std::path::Path;

use agenda_core::Status;
use agenda_core::stats::RecordFilter;
use clap::Args;

use super::{ActivityRow, ActorFlags, open_service, resolve_actor};
use crate::output::{OutputMode, fail, render_list};

/// Record filters shared by `list` and `report`.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Only activities in this status.
    #[arg(long)]
    pub status: Option<Status>,

    /// Only activities of this type.
    #[arg(long = "type")]
    pub activity_type: Option<String>,

    /// Only activities created by this actor ID.
    #[arg(long)]
    pub creator: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> RecordFilter {
        RecordFilter {
            status: self.status,
            activity_type: self.activity_type.clone(),
            created_by: self.creator.clone(),
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Unit ID to list. Defaults to everything the actor may see.
    #[arg(long)]
    pub unit: Option<String>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

/// Execute `agenda list`.
///
/// # Errors
///
/// Returns an error if identity is missing, the unit is outside the actor's
/// scope, or storage fails.
pub fn run_list(
    args: &ListArgs,
    flags: ActorFlags<'_>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let actor = resolve_actor(flags, output)?;
    let service = open_service(project_root, output)?;

    let records = match args.unit.as_deref() {
        Some(unit_id) => service.list_for_unit(&actor, unit_id),
        None => service.list_visible(&actor),
    }
    .map_err(|e| fail(output, &e))?;
    let records = args.filter.to_filter().apply(records);

    let rows: Vec<ActivityRow<'_>> = records.iter().map(ActivityRow).collect();
    render_list(&rows, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: ListArgs,
    }

    #[test]
    fn list_defaults() {
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.unit.is_none());
        assert_eq!(w.args.filter.to_filter(), RecordFilter::default());
    }

    #[test]
    fn list_filters_parse() {
        let w = Wrapper::parse_from([
            "test", "--unit", "u1", "--status", "completed", "--type", "workshop", "--creator",
            "ana",
        ]);
        assert_eq!(w.args.unit.as_deref(), Some("u1"));
        let filter = w.args.filter.to_filter();
        assert_eq!(filter.status, Some(Status::Completed));
        assert_eq!(filter.activity_type.as_deref(), Some("workshop"));
        assert_eq!(filter.created_by.as_deref(), Some("ana"));
    }
}
