use std::path::Path;

use agenda_core::Status;
use clap::Args;

use super::{ActorFlags, open_service, resolve_actor, write_activity, write_activity_line};
use crate::output::{OutputMode, fail, render_mode};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Activity ID.
    pub id: String,

    /// New status: pending, in_progress or completed.
    pub status: Status,
}

/// Execute `agenda status <id> <status>`. Only the activity's creator may
/// change its status; any transition between the three states is allowed.
///
/// # Errors
///
/// Returns an error if identity is missing, the activity does not exist, or
/// the actor is not its creator.
pub fn run_status(
    args: &StatusArgs,
    flags: ActorFlags<'_>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let actor = resolve_actor(flags, output)?;
    let mut service = open_service(project_root, output)?;
    let record = service
        .update_status(&actor, &args.id, args.status)
        .map_err(|e| fail(output, &e))?;

    render_mode(
        output,
        &record,
        |r, w| write_activity_line(w, r),
        |r, w| write_activity(w, r),
    )
}
