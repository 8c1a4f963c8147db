use std::path::Path;

use clap::Args;
use serde::Serialize;

use super::{ActorFlags, open_service, resolve_actor};
use crate::output::{OutputMode, fail, pretty_kv, render_mode};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Activity ID to delete.
    pub id: String,
}

#[derive(Debug, Serialize)]
struct DeleteOutput {
    id: String,
    deleted: bool,
    images_removed: usize,
    images_failed: usize,
}

/// Execute `agenda delete <id>`. Removes the record and its image files.
///
/// # Errors
///
/// Returns an error if the activity does not exist or the actor is neither
/// its creator nor the super administrator.
pub fn run_delete(
    args: &DeleteArgs,
    flags: ActorFlags<'_>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let actor = resolve_actor(flags, output)?;
    let mut service = open_service(project_root, output)?;
    let outcome = service
        .delete(&actor, &args.id)
        .map_err(|e| fail(output, &e))?;

    let result = DeleteOutput {
        id: outcome.id,
        deleted: true,
        images_removed: outcome.images_removed,
        images_failed: outcome.images_failed,
    };
    render_mode(
        output,
        &result,
        |r, w| {
            writeln!(
                w,
                "{}\tdeleted\t{}\t{}",
                r.id, r.images_removed, r.images_failed
            )
        },
        |r, w| {
            writeln!(w, "✓ Deleted activity {}", r.id)?;
            pretty_kv(w, "Images", r.images_removed.to_string())?;
            if r.images_failed > 0 {
                pretty_kv(w, "Not purged", r.images_failed.to_string())?;
            }
            Ok(())
        },
    )
}
