pub mod create;
pub mod delete;
pub mod init;
pub mod list;
pub mod report;
pub mod status;
pub mod unit;

use std::io::{self, Write};
use std::path::Path;

use agenda_core::clock::SystemClock;
use agenda_core::config::{AGENDA_DIR, load_project_config};
use agenda_core::store::{LocalUploads, SqliteStore};
use agenda_core::{ActivityRecord, ActivityService, Actor, ErrorCode};
use serde::Serialize;

use crate::identity;
use crate::output::{CliError, OutputMode, Renderable, pretty_kv, pretty_rule, render_error};

/// The service as wired by the CLI: SQLite records, on-disk uploads, wall clock.
pub type Service = ActivityService<SqliteStore, LocalUploads>;

/// Identity flags shared by every command that acts on behalf of someone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActorFlags<'a> {
    pub actor: Option<&'a str>,
    pub name: Option<&'a str>,
}

/// Resolve the acting identity, rendering a structured error when missing.
pub fn resolve_actor(flags: ActorFlags<'_>, output: OutputMode) -> anyhow::Result<Actor> {
    match identity::require_actor(flags.actor, flags.name) {
        Ok(actor) => Ok(actor),
        Err(e) => {
            render_error(
                output,
                &CliError::with_details(
                    &e.message,
                    "Set --actor or AGENDA_ACTOR, e.g. ana:staff:<unit-id>",
                    e.code,
                ),
            )?;
            anyhow::bail!("{}", e.message);
        }
    }
}

/// Open the project's store and uploads as configured under `.agenda/`.
pub fn open_service(project_root: &Path, output: OutputMode) -> anyhow::Result<Service> {
    if !project_root.join(AGENDA_DIR).is_dir() {
        let code = ErrorCode::NotInitialized;
        render_error(
            output,
            &CliError::with_details(
                format!("{}: no {AGENDA_DIR}/ directory found", code.message()),
                code.hint().unwrap_or_default(),
                code.code(),
            ),
        )?;
        anyhow::bail!("{}", code.message());
    }

    let config = match load_project_config(project_root) {
        Ok(config) => config,
        Err(e) => {
            let code = ErrorCode::ConfigParseError;
            render_error(
                output,
                &CliError::with_details(
                    format!("{e:#}"),
                    code.hint().unwrap_or_default(),
                    code.code(),
                ),
            )?;
            return Err(e);
        }
    };

    let store = SqliteStore::open(&config.storage.database_path(project_root))?;
    let uploads = LocalUploads::new(config.storage.uploads_dir(project_root));
    Ok(ActivityService::new(store, uploads, SystemClock).with_config(&config))
}

fn date_or_dash(date: Option<chrono::NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.to_string())
}

/// One activity as a list row.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ActivityRow<'a>(pub &'a ActivityRecord);

impl Renderable for ActivityRow<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        write_activity(w, self.0)?;
        writeln!(w)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let r = self.0;
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            r.id,
            r.status,
            date_or_dash(r.start_date),
            r.activity_type,
            r.created_by_name,
            r.title
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["ID", "STATUS", "START", "TYPE", "CREATOR", "TITLE"]
    }
}

/// Pretty block for a single activity.
pub fn write_activity(w: &mut dyn Write, r: &ActivityRecord) -> io::Result<()> {
    writeln!(w, "{}", r.title)?;
    pretty_rule(w)?;
    pretty_kv(w, "ID", &r.id)?;
    pretty_kv(w, "Status", r.status.as_str())?;
    pretty_kv(w, "Type", &r.activity_type)?;
    pretty_kv(w, "Start", date_or_dash(r.start_date))?;
    if let Some(end) = r.end_date {
        pretty_kv(w, "End", end.to_string())?;
    }
    pretty_kv(w, "Unit", &r.unit_id)?;
    pretty_kv(
        w,
        "Created by",
        format!("{} ({})", r.created_by_name, r.created_by_role),
    )?;
    pretty_kv(w, "Created at", r.created_at.to_rfc3339())?;
    if let Some(description) = &r.description {
        pretty_kv(w, "Description", description)?;
    }
    for image in &r.images {
        pretty_kv(w, "Image", format!("{} ({})", image.url, image.original_filename))?;
    }
    Ok(())
}

/// Text mode for a single activity: id and status, tab separated.
pub fn write_activity_line(w: &mut dyn Write, r: &ActivityRecord) -> io::Result<()> {
    writeln!(w, "{}\t{}\t{}", r.id, r.status, r.title)
}
