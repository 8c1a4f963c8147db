//! `agenda unit` organizational unit management (super administrator only).

use std::io::{self, Write};
use std::path::Path;

use agenda_core::OrganizationalUnit;
use clap::{Args, Subcommand};
use serde::Serialize;

use super::{ActorFlags, open_service, resolve_actor};
use crate::output::{OutputMode, Renderable, fail, pretty_kv, render_list, render_mode};

#[derive(Args, Debug)]
pub struct UnitArgs {
    #[command(subcommand)]
    pub command: UnitCommand,
}

#[derive(Subcommand, Debug)]
pub enum UnitCommand {
    #[command(about = "Create a unit")]
    Create(UnitCreateArgs),

    #[command(about = "Rename a unit")]
    Rename(UnitRenameArgs),

    #[command(about = "List all units")]
    List,
}

#[derive(Args, Debug)]
pub struct UnitCreateArgs {
    /// Display name of the new unit.
    pub name: String,
}

#[derive(Args, Debug)]
pub struct UnitRenameArgs {
    /// Unit ID to rename.
    pub id: String,

    /// New display name.
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
struct UnitRow<'a>(&'a OrganizationalUnit);

impl Renderable for UnitRow<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        write_unit(w, self.0)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}\t{}", self.0.id, self.0.name)
    }

    fn table_headers() -> &'static [&'static str] {
        &["ID", "NAME"]
    }
}

fn write_unit(w: &mut dyn Write, unit: &OrganizationalUnit) -> io::Result<()> {
    pretty_kv(w, "Unit", &unit.name)?;
    pretty_kv(w, "ID", &unit.id)?;
    pretty_kv(w, "Created at", unit.created_at.to_rfc3339())?;
    writeln!(w)
}

fn render_unit(output: OutputMode, unit: &OrganizationalUnit) -> anyhow::Result<()> {
    render_mode(
        output,
        unit,
        |u, w| writeln!(w, "{}\t{}", u.id, u.name),
        |u, w| write_unit(w, u),
    )
}

/// Execute `agenda unit <create|rename|list>`.
///
/// # Errors
///
/// Returns an error if the actor is not the super administrator, the name is
/// blank, the unit does not exist (rename), or storage fails.
pub fn run_unit(
    args: &UnitArgs,
    flags: ActorFlags<'_>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let actor = resolve_actor(flags, output)?;
    let mut service = open_service(project_root, output)?;

    match &args.command {
        UnitCommand::Create(create) => {
            let unit = service
                .create_unit(&actor, &create.name)
                .map_err(|e| fail(output, &e))?;
            render_unit(output, &unit)
        }
        UnitCommand::Rename(rename) => {
            let unit = service
                .rename_unit(&actor, &rename.id, &rename.name)
                .map_err(|e| fail(output, &e))?;
            render_unit(output, &unit)
        }
        UnitCommand::List => {
            let units = service.list_units(&actor).map_err(|e| fail(output, &e))?;
            let rows: Vec<UnitRow<'_>> = units.iter().map(UnitRow).collect();
            render_list(&rows, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: UnitArgs,
    }

    #[test]
    fn parses_rename() {
        let w = Wrapper::parse_from(["test", "rename", "u-1", "Culture and Arts"]);
        match w.args.command {
            UnitCommand::Rename(args) => {
                assert_eq!(args.id, "u-1");
                assert_eq!(args.name, "Culture and Arts");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_list() {
        let w = Wrapper::parse_from(["test", "list"]);
        assert!(matches!(w.args.command, UnitCommand::List));
    }
}
