#![forbid(unsafe_code)]

mod cmd;
mod identity;
mod output;

use clap::{Parser, Subcommand};
use cmd::ActorFlags;
use output::OutputMode;
use std::env;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "agenda: activity tracking and period reporting for organizational units",
    long_about = None
)]
struct Cli {
    /// Output format: pretty, text or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Acting identity as `id:role[:unit]` (overrides AGENDA_ACTOR).
    #[arg(long, global = true)]
    actor: Option<String>,

    /// Display name of the acting identity (overrides AGENDA_ACTOR_NAME).
    #[arg(long = "name", global = true)]
    actor_name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }

    fn actor_flags(&self) -> ActorFlags<'_> {
        ActorFlags {
            actor: self.actor.as_deref(),
            name: self.actor_name.as_deref(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Setup",
        about = "Initialize an agenda project",
        long_about = "Create .agenda/ with a default config, a migrated database and an uploads directory.",
        after_help = "EXAMPLES:\n    # Initialize a project in the current directory\n    agenda init\n\n    # Rewrite the default config\n    agenda init --force"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Manage organizational units",
        long_about = "Create, rename and list organizational units. Super administrator only.",
        after_help = "EXAMPLES:\n    # Create a unit\n    agenda --actor root:super_admin unit create \"Culture\"\n\n    # List units as JSON\n    agenda --actor root:super_admin unit list --json"
    )]
    Unit(cmd::unit::UnitArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Register a new activity",
        long_about = "Register a new pending activity under the actor's unit. Staff and managers only.",
        after_help = "EXAMPLES:\n    # Create an activity with a poster\n    agenda create --title \"Book fair\" --type event --start 2025-05-10 --image poster.png"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Change an activity's status",
        long_about = "Set an activity to pending, in_progress or completed. Only its creator may do this.",
        after_help = "EXAMPLES:\n    # Start work\n    agenda status <id> in_progress\n\n    # Finish\n    agenda status <id> completed"
    )]
    Status(cmd::status::StatusArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Delete an activity",
        long_about = "Permanently delete an activity and its image files. Creator or super administrator.",
        after_help = "EXAMPLES:\n    # Delete an activity\n    agenda delete <id>"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Read",
        about = "List activities",
        long_about = "List the activities the actor may see, optionally narrowed to a unit and filtered.",
        after_help = "EXAMPLES:\n    # Everything visible to you\n    agenda list\n\n    # Completed workshops of one unit\n    agenda list --unit <unit-id> --status completed --type workshop"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show the period report",
        long_about = "Group activities by year and four-month period with effectiveness, plus per-unit, per-creator and per-type summaries.",
        after_help = "EXAMPLES:\n    # Report for everything visible to you\n    agenda report\n\n    # Machine-readable report for one unit\n    agenda report --unit <unit-id> --json"
    )]
    Report(cmd::report::ReportArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("AGENDA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "agenda=debug,info"
        } else {
            "agenda=info,warn"
        })
    });

    let format = env::var("AGENDA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let project_root = env::current_dir()?;
    let output = cli.output_mode();
    let flags = cli.actor_flags();
    debug!(?output, root = %project_root.display(), "dispatching command");

    match &cli.command {
        Commands::Init(args) => cmd::init::run_init(args, output, &project_root),
        Commands::Unit(args) => cmd::unit::run_unit(args, flags, output, &project_root),
        Commands::Create(args) => cmd::create::run_create(args, flags, output, &project_root),
        Commands::Status(args) => cmd::status::run_status(args, flags, output, &project_root),
        Commands::Delete(args) => cmd::delete::run_delete(args, flags, output, &project_root),
        Commands::List(args) => cmd::list::run_list(args, flags, output, &project_root),
        Commands::Report(args) => cmd::report::run_report(args, flags, output, &project_root),
    }
}
