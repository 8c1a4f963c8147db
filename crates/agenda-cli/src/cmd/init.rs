use std::path::Path;

use agenda_core::config::{AGENDA_DIR, ProjectConfig, config_path, default_config_toml};
use agenda_core::store::SqliteStore;
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;

use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Rewrite the default config even if `.agenda/` already exists.
    #[arg(long)]
    pub force: bool,
}

const GITIGNORE: &str = "agenda.db\nagenda.db-wal\nagenda.db-shm\nuploads/\n";

#[derive(Debug, Serialize)]
struct InitOutput {
    config: String,
    database: String,
    uploads: String,
}

/// Execute `agenda init`. Creates the project skeleton:
///
/// ```text
/// .agenda/
///   config.toml    (default project config)
///   agenda.db      (migrated SQLite database)
///   uploads/       (image files)
///   .gitignore
/// ```
///
/// # Errors
///
/// Returns an error if `.agenda/` already exists and `--force` is not set,
/// or if any filesystem or database operation fails.
pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let agenda_dir = project_root.join(AGENDA_DIR);
    if agenda_dir.exists() && !args.force {
        render_error(
            output,
            &CliError::with_details(
                format!("{AGENDA_DIR}/ already exists"),
                "use `agenda init --force` to rewrite the default config",
                "already_initialized",
            ),
        )?;
        anyhow::bail!("{AGENDA_DIR}/ already exists");
    }

    std::fs::create_dir_all(&agenda_dir)
        .with_context(|| format!("Failed to create {}", agenda_dir.display()))?;

    let config_file = config_path(project_root);
    std::fs::write(&config_file, default_config_toml()?)
        .with_context(|| format!("Failed to write config: {}", config_file.display()))?;

    let gitignore = agenda_dir.join(".gitignore");
    std::fs::write(&gitignore, GITIGNORE)
        .with_context(|| format!("Failed to write {}", gitignore.display()))?;

    let storage = ProjectConfig::default().storage;
    let database = storage.database_path(project_root);
    SqliteStore::open(&database)?;
    let uploads = storage.uploads_dir(project_root);
    std::fs::create_dir_all(&uploads)
        .with_context(|| format!("Failed to create {}", uploads.display()))?;

    tracing::info!(root = %project_root.display(), "project initialized");

    let result = InitOutput {
        config: config_file.display().to_string(),
        database: database.display().to_string(),
        uploads: uploads.display().to_string(),
    };
    render_mode(
        output,
        &result,
        |r, w| writeln!(w, "{}\t{}\t{}", r.config, r.database, r.uploads),
        |r, w| {
            pretty_section(w, "Initialized .agenda/ project structure")?;
            pretty_kv(w, "Config", &r.config)?;
            pretty_kv(w, "Database", &r.database)?;
            pretty_kv(w, "Uploads", &r.uploads)?;
            writeln!(w)?;
            writeln!(w, "Next steps:")?;
            writeln!(w, "  export AGENDA_ACTOR=root:super_admin")?;
            writeln!(w, "  agenda unit create \"Culture\"")
        },
    )
}
