use std::path::{Path, PathBuf};

use agenda_core::NewActivity;
use agenda_core::model::ImageUpload;
use anyhow::Context as _;
use chrono::NaiveDate;
use clap::Args;

use super::{ActorFlags, open_service, resolve_actor, write_activity, write_activity_line};
use crate::output::{OutputMode, fail, render_mode};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Activity title.
    #[arg(short, long)]
    pub title: String,

    /// Free-form activity type (e.g. workshop, campaign).
    #[arg(long = "type")]
    pub activity_type: String,

    /// Optional description.
    #[arg(short, long)]
    pub description: Option<String>,

    /// Start date (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Image file to attach (repeatable).
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
}

/// Content type guessed from the file extension. Anything unknown is sent as
/// octet-stream so the image check rejects it.
fn content_type_of(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn read_image(path: &Path) -> anyhow::Result<ImageUpload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
    let original_filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ImageUpload {
        original_filename,
        content_type: content_type_of(path).to_string(),
        bytes,
    })
}

/// Execute `agenda create`.
///
/// # Errors
///
/// Returns an error if identity is missing, an image cannot be read, or the
/// core rejects the activity.
pub fn run_create(
    args: &CreateArgs,
    flags: ActorFlags<'_>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let actor = resolve_actor(flags, output)?;
    let images = args
        .images
        .iter()
        .map(|path| read_image(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let mut service = open_service(project_root, output)?;

    let input = NewActivity {
        title: args.title.clone(),
        activity_type: args.activity_type.clone(),
        description: args.description.clone(),
        start_date: args.start,
        end_date: args.end,
        images,
        unit_id: None,
    };
    let record = service
        .create(&actor, input)
        .map_err(|e| fail(output, &e))?;

    render_mode(
        output,
        &record,
        |r, w| write_activity_line(w, r),
        |r, w| write_activity(w, r),
    )
}
