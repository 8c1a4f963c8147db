//! Image files on the local filesystem.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use super::UploadStore;
use crate::error::InfrastructureError;
use crate::model::{ImageAttachment, ImageUpload};

/// URL prefix under which stored files are served.
pub const URL_PREFIX: &str = "/uploads/";

/// Writes images as `<uuid>.<ext>` under one directory.
#[derive(Debug, Clone)]
pub struct LocalUploads {
    dir: PathBuf,
}

impl LocalUploads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Local path of a stored attachment. `None` for URLs this store did not
    /// hand out or that would escape the directory.
    #[must_use]
    pub fn path_of(&self, url: &str) -> Option<PathBuf> {
        let name = url.strip_prefix(URL_PREFIX)?;
        let safe = !name.is_empty()
            && !name.contains(['/', '\\'])
            && name != "."
            && name != "..";
        safe.then(|| self.dir.join(name))
    }
}

/// Lowercase alphanumeric extension of `filename`, if it has a usable one.
fn extension_of(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?;
    let usable = !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric());
    usable.then(|| ext.to_ascii_lowercase())
}

impl UploadStore for LocalUploads {
    fn store(&mut self, upload: &ImageUpload) -> Result<ImageAttachment, InfrastructureError> {
        std::fs::create_dir_all(&self.dir)?;

        let stem = Uuid::new_v4().simple().to_string();
        let name = extension_of(&upload.original_filename)
            .map_or_else(|| stem.clone(), |ext| format!("{stem}.{ext}"));
        std::fs::write(self.dir.join(&name), &upload.bytes)?;

        debug!(file = %name, bytes = upload.bytes.len(), "stored upload");
        Ok(ImageAttachment {
            url: format!("{URL_PREFIX}{name}"),
            original_filename: upload.original_filename.clone(),
        })
    }

    fn purge(&mut self, images: &[ImageAttachment]) -> Result<usize, InfrastructureError> {
        let mut removed = 0;
        for image in images {
            let Some(path) = self.path_of(&image.url) else {
                warn!(url = %image.url, "skipping foreign upload url");
                continue;
            };
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), "upload already gone");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(removed)
    }
}
