//! Collaborator seams: record persistence and image uploads.
//!
//! The engine only talks to these traits. Implementations:
//!
//! - [`SqliteStore`]: durable store on a SQLite file.
//! - [`MemoryStore`] / [`MemoryUploads`]: in-process, insertion ordered.
//! - [`LocalUploads`]: image files under a directory, served as `/uploads/<file>`.

pub mod memory;
pub mod migrations;
pub mod schema;
pub mod sqlite;
pub mod uploads;

pub use memory::{MemoryStore, MemoryUploads};
pub use sqlite::SqliteStore;
pub use uploads::LocalUploads;

use crate::error::InfrastructureError;
use crate::model::{ActivityRecord, ImageAttachment, ImageUpload, OrganizationalUnit};

/// Persistence of units and activities.
///
/// Fetches return records in the order they were first saved. `save` is an
/// upsert: saving an existing id overwrites it in place, last write wins.
pub trait ActivityStore {
    /// Activities owned by `unit_id`.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    fn fetch_activities_by_unit(
        &self,
        unit_id: &str,
    ) -> Result<Vec<ActivityRecord>, InfrastructureError>;

    /// Every activity across all units.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    fn fetch_all_activities(&self) -> Result<Vec<ActivityRecord>, InfrastructureError>;

    /// # Errors
    ///
    /// Propagates storage failures.
    fn fetch_activity(&self, id: &str) -> Result<Option<ActivityRecord>, InfrastructureError>;

    /// # Errors
    ///
    /// Propagates storage failures.
    fn fetch_all_units(&self) -> Result<Vec<OrganizationalUnit>, InfrastructureError>;

    /// # Errors
    ///
    /// Propagates storage failures.
    fn fetch_unit(&self, id: &str) -> Result<Option<OrganizationalUnit>, InfrastructureError>;

    /// Insert or overwrite a unit.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    fn save_unit(&mut self, unit: &OrganizationalUnit) -> Result<(), InfrastructureError>;

    /// Insert or overwrite an activity together with its image list.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    fn save(&mut self, record: &ActivityRecord) -> Result<(), InfrastructureError>;

    /// Hard delete. Returns whether a record was removed.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    fn remove(&mut self, id: &str) -> Result<bool, InfrastructureError>;
}

/// Storage for image files attached to activities.
pub trait UploadStore {
    /// Persist one image and return its stable reference.
    ///
    /// # Errors
    ///
    /// Propagates I/O failures.
    fn store(&mut self, upload: &ImageUpload) -> Result<ImageAttachment, InfrastructureError>;

    /// Delete the files behind `images`. Files already gone are skipped.
    /// Returns how many files were actually removed.
    ///
    /// # Errors
    ///
    /// Propagates I/O failures other than a missing file.
    fn purge(&mut self, images: &[ImageAttachment]) -> Result<usize, InfrastructureError>;
}
