//! In-process collaborators backed by plain vectors.

use std::collections::BTreeMap;

use super::{ActivityStore, UploadStore};
use crate::error::InfrastructureError;
use crate::model::{ActivityRecord, ImageAttachment, ImageUpload, OrganizationalUnit};

/// Vector-backed [`ActivityStore`] keeping first-save order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    units: Vec<OrganizationalUnit>,
    activities: Vec<ActivityRecord>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `units`.
    #[must_use]
    pub fn with_units(units: impl IntoIterator<Item = OrganizationalUnit>) -> Self {
        Self {
            units: units.into_iter().collect(),
            activities: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

impl ActivityStore for MemoryStore {
    fn fetch_activities_by_unit(
        &self,
        unit_id: &str,
    ) -> Result<Vec<ActivityRecord>, InfrastructureError> {
        Ok(self
            .activities
            .iter()
            .filter(|r| r.unit_id == unit_id)
            .cloned()
            .collect())
    }

    fn fetch_all_activities(&self) -> Result<Vec<ActivityRecord>, InfrastructureError> {
        Ok(self.activities.clone())
    }

    fn fetch_activity(&self, id: &str) -> Result<Option<ActivityRecord>, InfrastructureError> {
        Ok(self.activities.iter().find(|r| r.id == id).cloned())
    }

    fn fetch_all_units(&self) -> Result<Vec<OrganizationalUnit>, InfrastructureError> {
        Ok(self.units.clone())
    }

    fn fetch_unit(&self, id: &str) -> Result<Option<OrganizationalUnit>, InfrastructureError> {
        Ok(self.units.iter().find(|u| u.id == id).cloned())
    }

    fn save_unit(&mut self, unit: &OrganizationalUnit) -> Result<(), InfrastructureError> {
        match self.units.iter_mut().find(|u| u.id == unit.id) {
            Some(existing) => existing.name.clone_from(&unit.name),
            None => self.units.push(unit.clone()),
        }
        Ok(())
    }

    fn save(&mut self, record: &ActivityRecord) -> Result<(), InfrastructureError> {
        match self.activities.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => self.activities.push(record.clone()),
        }
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<bool, InfrastructureError> {
        let before = self.activities.len();
        self.activities.retain(|r| r.id != id);
        Ok(self.activities.len() < before)
    }
}

/// [`UploadStore`] holding image bytes in memory, keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct MemoryUploads {
    files: BTreeMap<String, Vec<u8>>,
    next: u64,
}

impl MemoryUploads {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.files.contains_key(url)
    }
}

impl UploadStore for MemoryUploads {
    fn store(&mut self, upload: &ImageUpload) -> Result<ImageAttachment, InfrastructureError> {
        self.next += 1;
        let url = format!("/uploads/mem-{}", self.next);
        self.files.insert(url.clone(), upload.bytes.clone());
        Ok(ImageAttachment {
            url,
            original_filename: upload.original_filename.clone(),
        })
    }

    fn purge(&mut self, images: &[ImageAttachment]) -> Result<usize, InfrastructureError> {
        Ok(images
            .iter()
            .filter(|image| self.files.remove(&image.url).is_some())
            .count())
    }
}
