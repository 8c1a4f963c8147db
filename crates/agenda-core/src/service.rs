//! The façade every caller goes through: validate, authorize, then touch the
//! collaborators.
//!
//! All checks run before any write. A rejected call leaves the store and the
//! upload directory exactly as they were.

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::config::{PolicyConfig, ProjectConfig};
use crate::error::{AgendaError, Field, NotFoundError, ValidationError, ValidationKind};
use crate::lifecycle;
use crate::model::{
    ActivityRecord, Actor, ImageAttachment, NewActivity, OrganizationalUnit, Status,
};
use crate::period::current_period;
use crate::policy;
use crate::report::{Report, build_report};
use crate::stats::{RecordFilter, Thresholds};
use crate::store::{ActivityStore, UploadStore};
use crate::validate::{ValidatedActivity, validate_for_creation};

/// Result of a successful [`ActivityService::delete`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub id: String,
    pub images_removed: usize,
    /// Image files left behind because purging them failed.
    pub images_failed: usize,
}

/// Activity operations over a store, an upload sink and a clock.
#[derive(Debug)]
pub struct ActivityService<S, U, C = SystemClock> {
    store: S,
    uploads: U,
    clock: C,
    policy: PolicyConfig,
    thresholds: Thresholds,
}

impl<S, U, C> ActivityService<S, U, C>
where
    S: ActivityStore,
    U: UploadStore,
    C: Clock,
{
    /// Service with default policy limits and report thresholds.
    pub fn new(store: S, uploads: U, clock: C) -> Self {
        Self {
            store,
            uploads,
            clock,
            policy: PolicyConfig::default(),
            thresholds: Thresholds::default(),
        }
    }

    /// Apply the `[policy]` and `[report]` sections of a project config.
    #[must_use]
    pub fn with_config(mut self, config: &ProjectConfig) -> Self {
        self.policy = config.policy.clone();
        self.thresholds = Thresholds::from(&config.report);
        self
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn uploads(&self) -> &U {
        &self.uploads
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    pub const fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    #[must_use]
    pub const fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    // -----------------------------------------------------------------------
    // Activities
    // -----------------------------------------------------------------------

    /// Validate `input` and file it as a new pending activity under the
    /// actor's unit.
    ///
    /// # Errors
    ///
    /// - [`AgendaError::Auth`] (`NotPermitted`) for the super-administrator,
    ///   who has no unit to file under
    /// - [`AgendaError::Validation`] for rejected input or a foreign unit
    /// - [`AgendaError::NotFound`] when the actor's unit does not exist
    /// - [`AgendaError::Infrastructure`] when uploading or saving fails; any
    ///   images already uploaded are purged again
    pub fn create(
        &mut self,
        actor: &Actor,
        input: NewActivity,
    ) -> Result<ActivityRecord, AgendaError> {
        let own_unit = policy::require_create(actor)
            .inspect_err(|err| warn!(actor = %actor.id, %err, "create rejected"))?;
        let validated = validate_for_creation(input, &self.policy, self.clock.today())
            .inspect_err(|err| warn!(actor = %actor.id, %err, "create rejected"))?;
        let unit_id = resolve_unit(own_unit, validated.unit_id.as_deref())
            .inspect_err(|err| warn!(actor = %actor.id, %err, "create rejected"))?;
        if self.store.fetch_unit(&unit_id)?.is_none() {
            warn!(actor = %actor.id, unit = %unit_id, "create rejected: unknown unit");
            return Err(NotFoundError::unit(unit_id).into());
        }

        let images = self.upload_all(&validated)?;
        let record = stamp(validated, images, unit_id, actor, &self.clock);

        if let Err(err) = self.store.save(&record) {
            self.discard_uploads(&record.images);
            return Err(err.into());
        }

        info!(
            id = %record.id,
            unit = %record.unit_id,
            actor = %actor.id,
            images = record.images.len(),
            "activity created"
        );
        Ok(record)
    }

    /// Set the status of activity `id`. Only its creator may do this.
    ///
    /// Setting the current status again is authorized the same way but
    /// writes nothing.
    ///
    /// # Errors
    ///
    /// [`AgendaError::NotFound`], [`AgendaError::Auth`] (`NotCreator`) or a
    /// storage failure.
    pub fn update_status(
        &mut self,
        actor: &Actor,
        id: &str,
        status: Status,
    ) -> Result<ActivityRecord, AgendaError> {
        let record = self.load(id)?;
        let updated = lifecycle::set_status(&record, status, actor).inspect_err(|err| {
            warn!(id, actor = %actor.id, %err, "status change rejected");
        })?;
        if updated.status == record.status {
            debug!(id, actor = %actor.id, status = %record.status, "status unchanged");
            return Ok(updated);
        }

        self.store.save(&updated)?;
        info!(
            id,
            actor = %actor.id,
            from = %record.status,
            to = %updated.status,
            "activity status updated"
        );
        Ok(updated)
    }

    /// Hard-delete activity `id` and purge its image files.
    ///
    /// The deletion is committed once the record is removed. Image files that
    /// cannot be purged afterwards are logged and counted in
    /// [`DeleteOutcome::images_failed`].
    ///
    /// # Errors
    ///
    /// [`AgendaError::NotFound`], [`AgendaError::Auth`] (`NotCreator`) when
    /// the actor is neither creator nor super-administrator, or a storage
    /// failure before the record is removed.
    pub fn delete(&mut self, actor: &Actor, id: &str) -> Result<DeleteOutcome, AgendaError> {
        let record = self.load(id)?;
        policy::require_delete(actor, &record)
            .inspect_err(|err| warn!(id, actor = %actor.id, %err, "delete rejected"))?;

        if !self.store.remove(id)? {
            return Err(NotFoundError::activity(id).into());
        }
        let (images_removed, images_failed) = self.purge_each(&record.images);

        info!(id, actor = %actor.id, images_removed, images_failed, "activity deleted");
        Ok(DeleteOutcome {
            id: record.id,
            images_removed,
            images_failed,
        })
    }

    /// Activities of `unit_id`, for actors allowed to see that unit.
    ///
    /// # Errors
    ///
    /// [`AgendaError::Auth`] (`NotPermitted`) outside the actor's scope,
    /// [`AgendaError::NotFound`] for an unknown unit, or a storage failure.
    pub fn list_for_unit(
        &self,
        actor: &Actor,
        unit_id: &str,
    ) -> Result<Vec<ActivityRecord>, AgendaError> {
        policy::require_view_unit(actor, unit_id)
            .inspect_err(|err| warn!(unit = unit_id, actor = %actor.id, %err, "list rejected"))?;
        if self.store.fetch_unit(unit_id)?.is_none() {
            return Err(NotFoundError::unit(unit_id).into());
        }
        Ok(visible(actor, self.store.fetch_activities_by_unit(unit_id)?))
    }

    /// Every activity across all units. Super-administrator only.
    ///
    /// # Errors
    ///
    /// [`AgendaError::Auth`] (`NotPermitted`) for other roles, or a storage
    /// failure.
    pub fn list_for_all_units(&self, actor: &Actor) -> Result<Vec<ActivityRecord>, AgendaError> {
        policy::require_view_all_units(actor)
            .inspect_err(|err| warn!(actor = %actor.id, %err, "list rejected"))?;
        Ok(self.store.fetch_all_activities()?)
    }

    /// Everything the actor may see: all units for the super-administrator,
    /// the own unit otherwise.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub fn list_visible(&self, actor: &Actor) -> Result<Vec<ActivityRecord>, AgendaError> {
        match actor.unit_id() {
            None => self.list_for_all_units(actor),
            Some(unit_id) => Ok(visible(actor, self.store.fetch_activities_by_unit(unit_id)?)),
        }
    }

    /// Full read-side report over the actor's visible records, optionally
    /// narrowed to one unit and by `filter`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_for_unit`] / [`Self::list_visible`].
    pub fn report(
        &self,
        actor: &Actor,
        unit_id: Option<&str>,
        filter: &RecordFilter,
    ) -> Result<Report, AgendaError> {
        let records = match unit_id {
            Some(unit_id) => self.list_for_unit(actor, unit_id)?,
            None => self.list_visible(actor)?,
        };
        let records = filter.apply(records);

        let units = match unit_id.or_else(|| actor.unit_id()) {
            Some(scope) => self.store.fetch_unit(scope)?.into_iter().collect(),
            None => self.store.fetch_all_units()?,
        };

        Ok(build_report(
            &records,
            &units,
            current_period(&self.clock),
            self.thresholds,
        ))
    }

    // -----------------------------------------------------------------------
    // Units
    // -----------------------------------------------------------------------

    /// # Errors
    ///
    /// [`AgendaError::Auth`] (`NotPermitted`) unless super-administrator,
    /// [`AgendaError::Validation`] for a blank name, or a storage failure.
    pub fn create_unit(
        &mut self,
        actor: &Actor,
        name: &str,
    ) -> Result<OrganizationalUnit, AgendaError> {
        policy::require_manage_units(actor)
            .inspect_err(|err| warn!(actor = %actor.id, %err, "unit create rejected"))?;
        let name = unit_name(name)?;

        let unit = OrganizationalUnit {
            id: Uuid::new_v4().to_string(),
            name,
            created_at: self.clock.now(),
        };
        self.store.save_unit(&unit)?;
        info!(unit = %unit.id, name = %unit.name, "unit created");
        Ok(unit)
    }

    /// # Errors
    ///
    /// As [`Self::create_unit`], plus [`AgendaError::NotFound`] for an
    /// unknown unit.
    pub fn rename_unit(
        &mut self,
        actor: &Actor,
        unit_id: &str,
        name: &str,
    ) -> Result<OrganizationalUnit, AgendaError> {
        policy::require_manage_units(actor)
            .inspect_err(|err| warn!(actor = %actor.id, %err, "unit rename rejected"))?;
        let name = unit_name(name)?;

        let mut unit = self
            .store
            .fetch_unit(unit_id)?
            .ok_or_else(|| NotFoundError::unit(unit_id))?;
        let previous = std::mem::replace(&mut unit.name, name);
        self.store.save_unit(&unit)?;
        info!(unit = unit_id, from = %previous, to = %unit.name, "unit renamed");
        Ok(unit)
    }

    /// # Errors
    ///
    /// [`AgendaError::Auth`] (`NotPermitted`) unless super-administrator, or
    /// a storage failure.
    pub fn list_units(&self, actor: &Actor) -> Result<Vec<OrganizationalUnit>, AgendaError> {
        policy::require_manage_units(actor)?;
        Ok(self.store.fetch_all_units()?)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn load(&self, id: &str) -> Result<ActivityRecord, AgendaError> {
        self.store
            .fetch_activity(id)?
            .ok_or_else(|| NotFoundError::activity(id).into())
    }

    fn upload_all(
        &mut self,
        validated: &ValidatedActivity,
    ) -> Result<Vec<ImageAttachment>, AgendaError> {
        let mut stored = Vec::with_capacity(validated.images.len());
        for upload in &validated.images {
            match self.uploads.store(upload) {
                Ok(attachment) => stored.push(attachment),
                Err(err) => {
                    self.discard_uploads(&stored);
                    return Err(err.into());
                }
            }
        }
        Ok(stored)
    }

    /// Purge images one by one so a single failure neither hides the count
    /// of removed files nor stops the rest. Returns `(removed, failed)`.
    fn purge_each(&mut self, images: &[ImageAttachment]) -> (usize, usize) {
        let mut removed = 0;
        let mut failed = 0;
        for image in images {
            match self.uploads.purge(std::slice::from_ref(image)) {
                Ok(n) => removed += n,
                Err(err) => {
                    warn!(%err, url = %image.url, "failed to purge deleted activity image");
                    failed += 1;
                }
            }
        }
        (removed, failed)
    }

    fn discard_uploads(&mut self, images: &[ImageAttachment]) {
        if images.is_empty() {
            return;
        }
        if let Err(err) = self.uploads.purge(images) {
            warn!(%err, count = images.len(), "failed to purge orphaned uploads");
        }
    }
}

fn visible(actor: &Actor, records: Vec<ActivityRecord>) -> Vec<ActivityRecord> {
    records
        .into_iter()
        .filter(|record| policy::can_view(actor, record))
        .collect()
}

/// Unit an activity is filed under: always the creator's own. Naming a
/// different one is rejected.
fn resolve_unit(own: &str, requested: Option<&str>) -> Result<String, ValidationError> {
    match requested.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) if id != own => Err(ValidationError::new(
            Field::Unit,
            ValidationKind::UnitOverride,
        )),
        _ => Ok(own.to_string()),
    }
}

fn unit_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::new(Field::UnitName, ValidationKind::NameEmpty));
    }
    Ok(name.to_string())
}

fn stamp(
    validated: ValidatedActivity,
    images: Vec<ImageAttachment>,
    unit_id: String,
    actor: &Actor,
    clock: &impl Clock,
) -> ActivityRecord {
    ActivityRecord {
        id: Uuid::new_v4().to_string(),
        title: validated.title,
        activity_type: validated.activity_type,
        description: validated.description,
        start_date: Some(validated.start_date),
        end_date: validated.end_date,
        unit_id,
        created_by_id: actor.id.clone(),
        created_by_name: actor.display_name.clone(),
        created_by_role: actor.role.kind(),
        status: Status::Pending,
        images,
        created_at: clock.now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::{Action, AuthErrorKind, Entity, InfrastructureError};
    use crate::model::ImageUpload;
    use crate::store::{MemoryStore, MemoryUploads};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn unit(id: &str) -> OrganizationalUnit {
        OrganizationalUnit {
            id: id.into(),
            name: format!("Unit {id}"),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn service() -> ActivityService<MemoryStore, MemoryUploads, FixedClock> {
        ActivityService::new(
            MemoryStore::with_units([unit("u1"), unit("u2")]),
            MemoryUploads::new(),
            FixedClock::on(today()),
        )
    }

    fn input(title: &str) -> NewActivity {
        NewActivity {
            title: title.into(),
            activity_type: "event".into(),
            start_date: Some(today()),
            ..NewActivity::default()
        }
    }

    fn png(name: &str) -> ImageUpload {
        ImageUpload {
            original_filename: name.into(),
            content_type: "image/png".into(),
            bytes: vec![7; 16],
        }
    }

    #[test]
    fn create_stamps_creator_unit_and_pending() {
        let mut svc = service();
        let staff = Actor::staff("s1", "Sam", "u1");
        let record = svc.create(&staff, input("Fair")).unwrap();

        assert_eq!(record.unit_id, "u1");
        assert_eq!(record.created_by_id, "s1");
        assert_eq!(record.created_by_name, "Sam");
        assert_eq!(record.status, Status::Pending);
        assert_eq!(record.created_at, FixedClock::on(today()).now());
        assert_eq!(svc.store().len(), 1);
    }

    #[test]
    fn staff_cannot_file_under_another_unit() {
        let mut svc = service();
        let mut raw = input("Fair");
        raw.unit_id = Some("u2".into());
        let err = svc.create(&Actor::staff("s1", "Sam", "u1"), raw).unwrap_err();
        assert!(matches!(
            err,
            AgendaError::Validation(ValidationError { kind: ValidationKind::UnitOverride, .. })
        ));
        assert!(svc.store().is_empty());
    }

    #[test]
    fn super_admin_cannot_create() {
        let mut svc = service();
        let root = Actor::super_admin("root", "Root");

        let mut raw = input("Fair");
        raw.unit_id = Some("u1".into());
        raw.images = vec![png("a.png")];
        let err = svc.create(&root, raw).unwrap_err();
        assert!(matches!(
            &err,
            AgendaError::Auth(e) if e.kind == AuthErrorKind::NotPermitted && e.action == Action::Create
        ));
        assert_eq!(err.code().code(), "E3002");
        assert!(svc.store().is_empty());
        assert!(svc.uploads().is_empty());

        let err = svc.create(&root, input("Fair")).unwrap_err();
        assert!(matches!(err, AgendaError::Auth(_)));
    }

    #[test]
    fn own_unit_must_exist() {
        let mut svc = service();
        let err = svc
            .create(&Actor::staff("s1", "Sam", "gone"), input("Fair"))
            .unwrap_err();
        assert!(matches!(err, AgendaError::NotFound(NotFoundError { entity: Entity::Unit, .. })));
    }

    #[test]
    fn naming_own_unit_is_accepted() {
        let mut svc = service();
        let mut raw = input("Fair");
        raw.unit_id = Some(" u1 ".into());
        let record = svc.create(&Actor::manager("m1", "Mia", "u1"), raw).unwrap();
        assert_eq!(record.unit_id, "u1");
    }

    #[test]
    fn invalid_input_uploads_nothing() {
        let mut svc = service();
        let mut raw = input("");
        raw.images = vec![png("a.png")];
        assert!(svc.create(&Actor::staff("s1", "Sam", "u1"), raw).is_err());
        assert!(svc.uploads().is_empty());
    }

    #[test]
    fn only_creator_updates_status() {
        let mut svc = service();
        let staff = Actor::staff("s1", "Sam", "u1");
        let record = svc.create(&staff, input("Fair")).unwrap();

        let err = svc
            .update_status(&Actor::manager("m1", "Mia", "u1"), &record.id, Status::Completed)
            .unwrap_err();
        assert!(matches!(&err, AgendaError::Auth(e) if e.kind == AuthErrorKind::NotCreator));

        let updated = svc.update_status(&staff, &record.id, Status::Completed).unwrap();
        assert_eq!(updated.status, Status::Completed);
        let stored = svc.store().fetch_activity(&record.id).unwrap().unwrap();
        assert_eq!(stored.status, Status::Completed);
    }

    #[test]
    fn same_status_writes_nothing() {
        let mut svc = ActivityService::new(
            MemoryStore::with_units([unit("u1")]),
            MemoryUploads::new(),
            FixedClock::on(today()),
        );
        let staff = Actor::staff("s1", "Sam", "u1");
        let record = svc.create(&staff, input("Fair")).unwrap();

        let mut svc = ActivityService::new(
            BrokenStore(svc.store().clone()),
            MemoryUploads::new(),
            FixedClock::on(today()),
        );
        let unchanged = svc.update_status(&staff, &record.id, Status::Pending).unwrap();
        assert_eq!(unchanged, record);

        let err = svc
            .update_status(&Actor::staff("s2", "Sue", "u1"), &record.id, Status::Pending)
            .unwrap_err();
        assert!(matches!(err, AgendaError::Auth(_)));
        assert!(svc.update_status(&staff, &record.id, Status::Completed).is_err());
    }

    #[test]
    fn update_unknown_activity_is_not_found() {
        let mut svc = service();
        let err = svc
            .update_status(&Actor::staff("s1", "Sam", "u1"), "ghost", Status::Completed)
            .unwrap_err();
        assert!(matches!(err, AgendaError::NotFound(_)));
    }

    #[test]
    fn delete_purges_images_and_reports_count() {
        let mut svc = service();
        let staff = Actor::staff("s1", "Sam", "u1");
        let mut raw = input("Fair");
        raw.images = vec![png("a.png"), png("b.png")];
        let record = svc.create(&staff, raw).unwrap();
        assert_eq!(svc.uploads().len(), 2);

        let err = svc
            .delete(&Actor::manager("m1", "Mia", "u1"), &record.id)
            .unwrap_err();
        assert!(matches!(err, AgendaError::Auth(_)));

        let outcome = svc.delete(&Actor::super_admin("root", "Root"), &record.id).unwrap();
        assert_eq!(outcome.images_removed, 2);
        assert_eq!(outcome.images_failed, 0);
        assert!(svc.uploads().is_empty());
        assert!(svc.store().is_empty());
    }

    #[test]
    fn listing_is_unit_scoped() {
        let mut svc = service();
        svc.create(&Actor::staff("s1", "Sam", "u1"), input("A")).unwrap();
        svc.create(&Actor::staff("s2", "Sue", "u2"), input("B")).unwrap();

        let manager = Actor::manager("m1", "Mia", "u1");
        assert_eq!(svc.list_visible(&manager).unwrap().len(), 1);
        assert!(matches!(
            svc.list_for_unit(&manager, "u2").unwrap_err(),
            AgendaError::Auth(_)
        ));
        assert!(matches!(
            svc.list_for_all_units(&manager).unwrap_err(),
            AgendaError::Auth(_)
        ));

        let root = Actor::super_admin("root", "Root");
        assert_eq!(svc.list_for_all_units(&root).unwrap().len(), 2);
        assert_eq!(svc.list_for_unit(&root, "u2").unwrap().len(), 1);
        assert!(matches!(
            svc.list_for_unit(&root, "u9").unwrap_err(),
            AgendaError::NotFound(_)
        ));
    }

    #[test]
    fn unit_management_is_super_admin_only() {
        let mut svc = service();
        let root = Actor::super_admin("root", "Root");
        let manager = Actor::manager("m1", "Mia", "u1");

        assert!(svc.create_unit(&manager, "Sports").is_err());
        assert!(svc.list_units(&manager).is_err());

        let created = svc.create_unit(&root, "  Sports ").unwrap();
        assert_eq!(created.name, "Sports");
        assert!(matches!(
            svc.create_unit(&root, "   ").unwrap_err(),
            AgendaError::Validation(_)
        ));

        let renamed = svc.rename_unit(&root, &created.id, "Athletics").unwrap();
        assert_eq!(renamed.name, "Athletics");
        assert_eq!(renamed.created_at, created.created_at);
        assert!(matches!(
            svc.rename_unit(&root, "ghost", "X").unwrap_err(),
            AgendaError::NotFound(_)
        ));
        assert_eq!(svc.list_units(&root).unwrap().len(), 3);
    }

    #[test]
    fn report_for_manager_joins_own_unit_only() {
        let mut svc = service();
        let staff = Actor::staff("s1", "Sam", "u1");
        let record = svc.create(&staff, input("A")).unwrap();
        svc.update_status(&staff, &record.id, Status::Completed).unwrap();
        svc.create(&staff, input("B")).unwrap();
        svc.create(&Actor::staff("s2", "Sue", "u2"), input("C")).unwrap();

        let report = svc
            .report(&Actor::manager("m1", "Mia", "u1"), None, &RecordFilter::default())
            .unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.effectiveness, 50);
        assert_eq!(report.units.len(), 1);
        assert_eq!(report.units[0].row.unit_id, "u1");
        assert!(report.years[0].periods.iter().any(|p| p.is_current));
    }

    /// Store whose writes always fail.
    struct BrokenStore(MemoryStore);

    impl ActivityStore for BrokenStore {
        fn fetch_activities_by_unit(
            &self,
            unit_id: &str,
        ) -> Result<Vec<ActivityRecord>, InfrastructureError> {
            self.0.fetch_activities_by_unit(unit_id)
        }
        fn fetch_all_activities(&self) -> Result<Vec<ActivityRecord>, InfrastructureError> {
            self.0.fetch_all_activities()
        }
        fn fetch_activity(&self, id: &str) -> Result<Option<ActivityRecord>, InfrastructureError> {
            self.0.fetch_activity(id)
        }
        fn fetch_all_units(&self) -> Result<Vec<OrganizationalUnit>, InfrastructureError> {
            self.0.fetch_all_units()
        }
        fn fetch_unit(&self, id: &str) -> Result<Option<OrganizationalUnit>, InfrastructureError> {
            self.0.fetch_unit(id)
        }
        fn save_unit(&mut self, _: &OrganizationalUnit) -> Result<(), InfrastructureError> {
            Err(InfrastructureError::Corrupt("read-only".into()))
        }
        fn save(&mut self, _: &ActivityRecord) -> Result<(), InfrastructureError> {
            Err(InfrastructureError::Corrupt("read-only".into()))
        }
        fn remove(&mut self, _: &str) -> Result<bool, InfrastructureError> {
            Err(InfrastructureError::Corrupt("read-only".into()))
        }
    }

    /// Upload sink whose purge fails for every file.
    struct StuckUploads(MemoryUploads);

    impl UploadStore for StuckUploads {
        fn store(&mut self, upload: &ImageUpload) -> Result<ImageAttachment, InfrastructureError> {
            self.0.store(upload)
        }
        fn purge(&mut self, _: &[ImageAttachment]) -> Result<usize, InfrastructureError> {
            Err(std::io::Error::other("disk").into())
        }
    }

    #[test]
    fn delete_commits_even_when_purge_fails() {
        let mut svc = ActivityService::new(
            MemoryStore::with_units([unit("u1")]),
            StuckUploads(MemoryUploads::new()),
            FixedClock::on(today()),
        );
        let staff = Actor::staff("s1", "Sam", "u1");
        let mut raw = input("Fair");
        raw.images = vec![png("a.png"), png("b.png")];
        let record = svc.create(&staff, raw).unwrap();

        let outcome = svc.delete(&staff, &record.id).unwrap();
        assert_eq!(outcome.images_removed, 0);
        assert_eq!(outcome.images_failed, 2);
        assert!(svc.store().is_empty());

        let err = svc.delete(&staff, &record.id).unwrap_err();
        assert!(matches!(err, AgendaError::NotFound(_)));
    }

    #[test]
    fn failed_save_purges_uploaded_images() {
        let mut svc = ActivityService::new(
            BrokenStore(MemoryStore::with_units([unit("u1")])),
            MemoryUploads::new(),
            FixedClock::on(today()),
        );
        let mut raw = input("Fair");
        raw.images = vec![png("a.png")];

        let err = svc.create(&Actor::staff("s1", "Sam", "u1"), raw).unwrap_err();
        assert!(matches!(err, AgendaError::Infrastructure(_)));
        assert!(svc.uploads().is_empty());
    }
}
