//! Authorization rules: who may create, mutate, delete or see which record.
//!
//! Every layer that exposes or changes a record asks this module first. The
//! boolean predicates are the source of truth; the `require_*` helpers turn a
//! `false` into the matching [`AuthError`].

use crate::error::{Action, AuthError};
use crate::model::{ActivityRecord, Actor};

/// Activities are filed by staff and managers under their own unit. The
/// super-administrator has no unit and cannot create.
#[must_use]
pub fn can_create(actor: &Actor) -> bool {
    actor.unit_id().is_some()
}

/// Only the creator may change an activity's status. Unit managers and the
/// super-administrator cannot override it.
#[must_use]
pub fn can_mutate_status(actor: &Actor, record: &ActivityRecord) -> bool {
    actor.id == record.created_by_id
}

/// The creator may delete their activity; the super-administrator may delete
/// any activity.
#[must_use]
pub fn can_delete(actor: &Actor, record: &ActivityRecord) -> bool {
    actor.id == record.created_by_id || actor.is_super_admin()
}

/// Managers and staff see their own unit only; the super-administrator sees
/// every unit.
#[must_use]
pub fn can_view(actor: &Actor, record: &ActivityRecord) -> bool {
    can_view_unit(actor, &record.unit_id)
}

/// Unit-level form of [`can_view`], used at the query boundary.
#[must_use]
pub fn can_view_unit(actor: &Actor, unit_id: &str) -> bool {
    actor.is_super_admin() || actor.unit_id() == Some(unit_id)
}

/// Cross-unit listings are reserved to the super-administrator.
#[must_use]
pub const fn can_view_all_units(actor: &Actor) -> bool {
    actor.is_super_admin()
}

/// Creating, renaming and listing units is reserved to the super-administrator.
#[must_use]
pub const fn can_manage_units(actor: &Actor) -> bool {
    actor.is_super_admin()
}

/// Returns the unit a new activity by `actor` is filed under.
///
/// # Errors
///
/// [`AuthError`] with kind `NotPermitted` when `actor` has no unit.
pub fn require_create(actor: &Actor) -> Result<&str, AuthError> {
    actor
        .unit_id()
        .ok_or(AuthError::not_permitted(Action::Create))
}

/// # Errors
///
/// [`AuthError`] with kind `NotCreator` when `actor` did not create `record`.
pub fn require_mutate_status(actor: &Actor, record: &ActivityRecord) -> Result<(), AuthError> {
    if can_mutate_status(actor, record) {
        Ok(())
    } else {
        Err(AuthError::not_creator(Action::UpdateStatus))
    }
}

/// # Errors
///
/// [`AuthError`] with kind `NotCreator` when `actor` is neither the creator
/// nor the super-administrator.
pub fn require_delete(actor: &Actor, record: &ActivityRecord) -> Result<(), AuthError> {
    if can_delete(actor, record) {
        Ok(())
    } else {
        Err(AuthError::not_creator(Action::Delete))
    }
}

/// # Errors
///
/// [`AuthError`] with kind `NotPermitted` when `unit_id` is outside the
/// actor's read scope.
pub fn require_view_unit(actor: &Actor, unit_id: &str) -> Result<(), AuthError> {
    if can_view_unit(actor, unit_id) {
        Ok(())
    } else {
        Err(AuthError::not_permitted(Action::View))
    }
}

/// # Errors
///
/// [`AuthError`] with kind `NotPermitted` unless `actor` is the
/// super-administrator.
pub const fn require_view_all_units(actor: &Actor) -> Result<(), AuthError> {
    if can_view_all_units(actor) {
        Ok(())
    } else {
        Err(AuthError::not_permitted(Action::View))
    }
}

/// # Errors
///
/// [`AuthError`] with kind `NotPermitted` unless `actor` is the
/// super-administrator.
pub const fn require_manage_units(actor: &Actor) -> Result<(), AuthError> {
    if can_manage_units(actor) {
        Ok(())
    } else {
        Err(AuthError::not_permitted(Action::ManageUnits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthErrorKind;
    use crate::model::{RoleKind, Status};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn record_by(creator: &str, unit: &str) -> ActivityRecord {
        ActivityRecord {
            id: "a-1".into(),
            title: "Open day".into(),
            activity_type: "event".into(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 4),
            end_date: None,
            unit_id: unit.into(),
            created_by_id: creator.into(),
            created_by_name: "Ana".into(),
            created_by_role: RoleKind::Staff,
            status: Status::Pending,
            images: vec![],
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn only_unit_members_create() {
        assert!(can_create(&Actor::staff("staff-a", "Ana", "u-1")));
        assert!(can_create(&Actor::manager("mgr", "Mo", "u-1")));
        assert!(!can_create(&Actor::super_admin("root", "Root")));

        assert_eq!(require_create(&Actor::manager("mgr", "Mo", "u-1")), Ok("u-1"));
        let err = require_create(&Actor::super_admin("root", "Root")).unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::NotPermitted);
        assert_eq!(err.action, Action::Create);
    }

    #[test]
    fn only_creator_mutates_status() {
        let record = record_by("staff-a", "u-1");
        assert!(can_mutate_status(&Actor::staff("staff-a", "Ana", "u-1"), &record));
        assert!(!can_mutate_status(&Actor::manager("mgr", "Mo", "u-1"), &record));
        assert!(!can_mutate_status(&Actor::super_admin("root", "Root"), &record));
        assert!(!can_mutate_status(&Actor::staff("staff-b", "Bo", "u-1"), &record));
    }

    #[test]
    fn creator_mutation_ignores_unit() {
        // A creator moved to another unit still owns the record.
        let record = record_by("staff-a", "u-1");
        assert!(can_mutate_status(&Actor::staff("staff-a", "Ana", "u-2"), &record));
    }

    #[test]
    fn delete_allows_creator_and_super_admin() {
        let record = record_by("staff-b", "u-1");
        assert!(can_delete(&Actor::staff("staff-b", "Bo", "u-1"), &record));
        assert!(can_delete(&Actor::super_admin("root", "Root"), &record));
        assert!(!can_delete(&Actor::manager("mgr", "Mo", "u-1"), &record));
        assert!(!can_delete(&Actor::staff("staff-c", "Cy", "u-1"), &record));
    }

    #[test]
    fn view_is_unit_scoped_except_for_super_admin() {
        let record = record_by("staff-a", "u-1");
        assert!(can_view(&Actor::manager("mgr", "Mo", "u-1"), &record));
        assert!(can_view(&Actor::staff("staff-z", "Zed", "u-1"), &record));
        assert!(!can_view(&Actor::manager("mgr2", "Max", "u-2"), &record));
        assert!(can_view(&Actor::super_admin("root", "Root"), &record));
    }

    #[test]
    fn require_helpers_report_kind_and_action() {
        let record = record_by("staff-a", "u-1");
        let manager = Actor::manager("mgr", "Mo", "u-1");

        let err = require_mutate_status(&manager, &record).unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::NotCreator);
        assert_eq!(err.action, Action::UpdateStatus);

        let err = require_manage_units(&manager).unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::NotPermitted);

        assert!(require_view_all_units(&manager).is_err());
        assert!(require_view_all_units(&Actor::super_admin("root", "Root")).is_ok());

        let err = require_view_unit(&manager, "u-9").unwrap_err();
        assert_eq!(err.action, Action::View);

        assert!(require_delete(&Actor::super_admin("root", "Root"), &record).is_ok());
    }
}
