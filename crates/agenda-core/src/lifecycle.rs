//! Status transitions.
//!
//! The three states form an unordered set: any state may be set from any
//! other, including `completed -> pending`. The single guard is the creator
//! check from [`crate::policy`].

use tracing::debug;

use crate::error::AuthError;
use crate::model::{ActivityRecord, Actor, Status};
use crate::policy;

/// Set `record.status` to `new_status` on behalf of `actor`.
///
/// Setting the current status again passes the same guard and returns an
/// equal copy. Callers compare statuses to skip persisting a no-op.
///
/// # Errors
///
/// [`AuthError`] (`NotCreator`) when `actor` did not create the record. The
/// input record is not touched in that case.
pub fn set_status(
    record: &ActivityRecord,
    new_status: Status,
    actor: &Actor,
) -> Result<ActivityRecord, AuthError> {
    policy::require_mutate_status(actor, record)?;

    debug!(
        id = %record.id,
        from = %record.status,
        to = %new_status,
        "status transition"
    );

    let mut updated = record.clone();
    updated.status = new_status;
    Ok(updated)
}
