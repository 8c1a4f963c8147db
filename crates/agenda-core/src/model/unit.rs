use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An organizational unit (directorate) that owns activities.
///
/// Only the name may change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationalUnit {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
