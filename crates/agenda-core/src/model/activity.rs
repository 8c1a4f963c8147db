use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{ParseEnumError, RoleKind, normalize};

/// The three activity states.
///
/// Any state may be set from any other; the only guard on a transition is
/// the creator check in [`crate::lifecycle::set_status`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" | "doing" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

/// A stored image reference attached to an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub url: String,
    pub original_filename: String,
}

/// Raw image submitted with a creation request, before upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub original_filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("original_filename", &self.original_filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Creation input as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewActivity {
    pub title: String,
    pub activity_type: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub images: Vec<ImageUpload>,
    /// Explicit target unit. Only honored for super-administrators.
    pub unit_id: Option<String>,
}

/// The central activity entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: String,
    pub title: String,
    pub activity_type: String,
    pub description: Option<String>,
    /// Required for new records; imported legacy rows may lack it and are
    /// reported under the "no date" bucket.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub unit_id: String,
    pub created_by_id: String,
    pub created_by_name: String,
    pub created_by_role: RoleKind,
    pub status: Status,
    pub images: Vec<ImageAttachment>,
    pub created_at: DateTime<Utc>,
}
