use std::fmt;
use std::io;

use chrono::NaiveDate;

/// Machine-readable error codes for presentation layers and scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    InvalidField,
    DateOutOfRange,
    ImageRejected,
    NotCreator,
    NotPermitted,
    ActivityNotFound,
    UnitNotFound,
    StorageFailed,
    UploadFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::InvalidField => "E2001",
            Self::DateOutOfRange => "E2002",
            Self::ImageRejected => "E2003",
            Self::NotCreator => "E3001",
            Self::NotPermitted => "E3002",
            Self::ActivityNotFound => "E4001",
            Self::UnitNotFound => "E4002",
            Self::StorageFailed => "E5001",
            Self::UploadFailed => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Project not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidField => "Invalid activity field",
            Self::DateOutOfRange => "Start date outside the allowed window",
            Self::ImageRejected => "Image attachment rejected",
            Self::NotCreator => "Only the creator may change this activity",
            Self::NotPermitted => "Action not permitted for this role",
            Self::ActivityNotFound => "Activity not found",
            Self::UnitNotFound => "Unit not found",
            Self::StorageFailed => "Storage operation failed",
            Self::UploadFailed => "Upload storage operation failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to users.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `agenda init` to initialize this directory."),
            Self::ConfigParseError => Some("Fix syntax in .agenda/config.toml and retry."),
            Self::InvalidField => Some("Correct the named field and submit again."),
            Self::DateOutOfRange => {
                Some("Start dates may be at most 14 days in the past and one year ahead.")
            }
            Self::ImageRejected => Some("Attach at most 5 images of up to 5 MB each."),
            Self::NotCreator => Some("Ask the activity's creator to change its status."),
            Self::NotPermitted => Some("Sign in with a role that owns this action."),
            Self::ActivityNotFound | Self::UnitNotFound => None,
            Self::StorageFailed => Some("Check that the database file is writable."),
            Self::UploadFailed => Some("Check disk space and write permissions for uploads."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Input field named by a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    ActivityType,
    StartDate,
    EndDate,
    Description,
    Images,
    Unit,
    UnitName,
}

impl Field {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::ActivityType => "activity_type",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::Description => "description",
            Self::Images => "images",
            Self::Unit => "unit",
            Self::UnitName => "unit_name",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The specific constraint a rejected input violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationKind {
    TitleEmpty,
    ActivityTypeEmpty,
    ActivityTypeTooLong { max: usize, chars: usize },
    StartDateMissing,
    DateOutOfRange {
        date: NaiveDate,
        earliest: NaiveDate,
        latest: NaiveDate,
    },
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    DescriptionTooLong { max: usize, words: usize },
    TooManyImages { max: usize, count: usize },
    ImageTooLarge {
        filename: String,
        max_bytes: usize,
        bytes: usize,
    },
    InvalidImageType {
        filename: String,
        content_type: String,
    },
    UnitOverride,
    NameEmpty,
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TitleEmpty => f.write_str("title must not be empty"),
            Self::ActivityTypeEmpty => f.write_str("activity type must not be empty"),
            Self::ActivityTypeTooLong { max, chars } => {
                write!(f, "activity type has {chars} characters (max {max})")
            }
            Self::StartDateMissing => f.write_str("start date is required"),
            Self::DateOutOfRange {
                date,
                earliest,
                latest,
            } => write!(f, "{date} is outside the window {earliest}..={latest}"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "end date {end} is before start date {start}")
            }
            Self::DescriptionTooLong { max, words } => {
                write!(f, "description has {words} words (max {max})")
            }
            Self::TooManyImages { max, count } => {
                write!(f, "{count} images attached (max {max})")
            }
            Self::ImageTooLarge {
                filename,
                max_bytes,
                bytes,
            } => write!(f, "image '{filename}' is {bytes} bytes (max {max_bytes})"),
            Self::InvalidImageType {
                filename,
                content_type,
            } => write!(f, "'{filename}' has non-image content type '{content_type}'"),
            Self::UnitOverride => f.write_str("activities are always filed under the creator's unit"),
            Self::NameEmpty => f.write_str("name must not be empty"),
        }
    }
}

/// Rejected input, naming the offending field and violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {kind}")]
pub struct ValidationError {
    pub field: Field,
    pub kind: ValidationKind,
}

impl ValidationError {
    #[must_use]
    pub const fn new(field: Field, kind: ValidationKind) -> Self {
        Self { field, kind }
    }

    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self.kind {
            ValidationKind::DateOutOfRange { .. } => ErrorCode::DateOutOfRange,
            ValidationKind::TooManyImages { .. }
            | ValidationKind::ImageTooLarge { .. }
            | ValidationKind::InvalidImageType { .. } => ErrorCode::ImageRejected,
            _ => ErrorCode::InvalidField,
        }
    }
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

/// Mutation or read an actor attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    UpdateStatus,
    Delete,
    View,
    ManageUnits,
}

impl Action {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create activity",
            Self::UpdateStatus => "update status",
            Self::Delete => "delete activity",
            Self::View => "view activities",
            Self::ManageUnits => "manage units",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an authorization check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    NotCreator,
    NotPermitted,
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotCreator => "not the creator",
            Self::NotPermitted => "not permitted",
        })
    }
}

/// An actor tried something the authorization policy forbids.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: cannot {action}")]
pub struct AuthError {
    pub action: Action,
    pub kind: AuthErrorKind,
}

impl AuthError {
    #[must_use]
    pub const fn not_creator(action: Action) -> Self {
        Self {
            action,
            kind: AuthErrorKind::NotCreator,
        }
    }

    #[must_use]
    pub const fn not_permitted(action: Action) -> Self {
        Self {
            action,
            kind: AuthErrorKind::NotPermitted,
        }
    }

    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self.kind {
            AuthErrorKind::NotCreator => ErrorCode::NotCreator,
            AuthErrorKind::NotPermitted => ErrorCode::NotPermitted,
        }
    }
}

// ---------------------------------------------------------------------------
// Lookup and infrastructure
// ---------------------------------------------------------------------------

/// Kind of record a lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Activity,
    Unit,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Activity => "activity",
            Self::Unit => "unit",
        })
    }
}

/// A referenced record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} '{id}' not found")]
pub struct NotFoundError {
    pub entity: Entity,
    pub id: String,
}

impl NotFoundError {
    pub fn activity(id: impl Into<String>) -> Self {
        Self {
            entity: Entity::Activity,
            id: id.into(),
        }
    }

    pub fn unit(id: impl Into<String>) -> Self {
        Self {
            entity: Entity::Unit,
            id: id.into(),
        }
    }

    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self.entity {
            Entity::Activity => ErrorCode::ActivityNotFound,
            Entity::Unit => ErrorCode::UnitNotFound,
        }
    }
}

/// Failures reported by the persistence or upload collaborators.
///
/// These are propagated unchanged; the core never retries them.
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// SQLite error from the persistence layer.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Filesystem error from the upload layer.
    #[error("upload I/O error: {0}")]
    Upload(#[from] io::Error),

    /// A stored row could not be decoded into a record.
    #[error("corrupt stored record: {0}")]
    Corrupt(String),
}

impl InfrastructureError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Storage(_) | Self::Corrupt(_) => ErrorCode::StorageFailed,
            Self::Upload(_) => ErrorCode::UploadFailed,
        }
    }
}

/// Every failure an [`crate::ActivityService`] call can report.
#[derive(Debug, thiserror::Error)]
pub enum AgendaError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

impl AgendaError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(e) => e.code(),
            Self::Auth(e) => e.code(),
            Self::NotFound(e) => e.code(),
            Self::Infrastructure(e) => e.code(),
        }
    }

    /// Optional remediation hint for users and scripts.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}
