use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{ParseEnumError, normalize};

/// Role tag without the unit scope, as denormalized onto activity records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    SuperAdmin,
    Manager,
    Staff,
}

impl RoleKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "super_admin" | "superadmin" | "admin" => Ok(Self::SuperAdmin),
            "manager" | "directivo" => Ok(Self::Manager),
            "staff" | "personal" => Ok(Self::Staff),
            _ => Err(ParseEnumError {
                expected: "role",
                got: s.to_string(),
            }),
        }
    }
}

/// Role of an authenticated actor. Managers and staff belong to exactly one
/// unit; the super-administrator is unscoped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Manager { unit_id: String },
    Staff { unit_id: String },
}

impl Role {
    #[must_use]
    pub const fn kind(&self) -> RoleKind {
        match self {
            Self::SuperAdmin => RoleKind::SuperAdmin,
            Self::Manager { .. } => RoleKind::Manager,
            Self::Staff { .. } => RoleKind::Staff,
        }
    }

    #[must_use]
    pub fn unit_id(&self) -> Option<&str> {
        match self {
            Self::SuperAdmin => None,
            Self::Manager { unit_id } | Self::Staff { unit_id } => Some(unit_id),
        }
    }
}

/// Identity supplied by the authentication layer on every call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub display_name: String,
    #[serde(flatten)]
    pub role: Role,
}

impl Actor {
    pub fn super_admin(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            role: Role::SuperAdmin,
        }
    }

    pub fn manager(
        id: impl Into<String>,
        display_name: impl Into<String>,
        unit_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            role: Role::Manager {
                unit_id: unit_id.into(),
            },
        }
    }

    pub fn staff(
        id: impl Into<String>,
        display_name: impl Into<String>,
        unit_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            role: Role::Staff {
                unit_id: unit_id.into(),
            },
        }
    }

    #[must_use]
    pub fn unit_id(&self) -> Option<&str> {
        self.role.unit_id()
    }

    #[must_use]
    pub const fn is_super_admin(&self) -> bool {
        matches!(self.role, Role::SuperAdmin)
    }
}
