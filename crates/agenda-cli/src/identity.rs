//! Actor identity resolution for CLI commands.
//!
//! The resolution chain: `--actor` flag > `AGENDA_ACTOR` env. The value has
//! the form `id:role[:unit]`, where `role` is `super_admin`, `manager` or
//! `staff` and managers and staff must name their unit. The display name
//! comes from `--name` > `AGENDA_ACTOR_NAME` > the actor id.
//!
//! The core trusts whatever identity this module hands it.

use agenda_core::{Actor, RoleKind};
use std::env;

/// Errors from identity resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityError {
    /// Human-readable description.
    pub message: String,
    /// Machine error code.
    pub code: &'static str,
}

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for IdentityError {}

impl IdentityError {
    fn invalid(message: String) -> Self {
        Self {
            message,
            code: "invalid_actor",
        }
    }
}

/// Environment reader trait for dependency injection in tests.
trait EnvReader {
    fn get(&self, key: &str) -> Option<String>;
}

struct RealEnv;

impl EnvReader for RealEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.is_empty())
    }
}

fn non_empty(flag: Option<&str>) -> Option<String> {
    flag.filter(|v| !v.trim().is_empty()).map(str::to_string)
}

/// Parse `id:role[:unit]`.
fn parse_actor(raw: &str, display_name: Option<String>) -> Result<Actor, IdentityError> {
    let mut parts = raw.splitn(3, ':').map(str::trim);
    let id = parts.next().unwrap_or_default();
    let role = parts.next().unwrap_or_default();
    let unit = parts.next().filter(|u| !u.is_empty());

    if id.is_empty() || role.is_empty() {
        return Err(IdentityError::invalid(format!(
            "actor '{raw}' must look like id:role[:unit]"
        )));
    }
    let role: RoleKind = role
        .parse()
        .map_err(|e| IdentityError::invalid(format!("actor '{raw}': {e}")))?;
    let name = display_name.unwrap_or_else(|| id.to_string());

    match (role, unit) {
        (RoleKind::SuperAdmin, None) => Ok(Actor::super_admin(id, name)),
        (RoleKind::SuperAdmin, Some(_)) => Err(IdentityError::invalid(format!(
            "actor '{raw}': the super administrator is not scoped to a unit"
        ))),
        (RoleKind::Manager, Some(unit)) => Ok(Actor::manager(id, name, unit)),
        (RoleKind::Staff, Some(unit)) => Ok(Actor::staff(id, name, unit)),
        (RoleKind::Manager | RoleKind::Staff, None) => Err(IdentityError::invalid(format!(
            "actor '{raw}': role {role} requires a unit (id:{role}:unit)"
        ))),
    }
}

fn resolve_actor_with(
    actor_flag: Option<&str>,
    name_flag: Option<&str>,
    env: &dyn EnvReader,
) -> Result<Actor, IdentityError> {
    let raw = non_empty(actor_flag)
        .or_else(|| env.get("AGENDA_ACTOR"))
        .ok_or_else(|| IdentityError {
            message: "Actor identity required. Set --actor or AGENDA_ACTOR (id:role[:unit])."
                .to_string(),
            code: "missing_actor",
        })?;
    let name = non_empty(name_flag).or_else(|| env.get("AGENDA_ACTOR_NAME"));
    parse_actor(&raw, name)
}

/// Resolve the acting identity from flags and environment.
pub fn require_actor(
    actor_flag: Option<&str>,
    name_flag: Option<&str>,
) -> Result<Actor, IdentityError> {
    resolve_actor_with(actor_flag, name_flag, &RealEnv)
}
