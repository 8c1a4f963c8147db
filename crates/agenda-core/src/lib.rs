//! agenda-core library.
//!
//! Activity lifecycle, authorization and period reporting for institutional
//! activities owned by organizational units.
//!
//! # Conventions
//!
//! - **Errors**: domain failures are typed ([`error::AgendaError`]); config
//!   and file plumbing use `anyhow::Result`.
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `debug!`).
//! - **Purity**: [`period`], [`bucket`], [`stats`] and [`report`] are pure
//!   functions of their inputs. Only [`service`] talks to collaborators.

pub mod bucket;
pub mod clock;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod period;
pub mod policy;
pub mod report;
pub mod service;
pub mod stats;
pub mod store;
pub mod validate;

pub use error::{AgendaError, AuthError, ErrorCode, InfrastructureError, NotFoundError, ValidationError};
pub use model::{ActivityRecord, Actor, NewActivity, OrganizationalUnit, Role, RoleKind, Status};
pub use service::ActivityService;
