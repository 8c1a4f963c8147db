//! [`ActivityStore`] on a SQLite database.
//!
//! Connection defaults:
//! - `journal_mode = WAL` so readers do not block the writer
//! - `busy_timeout = 5s` to ride out short lock contention
//! - `foreign_keys = ON` so activities must reference a stored unit

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use super::{ActivityStore, migrations};
use crate::error::InfrastructureError;
use crate::model::{ActivityRecord, ImageAttachment, OrganizationalUnit, RoleKind, Status};

/// Busy timeout applied to every connection.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const ACTIVITY_COLUMNS: &str = "activity_id, title, activity_type, description, start_date, \
     end_date, unit_id, created_by_id, created_by_name, created_by_role, status, created_at_us";

pub struct SqliteStore {
    conn: Connection,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl SqliteStore {
    /// Open (or create) the database at `path` and migrate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory, connection, pragmas or migrations
    /// fail.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create database directory {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("open database {}", path.display()))?;
        Self::from_connection(conn)
    }

    /// Private in-memory database, used by tests and one-shot runs.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot be initialised.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        configure_connection(&conn).context("configure sqlite pragmas")?;
        let version = migrations::migrate(&mut conn).context("apply schema migrations")?;
        debug!(version, "database ready");
        Ok(Self { conn })
    }

    fn query_activities(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<ActivityRecord>, InfrastructureError> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let rows = stmt
            .query_map(params, RawActivity::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|raw| {
                let images = self.images_of(&raw.activity_id)?;
                raw.into_record(images)
            })
            .collect()
    }

    fn images_of(&self, activity_id: &str) -> Result<Vec<ImageAttachment>, InfrastructureError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT url, original_filename FROM activity_images
             WHERE activity_id = ?1 ORDER BY position",
        )?;
        let images = stmt
            .query_map(params![activity_id], |row| {
                Ok(ImageAttachment {
                    url: row.get(0)?,
                    original_filename: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(images)
    }
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

/// Column values of one `activities` row before decoding.
struct RawActivity {
    activity_id: String,
    title: String,
    activity_type: String,
    description: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    unit_id: String,
    created_by_id: String,
    created_by_name: String,
    created_by_role: String,
    status: String,
    created_at_us: i64,
}

impl RawActivity {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            activity_id: row.get(0)?,
            title: row.get(1)?,
            activity_type: row.get(2)?,
            description: row.get(3)?,
            start_date: row.get(4)?,
            end_date: row.get(5)?,
            unit_id: row.get(6)?,
            created_by_id: row.get(7)?,
            created_by_name: row.get(8)?,
            created_by_role: row.get(9)?,
            status: row.get(10)?,
            created_at_us: row.get(11)?,
        })
    }

    fn into_record(
        self,
        images: Vec<ImageAttachment>,
    ) -> Result<ActivityRecord, InfrastructureError> {
        let id = self.activity_id;
        let corrupt = |what: &str, value: &str| {
            InfrastructureError::Corrupt(format!("activity {id}: bad {what} '{value}'"))
        };

        let start_date = parse_date(self.start_date.as_deref())
            .map_err(|v| corrupt("start_date", &v))?;
        let end_date =
            parse_date(self.end_date.as_deref()).map_err(|v| corrupt("end_date", &v))?;
        let created_by_role = RoleKind::from_str(&self.created_by_role)
            .map_err(|_| corrupt("created_by_role", &self.created_by_role))?;
        let status =
            Status::from_str(&self.status).map_err(|_| corrupt("status", &self.status))?;
        let created_at = from_micros(self.created_at_us)
            .ok_or_else(|| corrupt("created_at_us", &self.created_at_us.to_string()))?;

        Ok(ActivityRecord {
            id,
            title: self.title,
            activity_type: self.activity_type,
            description: self.description,
            start_date,
            end_date,
            unit_id: self.unit_id,
            created_by_id: self.created_by_id,
            created_by_name: self.created_by_name,
            created_by_role,
            status,
            images,
            created_at,
        })
    }
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, String> {
    value
        .map(|text| NaiveDate::from_str(text).map_err(|_| text.to_string()))
        .transpose()
}

fn from_micros(us: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros(us)
}

fn unit_from_row(row: &Row<'_>) -> rusqlite::Result<(String, String, i64)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn decode_unit((id, name, created_at_us): (String, String, i64)) -> Result<OrganizationalUnit, InfrastructureError> {
    let created_at = from_micros(created_at_us).ok_or_else(|| {
        InfrastructureError::Corrupt(format!("unit {id}: bad created_at_us '{created_at_us}'"))
    })?;
    Ok(OrganizationalUnit {
        id,
        name,
        created_at,
    })
}

impl ActivityStore for SqliteStore {
    fn fetch_activities_by_unit(
        &self,
        unit_id: &str,
    ) -> Result<Vec<ActivityRecord>, InfrastructureError> {
        let sql = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE unit_id = ?1 ORDER BY rowid"
        );
        self.query_activities(&sql, params![unit_id])
    }

    fn fetch_all_activities(&self) -> Result<Vec<ActivityRecord>, InfrastructureError> {
        let sql = format!("SELECT {ACTIVITY_COLUMNS} FROM activities ORDER BY rowid");
        self.query_activities(&sql, params![])
    }

    fn fetch_activity(&self, id: &str) -> Result<Option<ActivityRecord>, InfrastructureError> {
        let sql = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE activity_id = ?1");
        Ok(self.query_activities(&sql, params![id])?.into_iter().next())
    }

    fn fetch_all_units(&self) -> Result<Vec<OrganizationalUnit>, InfrastructureError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT unit_id, name, created_at_us FROM units ORDER BY rowid")?;
        let rows = stmt
            .query_map([], unit_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(decode_unit).collect()
    }

    fn fetch_unit(&self, id: &str) -> Result<Option<OrganizationalUnit>, InfrastructureError> {
        let row = self
            .conn
            .query_row(
                "SELECT unit_id, name, created_at_us FROM units WHERE unit_id = ?1",
                params![id],
                unit_from_row,
            )
            .optional()?;
        row.map(decode_unit).transpose()
    }

    fn save_unit(&mut self, unit: &OrganizationalUnit) -> Result<(), InfrastructureError> {
        self.conn.execute(
            "INSERT INTO units (unit_id, name, created_at_us) VALUES (?1, ?2, ?3)
             ON CONFLICT(unit_id) DO UPDATE SET name = excluded.name",
            params![unit.id, unit.name, unit.created_at.timestamp_micros()],
        )?;
        Ok(())
    }

    fn save(&mut self, record: &ActivityRecord) -> Result<(), InfrastructureError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO activities (
                activity_id, title, activity_type, description, start_date, end_date,
                unit_id, created_by_id, created_by_name, created_by_role, status,
                created_at_us
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
             ON CONFLICT(activity_id) DO UPDATE SET
                title = excluded.title,
                activity_type = excluded.activity_type,
                description = excluded.description,
                start_date = excluded.start_date,
                end_date = excluded.end_date,
                status = excluded.status",
            params![
                record.id,
                record.title,
                record.activity_type,
                record.description,
                record.start_date.map(|d| d.to_string()),
                record.end_date.map(|d| d.to_string()),
                record.unit_id,
                record.created_by_id,
                record.created_by_name,
                record.created_by_role.as_str(),
                record.status.as_str(),
                record.created_at.timestamp_micros(),
            ],
        )?;

        tx.execute(
            "DELETE FROM activity_images WHERE activity_id = ?1",
            params![record.id],
        )?;
        {
            let mut insert = tx.prepare_cached(
                "INSERT INTO activity_images (activity_id, position, url, original_filename)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (position, image) in (0_i64..).zip(&record.images) {
                insert.execute(params![
                    record.id,
                    position,
                    image.url,
                    image.original_filename
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<bool, InfrastructureError> {
        let removed = self
            .conn
            .execute("DELETE FROM activities WHERE activity_id = ?1", params![id])?;
        Ok(removed > 0)
    }
}
