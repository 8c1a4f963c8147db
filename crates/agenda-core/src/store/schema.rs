//! SQLite schema for units, activities and their image lists.
//!
//! - `units` owns activities; deleting a referenced unit is refused
//! - `activities` keeps creator identity denormalized, dates as ISO text
//! - `activity_images` keeps attachment order via `position` and is removed
//!   with its activity

/// Migration v1: base tables.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS units (
    unit_id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS activities (
    activity_id TEXT PRIMARY KEY,
    title TEXT NOT NULL CHECK (length(trim(title)) > 0),
    activity_type TEXT NOT NULL CHECK (length(trim(activity_type)) > 0),
    description TEXT,
    start_date TEXT,
    end_date TEXT,
    unit_id TEXT NOT NULL REFERENCES units(unit_id) ON DELETE RESTRICT,
    created_by_id TEXT NOT NULL,
    created_by_name TEXT NOT NULL,
    created_by_role TEXT NOT NULL
        CHECK (created_by_role IN ('super_admin', 'manager', 'staff')),
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'in_progress', 'completed')),
    created_at_us INTEGER NOT NULL,
    CHECK (end_date IS NULL OR start_date IS NULL OR end_date >= start_date)
);

CREATE TABLE IF NOT EXISTS activity_images (
    activity_id TEXT NOT NULL REFERENCES activities(activity_id) ON DELETE CASCADE,
    position INTEGER NOT NULL CHECK (position >= 0),
    url TEXT NOT NULL,
    original_filename TEXT NOT NULL,
    PRIMARY KEY (activity_id, position)
);
";

/// Migration v2: lookup indexes for the unit and creator read paths.
pub const MIGRATION_V2_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_activities_unit ON activities(unit_id);
CREATE INDEX IF NOT EXISTS idx_activities_creator ON activities(created_by_id);
CREATE INDEX IF NOT EXISTS idx_activities_start_date ON activities(start_date);
";

/// Indexes the latest schema is expected to carry.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_activities_unit",
    "idx_activities_creator",
    "idx_activities_start_date",
];
