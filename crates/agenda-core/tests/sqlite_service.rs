//! Service round trips against the SQLite store and on-disk uploads.

use agenda_core::clock::FixedClock;
use agenda_core::config::{ProjectConfig, load_project_config};
use agenda_core::model::ImageUpload;
use agenda_core::store::{ActivityStore, LocalUploads, SqliteStore};
use agenda_core::{ActivityService, Actor, AgendaError, ErrorCode, NewActivity, Status};
use chrono::NaiveDate;
use tempfile::TempDir;

type Service = ActivityService<SqliteStore, LocalUploads, FixedClock>;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 7).expect("valid date")
}

fn open(dir: &TempDir, config: &ProjectConfig) -> Service {
    let store = SqliteStore::open(&config.storage.database_path(dir.path())).expect("open store");
    let uploads = LocalUploads::new(config.storage.uploads_dir(dir.path()));
    ActivityService::new(store, uploads, FixedClock::on(today())).with_config(config)
}

fn input(title: &str) -> NewActivity {
    NewActivity {
        title: title.into(),
        activity_type: "workshop".into(),
        description: Some("Two hour session".into()),
        start_date: Some(today()),
        end_date: NaiveDate::from_ymd_opt(2025, 4, 8),
        ..NewActivity::default()
    }
}

fn png() -> ImageUpload {
    ImageUpload {
        original_filename: "poster.png".into(),
        content_type: "image/png".into(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

#[test]
fn records_survive_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = ProjectConfig::default();
    let root = Actor::super_admin("root", "Root");
    let staff_unit;
    let id;

    {
        let mut svc = open(&dir, &config);
        let unit = svc.create_unit(&root, "Culture").expect("unit");
        staff_unit = unit.id.clone();
        let staff = Actor::staff("s1", "Sam", &staff_unit);

        let mut raw = input("Pottery");
        raw.images = vec![png()];
        let record = svc.create(&staff, raw).expect("create");
        svc.update_status(&staff, &record.id, Status::InProgress)
            .expect("status");
        id = record.id;
    }

    let svc = open(&dir, &config);
    let stored = svc
        .store()
        .fetch_activity(&id)
        .expect("fetch")
        .expect("present");
    assert_eq!(stored.status, Status::InProgress);
    assert_eq!(stored.unit_id, staff_unit);
    assert_eq!(stored.images.len(), 1);
    assert_eq!(stored.end_date, NaiveDate::from_ymd_opt(2025, 4, 8));

    let path = svc
        .uploads()
        .path_of(&stored.images[0].url)
        .expect("local path");
    assert!(path.exists());
}

#[test]
fn delete_removes_row_and_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = ProjectConfig::default();
    let mut svc = open(&dir, &config);
    let root = Actor::super_admin("root", "Root");
    let unit = svc.create_unit(&root, "Finance").expect("unit");
    let staff = Actor::staff("s1", "Sam", &unit.id);

    let mut raw = input("Budget review");
    raw.images = vec![png(), png()];
    let record = svc.create(&staff, raw).expect("create");
    let paths: Vec<_> = record
        .images
        .iter()
        .map(|image| svc.uploads().path_of(&image.url).expect("path"))
        .collect();

    let outcome = svc.delete(&staff, &record.id).expect("delete");
    assert_eq!(outcome.images_removed, 2);
    assert!(paths.iter().all(|path| !path.exists()));
    assert!(svc.store().fetch_activity(&record.id).expect("fetch").is_none());
}

#[test]
fn staff_of_unknown_unit_cannot_create() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut svc = open(&dir, &ProjectConfig::default());

    let err = svc
        .create(&Actor::staff("s1", "Sam", "missing"), input("Orphan"))
        .expect_err("unit must exist");
    assert_eq!(err.code(), ErrorCode::UnitNotFound);
}

#[test]
fn project_config_tightens_limits() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::create_dir_all(dir.path().join(".agenda")).expect("mkdir");
    std::fs::write(
        dir.path().join(".agenda/config.toml"),
        "[policy]\nmax_images = 1\nmax_description_words = 2\n",
    )
    .expect("write config");
    let config = load_project_config(dir.path()).expect("config");

    let mut svc = open(&dir, &config);
    let unit = svc
        .create_unit(&Actor::super_admin("root", "Root"), "Sports")
        .expect("unit");
    let staff = Actor::staff("s1", "Sam", &unit.id);

    let mut raw = input("Relay");
    raw.description = Some("three words here".into());
    let err = svc.create(&staff, raw).expect_err("description too long");
    assert!(matches!(err, AgendaError::Validation(_)));

    let mut raw = input("Relay");
    raw.images = vec![png(), png()];
    let err = svc.create(&staff, raw).expect_err("too many images");
    assert_eq!(err.code(), ErrorCode::ImageRejected);

    let uploads_dir = config.storage.uploads_dir(dir.path());
    let stored_files = std::fs::read_dir(&uploads_dir).map_or(0, Iterator::count);
    assert_eq!(stored_files, 0);
}
