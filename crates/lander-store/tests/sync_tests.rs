//! Integration tests for snapshot directory sync

use lander_core::errors::ExErrorKind;
use lander_core::model::{NewVariant, VariantStatus};
use lander_store::repo::{SectionRepo, VariantRepo};
use lander_store::{export_snapshot, run_sync, ApplyMode, MissingPolicy, SyncOptions};
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn setup_test_db() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    lander_store::migrations::apply_migrations(&mut conn).unwrap();
    conn
}

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/snapshots")
}

fn options(dir: PathBuf) -> SyncOptions {
    SyncOptions {
        snapshot_dir: dir,
        ..SyncOptions::default()
    }
}

fn create(conn: &mut Connection, slug: &str) {
    let mut axes = BTreeMap::new();
    axes.insert("tone".to_string(), "technical".to_string());
    VariantRepo::create(
        conn,
        &NewVariant {
            slug: slug.to_string(),
            name: slug.to_string(),
            description: None,
            weight: 5,
            axes,
        },
    )
    .unwrap();
}

#[test]
fn test_sync_creates_variants_from_fixtures() {
    let mut conn = setup_test_db();

    let report = run_sync(&mut conn, &options(fixtures())).unwrap();
    assert_eq!(report.created, vec!["autumn", "spring"]);
    assert!(report.updated.is_empty());

    let autumn = export_snapshot(&conn, "autumn").unwrap();
    let got: Vec<(String, i64, Option<bool>)> = autumn
        .sections
        .iter()
        .map(|s| (s.section_type.clone(), s.order, s.enabled))
        .collect();
    assert_eq!(
        got,
        vec![
            ("hero".to_string(), 1, Some(true)),
            ("testimonials".to_string(), 2, Some(false)),
            ("video".to_string(), 3, Some(true)),
        ]
    );

    let spring = VariantRepo::get_by_slug(&conn, "spring").unwrap();
    assert_eq!(spring.weight, 60);
    assert_eq!(spring.seo_config["title"], "Spring Launch");
    assert_eq!(
        spring.header_config.cta.map(|c| c.label),
        Some("Start free trial".to_string())
    );
}

#[test]
fn test_second_sync_updates_without_change() {
    let mut conn = setup_test_db();
    run_sync(&mut conn, &options(fixtures())).unwrap();
    let before = export_snapshot(&conn, "spring").unwrap();

    let report = run_sync(&mut conn, &options(fixtures())).unwrap();
    assert_eq!(report.updated, vec!["autumn", "spring"]);
    assert!(report.created.is_empty());
    assert_eq!(export_snapshot(&conn, "spring").unwrap(), before);
}

#[test]
fn test_content_only_keeps_metadata() {
    let mut conn = setup_test_db();
    run_sync(&mut conn, &options(fixtures())).unwrap();
    VariantRepo::update(
        &mut conn,
        "spring",
        &lander_core::model::VariantPatch {
            weight: Some(1),
            ..Default::default()
        },
    )
    .unwrap();

    let opts = SyncOptions {
        apply_mode: ApplyMode::ContentOnly,
        ..options(fixtures())
    };
    run_sync(&mut conn, &opts).unwrap();

    let spring = VariantRepo::get_by_slug(&conn, "spring").unwrap();
    assert_eq!(spring.weight, 1);
    assert_eq!(SectionRepo::list(&conn, &spring.id).unwrap().len(), 4);
}

#[test]
fn test_missing_policy_archive_and_delete() {
    let mut conn = setup_test_db();
    create(&mut conn, "legacy");
    create(&mut conn, "older");
    VariantRepo::archive(&conn, "older").unwrap();

    let opts = SyncOptions {
        missing_policy: MissingPolicy::Archive,
        ..options(fixtures())
    };
    let report = run_sync(&mut conn, &opts).unwrap();
    assert_eq!(report.archived, vec!["legacy"]);
    assert_eq!(
        VariantRepo::get_by_slug(&conn, "legacy").unwrap().status,
        VariantStatus::Archived
    );

    let opts = SyncOptions {
        missing_policy: MissingPolicy::Delete,
        ..options(fixtures())
    };
    let report = run_sync(&mut conn, &opts).unwrap();
    assert_eq!(report.deleted, vec!["legacy", "older"]);
    assert!(VariantRepo::get_by_slug(&conn, "older").unwrap().is_deleted());
    assert!(!VariantRepo::get_by_slug(&conn, "spring").unwrap().is_deleted());
}

#[test]
fn test_absent_directory_never_prunes() {
    let mut conn = setup_test_db();
    create(&mut conn, "live-a");
    create(&mut conn, "live-b");
    let dir = TempDir::new().unwrap();

    for policy in [MissingPolicy::Archive, MissingPolicy::Delete] {
        let opts = SyncOptions {
            missing_policy: policy,
            ..options(dir.path().join("typo"))
        };
        let report = run_sync(&mut conn, &opts).unwrap();
        assert!(report.is_noop());
    }

    let listed = VariantRepo::list(&conn, None).unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|v| v.status == VariantStatus::Active));
}

#[test]
fn test_tombstones_skipped_unless_resurrect() {
    let mut conn = setup_test_db();
    run_sync(&mut conn, &options(fixtures())).unwrap();
    VariantRepo::delete(&conn, "spring").unwrap();

    let report = run_sync(&mut conn, &options(fixtures())).unwrap();
    assert_eq!(report.skipped, vec!["spring"]);
    assert!(VariantRepo::get_by_slug(&conn, "spring").unwrap().is_deleted());

    let opts = SyncOptions {
        allow_resurrect: true,
        ..options(fixtures())
    };
    let report = run_sync(&mut conn, &opts).unwrap();
    assert_eq!(report.resurrected, vec!["spring"]);
    assert_eq!(
        VariantRepo::get_by_slug(&conn, "spring").unwrap().status,
        VariantStatus::Active
    );
}

#[test]
fn test_invalid_snapshot_aborts_whole_sync() {
    let mut conn = setup_test_db();
    let dir = TempDir::new().unwrap();
    fs::copy(fixtures().join("spring.json"), dir.path().join("spring.json")).unwrap();
    fs::write(
        dir.path().join("winter.json"),
        r#"{"variant": {"name": "Winter", "weight": 500, "axes": {"tone": "bold"}}}"#,
    )
    .unwrap();

    let err = run_sync(&mut conn, &options(dir.path().to_path_buf())).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(err.field(), Some("weight"));
    assert!(VariantRepo::list(&conn, None).unwrap().is_empty());
}

#[test]
fn test_required_flag() {
    let mut conn = setup_test_db();
    let dir = TempDir::new().unwrap();

    let relaxed = run_sync(&mut conn, &options(dir.path().join("absent"))).unwrap();
    assert!(relaxed.is_noop());

    let opts = SyncOptions {
        required: true,
        ..options(dir.path().join("absent"))
    };
    assert_eq!(
        run_sync(&mut conn, &opts).unwrap_err().kind(),
        ExErrorKind::NotFound
    );

    let opts = SyncOptions {
        required: true,
        ..options(dir.path().to_path_buf())
    };
    assert_eq!(
        run_sync(&mut conn, &opts).unwrap_err().kind(),
        ExErrorKind::InvalidInput
    );
}
