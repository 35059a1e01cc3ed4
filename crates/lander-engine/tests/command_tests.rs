//! Integration tests for the administrative commands
//!
//! Covers copy-on-create, boundary logging and the sync event.

use lander_core::errors::ExErrorKind;
use lander_core::logging_facility::init_test_capture;
use lander_core::model::{NewSection, NewVariant, SectionInput};
use lander_core::observability::RecordingObserver;
use lander_core_types::schema::{EVENT_SECTION_COPY_FAILED, EVENT_SYNC_APPLIED, FIELD_VARIANT_ID};
use lander_engine::commands::{section, snapshot, sync, variant};
use lander_engine::VariantSelector;
use lander_store::repo::SectionRepo;
use lander_store::{ImportOptions, SyncOptions};
use rusqlite::Connection;
use serde_json::json;
use std::collections::BTreeMap;

fn setup_test_db() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    lander_store::migrations::apply_migrations(&mut conn).unwrap();
    conn
}

fn new_variant(slug: &str) -> NewVariant {
    let mut axes = BTreeMap::new();
    axes.insert("layout".to_string(), "classic".to_string());
    NewVariant {
        slug: slug.to_string(),
        name: slug.to_string(),
        description: None,
        weight: 20,
        axes,
    }
}

fn hero(order: i64) -> SectionInput {
    SectionInput {
        section_type: "hero".to_string(),
        content: json!({"title": "Welcome"}),
        order,
        enabled: None,
    }
}

#[test]
fn test_create_copies_sections_from_source() {
    let mut conn = setup_test_db();
    let observer = RecordingObserver::new();
    variant::variant_create(&mut conn, &new_variant("control"), None, &observer).unwrap();
    section::sections_replace(&mut conn, "control", &[hero(1)]).unwrap();

    let created =
        variant::variant_create(&mut conn, &new_variant("challenger"), Some("control"), &observer)
            .unwrap();

    assert_eq!(created.copied_sections, 1);
    let copies = SectionRepo::list(&conn, &created.variant.id).unwrap();
    assert_eq!(copies.len(), 1);
    assert_eq!(copies[0].section_type, "hero");
    assert!(observer.events().is_empty());
}

#[test]
fn test_copy_failure_is_not_fatal() {
    let mut conn = setup_test_db();
    let observer = RecordingObserver::new();

    let created =
        variant::variant_create(&mut conn, &new_variant("orphan"), Some("missing"), &observer)
            .unwrap();

    assert_eq!(created.copied_sections, 0);
    assert_eq!(variant::variant_get(&conn, "orphan").unwrap().id, created.variant.id);
    let events = observer.events_named(EVENT_SECTION_COPY_FAILED);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("source"), Some("missing"));
    assert_eq!(
        events[0].field(FIELD_VARIANT_ID),
        Some(created.variant.id.as_str())
    );
}

#[test]
fn test_create_logs_boundary_events() {
    let capture = init_test_capture();
    let mut conn = setup_test_db();
    let observer = RecordingObserver::new();

    variant::variant_create(&mut conn, &new_variant("logged"), None, &observer).unwrap();
    let err =
        variant::variant_create(&mut conn, &new_variant("logged"), None, &observer).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::AlreadyExists);

    capture.assert_event_exists("variant_create", "start");
    capture.assert_event_exists("variant_create", "end");
    capture.assert_event_exists("variant_create", "end_error");
    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("variant_create")
            && e.field("err_code") == Some("ERR_ALREADY_EXISTS")
    });
    assert!(errors >= 1);
}

#[test]
fn test_select_with_shared_selector() {
    let mut conn = setup_test_db();
    let observer = RecordingObserver::new();
    let selector = VariantSelector::seeded(3);

    let err = variant::variant_select(&conn, &selector).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NoActiveVariants);

    variant::variant_create(&mut conn, &new_variant("a"), None, &observer).unwrap();
    let chosen = variant::variant_select(&conn, &selector).unwrap();
    assert_eq!(chosen.slug, "a");
}

#[test]
fn test_section_commands() {
    let mut conn = setup_test_db();
    let observer = RecordingObserver::new();
    let created = variant::variant_create(&mut conn, &new_variant("s"), None, &observer).unwrap();

    let cta = section::section_create(
        &conn,
        &NewSection {
            variant_id: created.variant.id.clone(),
            section_type: "cta".to_string(),
            content: json!({"label": "Buy"}),
            order: 0,
            enabled: true,
        },
    )
    .unwrap();
    assert_eq!(cta.order, 1);

    let updated =
        section::section_update_content(&conn, &cta.id, &json!({"label": "Buy now"})).unwrap();
    assert_eq!(updated.content["label"], "Buy now");

    section::section_delete(&conn, &cta.id).unwrap();
    assert!(SectionRepo::list(&conn, &created.variant.id).unwrap().is_empty());

    let err = section::sections_replace(&mut conn, "nobody", &[hero(1)]).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_snapshot_round_trip_through_commands() {
    let mut conn = setup_test_db();
    let observer = RecordingObserver::new();
    variant::variant_create(&mut conn, &new_variant("snap"), None, &observer).unwrap();
    section::sections_replace(&mut conn, "snap", &[hero(1)]).unwrap();

    let exported = snapshot::snapshot_export(&conn, "snap").unwrap();
    let imported =
        snapshot::snapshot_import(&mut conn, "snap", &exported, ImportOptions::default()).unwrap();
    assert_eq!(imported, exported);
}

#[test]
fn test_sync_emits_applied_event() {
    let mut conn = setup_test_db();
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("launch.json"),
        r#"{"variant": {"name": "Launch", "weight": 10, "axes": {"persona": "team"}},
            "sections": [{"type": "hero", "content": {"title": "Go"}}]}"#,
    )
    .unwrap();
    let observer = RecordingObserver::new();
    let options = SyncOptions {
        snapshot_dir: dir.path().to_path_buf(),
        ..SyncOptions::default()
    };

    let report = sync::sync_run(&mut conn, &options, &observer).unwrap();

    assert_eq!(report.created, vec!["launch"]);
    let events = observer.events_named(EVENT_SYNC_APPLIED);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("created"), Some("1"));
    assert_eq!(events[0].field("updated"), Some("0"));
}
