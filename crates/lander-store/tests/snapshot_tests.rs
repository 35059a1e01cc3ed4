//! Integration tests for snapshot export/import

use lander_core::errors::ExErrorKind;
use lander_core::model::{NewVariant, SectionInput, VariantSnapshot, VariantStatus};
use lander_store::repo::{SectionRepo, VariantRepo};
use lander_store::{export_snapshot, import_snapshot, ImportOptions};
use rusqlite::Connection;
use serde_json::json;
use std::collections::BTreeMap;

fn setup_test_db() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    lander_store::migrations::apply_migrations(&mut conn).unwrap();
    conn
}

fn seed(conn: &mut Connection, slug: &str) {
    let mut axes = BTreeMap::new();
    axes.insert("persona".to_string(), "enterprise".to_string());
    let variant = VariantRepo::create(
        conn,
        &NewVariant {
            slug: slug.to_string(),
            name: "Enterprise".to_string(),
            description: Some("Big accounts".to_string()),
            weight: 30,
            axes,
        },
    )
    .unwrap();

    let tx = conn.transaction().unwrap();
    SectionRepo::replace_in_tx(
        &tx,
        &variant.id,
        &[
            SectionInput {
                section_type: "hero".to_string(),
                content: json!({"title": "Scale up"}),
                order: 1,
                enabled: None,
            },
            SectionInput {
                section_type: "faq".to_string(),
                content: json!({"items": []}),
                order: 2,
                enabled: Some(false),
            },
        ],
    )
    .unwrap();
    tx.commit().unwrap();
}

fn section(section_type: &str, order: i64) -> SectionInput {
    SectionInput {
        section_type: section_type.to_string(),
        content: json!({"title": section_type}),
        order,
        enabled: None,
    }
}

#[test]
fn test_export_includes_disabled_sections() {
    let mut conn = setup_test_db();
    seed(&mut conn, "enterprise");

    let snapshot = export_snapshot(&conn, "enterprise").unwrap();
    assert_eq!(snapshot.variant.slug, "enterprise");
    assert_eq!(snapshot.variant.status.as_deref(), Some("active"));
    assert_eq!(snapshot.sections.len(), 2);
    assert_eq!(snapshot.sections[1].enabled, Some(false));
}

#[test]
fn test_export_then_import_is_idempotent() {
    let mut conn = setup_test_db();
    seed(&mut conn, "enterprise");

    let exported = export_snapshot(&conn, "enterprise").unwrap();
    let reimported =
        import_snapshot(&mut conn, "enterprise", &exported, ImportOptions::default()).unwrap();

    assert_eq!(reimported, exported);
    assert_eq!(export_snapshot(&conn, "enterprise").unwrap(), exported);
}

#[test]
fn test_import_applies_metadata_and_sections() {
    let mut conn = setup_test_db();
    seed(&mut conn, "enterprise");

    let mut snapshot = export_snapshot(&conn, "enterprise").unwrap();
    snapshot.variant.name = "Enterprise Plus".to_string();
    snapshot.variant.weight = 70;
    snapshot.variant.status = Some("archived".to_string());
    snapshot.variant.header = None;
    snapshot.variant.axes = BTreeMap::from([("layout".to_string(), "minimal".to_string())]);
    snapshot.sections = vec![section("cta", 0), section("hero", 0)];

    let result =
        import_snapshot(&mut conn, "enterprise", &snapshot, ImportOptions::default()).unwrap();
    assert_eq!(result.variant.name, "Enterprise Plus");
    assert_eq!(result.variant.weight, 70);
    assert_eq!(result.variant.status.as_deref(), Some("archived"));
    let orders: Vec<(String, i64)> = result
        .sections
        .iter()
        .map(|s| (s.section_type.clone(), s.order))
        .collect();
    assert_eq!(
        orders,
        vec![("cta".to_string(), 1), ("hero".to_string(), 2)]
    );

    let stored = VariantRepo::get_by_slug(&conn, "enterprise").unwrap();
    assert_eq!(stored.status, VariantStatus::Archived);
    assert!(stored.archived_at.is_some());
    assert_eq!(stored.header_config.brand_label, "Enterprise");
    assert_eq!(stored.axes.len(), 1);
}

#[test]
fn test_slug_mismatch_leaves_state_untouched() {
    let mut conn = setup_test_db();
    seed(&mut conn, "enterprise");
    let before = export_snapshot(&conn, "enterprise").unwrap();

    let mut payload = before.clone();
    payload.variant.slug = "other".to_string();
    payload.variant.weight = 1;
    payload.sections.clear();

    let err =
        import_snapshot(&mut conn, "enterprise", &payload, ImportOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(export_snapshot(&conn, "enterprise").unwrap(), before);
}

#[test]
fn test_invalid_section_rejected_before_any_write() {
    let mut conn = setup_test_db();
    seed(&mut conn, "enterprise");
    let before = export_snapshot(&conn, "enterprise").unwrap();

    let mut payload = before.clone();
    payload.variant.name = "Changed".to_string();
    payload.sections.push(section("marquee", 9));

    let err =
        import_snapshot(&mut conn, "enterprise", &payload, ImportOptions::default()).unwrap_err();
    assert_eq!(err.field(), Some("marquee"));
    assert_eq!(export_snapshot(&conn, "enterprise").unwrap(), before);
}

#[test]
fn test_failure_after_metadata_write_rolls_back() {
    let mut conn = setup_test_db();
    seed(&mut conn, "enterprise");
    let before = export_snapshot(&conn, "enterprise").unwrap();

    // Metadata and axes are written before the section inserts hit this
    conn.execute_batch(
        "CREATE TRIGGER reject_section_insert BEFORE INSERT ON content_sections
         BEGIN SELECT RAISE(ABORT, 'section insert refused'); END;",
    )
    .unwrap();

    let mut payload = before.clone();
    payload.variant.name = "Changed".to_string();
    payload.variant.weight = 77;

    let err =
        import_snapshot(&mut conn, "enterprise", &payload, ImportOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert_eq!(export_snapshot(&conn, "enterprise").unwrap(), before);

    let stored = VariantRepo::get_by_slug(&conn, "enterprise").unwrap();
    assert_eq!(stored.name, "Enterprise");
    assert_eq!(stored.weight, 30);
}

#[test]
fn test_unknown_status_rejected() {
    let mut conn = setup_test_db();
    seed(&mut conn, "enterprise");

    let mut payload = export_snapshot(&conn, "enterprise").unwrap();
    payload.variant.status = Some("paused".to_string());
    let err =
        import_snapshot(&mut conn, "enterprise", &payload, ImportOptions::default()).unwrap_err();
    assert_eq!(err.field(), Some("status"));
}

#[test]
fn test_import_missing_variant_is_not_found() {
    let mut conn = setup_test_db();
    let payload: VariantSnapshot = serde_json::from_value(json!({
        "variant": {"slug": "ghost", "name": "Ghost", "weight": 5, "axes": {"tone": "friendly"}},
        "sections": []
    }))
    .unwrap();

    let err = import_snapshot(&mut conn, "ghost", &payload, ImportOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_deleted_variant_needs_resurrect() {
    let mut conn = setup_test_db();
    seed(&mut conn, "enterprise");
    let mut payload = export_snapshot(&conn, "enterprise").unwrap();
    VariantRepo::delete(&conn, "enterprise").unwrap();

    let err =
        import_snapshot(&mut conn, "enterprise", &payload, ImportOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);

    payload.variant.status = Some("active".to_string());
    let result = import_snapshot(
        &mut conn,
        "enterprise",
        &payload,
        ImportOptions {
            allow_resurrect: true,
        },
    )
    .unwrap();
    assert_eq!(result.variant.status.as_deref(), Some("active"));
}
