//! Integration tests for the Content Store
//!
//! Full replacement must be all-or-nothing, ordering must follow the
//! renumbering rules and copies must get fresh identities.

use lander_core::errors::ExErrorKind;
use lander_core::model::{ContentSection, NewSection, NewVariant, SectionInput, Variant};
use lander_store::repo::{SectionRepo, VariantRepo};
use rusqlite::Connection;
use serde_json::json;
use std::collections::BTreeMap;

fn setup_test_db() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    lander_store::migrations::apply_migrations(&mut conn).unwrap();
    conn
}

fn create_variant(conn: &mut Connection, slug: &str) -> Variant {
    let mut axes = BTreeMap::new();
    axes.insert("persona".to_string(), "team".to_string());
    VariantRepo::create(
        conn,
        &NewVariant {
            slug: slug.to_string(),
            name: slug.to_string(),
            description: None,
            weight: 10,
            axes,
        },
    )
    .unwrap()
}

fn input(section_type: &str, order: i64) -> SectionInput {
    SectionInput {
        section_type: section_type.to_string(),
        content: json!({"title": section_type}),
        order,
        enabled: None,
    }
}

fn replace(conn: &mut Connection, variant_id: &str, inputs: &[SectionInput]) -> lander_store::Result<Vec<ContentSection>> {
    let tx = conn.transaction().unwrap();
    let written = SectionRepo::replace_in_tx(&tx, variant_id, inputs)?;
    tx.commit().unwrap();
    Ok(written)
}

fn dump(conn: &Connection, variant_id: &str) -> Vec<(String, String, String, i64, bool)> {
    SectionRepo::list(conn, variant_id)
        .unwrap()
        .into_iter()
        .map(|s| (s.id, s.section_type, s.content.to_string(), s.order, s.enabled))
        .collect()
}

#[test]
fn test_replace_renumbers_non_positive_orders() {
    let mut conn = setup_test_db();
    let variant = create_variant(&mut conn, "spring");

    // GIVEN orders 0, -2 and 5
    let inputs = vec![input("hero", 0), input("features", -2), input("cta", 5)];

    // WHEN replaced
    replace(&mut conn, &variant.id, &inputs).unwrap();

    // THEN features=1, hero=2, cta=5
    let got: Vec<(String, i64)> = SectionRepo::list(&conn, &variant.id)
        .unwrap()
        .into_iter()
        .map(|s| (s.section_type, s.order))
        .collect();
    assert_eq!(
        got,
        vec![
            ("features".to_string(), 1),
            ("hero".to_string(), 2),
            ("cta".to_string(), 5)
        ]
    );
}

#[test]
fn test_replace_is_all_or_nothing() {
    let mut conn = setup_test_db();
    let variant = create_variant(&mut conn, "spring");
    replace(&mut conn, &variant.id, &[input("hero", 1), input("footer", 2)]).unwrap();
    let before = dump(&conn, &variant.id);

    // GIVEN one valid and one invalid section
    let inputs = vec![input("faq", 1), input("carousel", 2)];

    // WHEN replaced
    let err = replace(&mut conn, &variant.id, &inputs).unwrap_err();

    // THEN the error names the type and nothing changed
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(err.field(), Some("carousel"));
    assert_eq!(dump(&conn, &variant.id), before);
}

#[test]
fn test_replace_requires_transaction() {
    let mut conn = setup_test_db();
    let variant = create_variant(&mut conn, "spring");

    let err = SectionRepo::replace_in_tx(&conn, &variant.id, &[input("hero", 1)]).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::TransactionRequired);
    assert!(SectionRepo::list(&conn, &variant.id).unwrap().is_empty());
}

#[test]
fn test_replace_rejects_missing_content() {
    let mut conn = setup_test_db();
    let variant = create_variant(&mut conn, "spring");

    let mut bad = input("hero", 1);
    bad.content = serde_json::Value::Null;
    let err = replace(&mut conn, &variant.id, &[bad]).unwrap_err();
    assert_eq!(err.field(), Some("sections[0].content"));
}

#[test]
fn test_list_public_filters_disabled_and_keeps_order() {
    let mut conn = setup_test_db();
    let variant = create_variant(&mut conn, "spring");

    let mut hidden = input("faq", 2);
    hidden.enabled = Some(false);
    replace(
        &mut conn,
        &variant.id,
        &[input("footer", 3), hidden, input("hero", 1)],
    )
    .unwrap();

    let public: Vec<String> = SectionRepo::list_public(&conn, &variant.id)
        .unwrap()
        .into_iter()
        .map(|s| s.section_type)
        .collect();
    assert_eq!(public, vec!["hero", "footer"]);
    assert_eq!(SectionRepo::list(&conn, &variant.id).unwrap().len(), 3);
}

#[test]
fn test_equal_orders_keep_insertion_order() {
    let mut conn = setup_test_db();
    let variant = create_variant(&mut conn, "spring");
    replace(
        &mut conn,
        &variant.id,
        &[input("video", 4), input("faq", 4), input("cta", 4)],
    )
    .unwrap();

    let got: Vec<String> = SectionRepo::list(&conn, &variant.id)
        .unwrap()
        .into_iter()
        .map(|s| s.section_type)
        .collect();
    assert_eq!(got, vec!["video", "faq", "cta"]);
}

#[test]
fn test_create_enforces_vocabulary_and_appends() {
    let mut conn = setup_test_db();
    let variant = create_variant(&mut conn, "spring");
    replace(&mut conn, &variant.id, &[input("hero", 3)]).unwrap();

    let err = SectionRepo::create(
        &conn,
        &NewSection {
            variant_id: variant.id.clone(),
            section_type: "banner".to_string(),
            content: json!({}),
            order: 1,
            enabled: true,
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);

    let created = SectionRepo::create(
        &conn,
        &NewSection {
            variant_id: variant.id.clone(),
            section_type: "Footer".to_string(),
            content: json!({"links": []}),
            order: 0,
            enabled: true,
        },
    )
    .unwrap();
    assert_eq!(created.section_type, "footer");
    assert_eq!(created.order, 4);

    let err = SectionRepo::create(
        &conn,
        &NewSection {
            variant_id: "missing".to_string(),
            section_type: "hero".to_string(),
            content: json!({}),
            order: 1,
            enabled: true,
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_update_content_and_delete() {
    let mut conn = setup_test_db();
    let variant = create_variant(&mut conn, "spring");
    let written = replace(&mut conn, &variant.id, &[input("hero", 1)]).unwrap();
    let id = &written[0].id;

    let updated = SectionRepo::update_content(&conn, id, &json!({"title": "New"})).unwrap();
    assert_eq!(updated.content, json!({"title": "New"}));

    let err = SectionRepo::update_content(&conn, id, &serde_json::Value::Null).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);

    SectionRepo::delete(&conn, id).unwrap();
    assert_eq!(
        SectionRepo::get(&conn, id).unwrap_err().kind(),
        ExErrorKind::NotFound
    );
    assert_eq!(
        SectionRepo::update_content(&conn, id, &json!({}))
            .unwrap_err()
            .kind(),
        ExErrorKind::NotFound
    );
}

#[test]
fn test_copy_preserves_fields_with_new_ids() {
    let mut conn = setup_test_db();
    let source = create_variant(&mut conn, "source");
    let target = create_variant(&mut conn, "target");

    let mut hidden = input("faq", 7);
    hidden.enabled = Some(false);
    replace(&mut conn, &source.id, &[input("hero", 1), hidden]).unwrap();

    let copied = SectionRepo::copy_from_variant(&mut conn, &source.id, &target.id).unwrap();
    assert_eq!(copied, 2);

    let originals = SectionRepo::list(&conn, &source.id).unwrap();
    let copies = SectionRepo::list(&conn, &target.id).unwrap();
    assert_eq!(copies.len(), originals.len());
    for (original, copy) in originals.iter().zip(&copies) {
        assert_ne!(original.id, copy.id);
        assert_eq!(copy.variant_id, target.id);
        assert_eq!(copy.section_type, original.section_type);
        assert_eq!(copy.content, original.content);
        assert_eq!(copy.order, original.order);
        assert_eq!(copy.enabled, original.enabled);
    }
}
