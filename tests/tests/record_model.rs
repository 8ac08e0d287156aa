use pretty_assertions::assert_eq;
use tests::{document_fixture, document_value, init_logging};

#[test]
fn marshalling() {
    init_logging();
    let fixture = document_fixture();
    let data = document_value(&fixture);

    let id = fixture.db.insert(Some(&data));
    let row = fixture.db.get(id).unwrap();
    let loaded = row.value("data").unwrap();

    assert_eq!(loaded, data);
    assert!(!loaded.is(&data));

    // The column itself holds one JSON object.
    let raw = fixture.db.raw(id).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(raw.as_text().unwrap()).unwrap();
    assert!(parsed.is_object());
    assert_eq!(parsed["year"], 2019);
}

#[test]
fn mutable_attr() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(Some(&document_value(&fixture)));

    let row = fixture.db.get(id).unwrap();
    row.value("data").unwrap().set("year", 1989).unwrap();
    assert!(row.is_dirty());
    fixture.db.flush(&row);

    let row = fixture.db.get(id).unwrap();
    let year = row.value("data").unwrap().get("year").unwrap().as_i64();
    assert_eq!(year, Some(1989));
}

#[test]
fn mutable_nested_list() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(Some(&document_value(&fixture)));
    let some_value = 4i64;

    let row = fixture.db.get(id).unwrap();
    let ids = row.value("data").unwrap().get("ids").unwrap().expect_list();
    ids.push(some_value).unwrap();
    assert!(row.is_dirty());
    fixture.db.flush(&row);

    let row = fixture.db.get(id).unwrap();
    let ids = row.value("data").unwrap().get("ids").unwrap().expect_list();
    assert!(ids.contains(&some_value.into()));
}

#[test]
fn mutable_nested_map() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(Some(&document_value(&fixture)));

    let row = fixture.db.get(id).unwrap();
    let meta = row.value("data").unwrap().get("meta").unwrap().expect_map();
    meta.insert("baz", "qux").unwrap();
    assert!(row.is_dirty());
    fixture.db.flush(&row);

    let row = fixture.db.get(id).unwrap();
    let meta = row.value("data").unwrap().get("meta").unwrap().expect_map();
    assert_eq!(meta.get("baz").unwrap().as_str(), Some("qux"));
    assert_eq!(meta.get("foo").unwrap().as_str(), Some("bar"));
}

#[test]
fn clean_row_is_not_written() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(Some(&document_value(&fixture)));

    let row = fixture.db.get(id).unwrap();
    let _ = row.value("data").unwrap().get("year");
    assert!(!row.is_dirty());
    fixture.db.flush(&row);

    let row = fixture.db.get(id).unwrap();
    let year = row.value("data").unwrap().get("year").unwrap().as_i64();
    assert_eq!(year, Some(2019));
}

#[test]
fn identical_reassignment_is_noop() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(Some(&document_value(&fixture)));

    let row = fixture.db.get(id).unwrap();
    let current = row.value("data").unwrap();
    fixture.db.set(&row, Some(current)).unwrap();
    assert!(!row.is_dirty());
}

#[test]
fn equal_but_distinct_reassignment_dirties() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(Some(&document_value(&fixture)));

    let row = fixture.db.get(id).unwrap();
    let replacement = document_value(&fixture);
    assert_eq!(row.value("data").unwrap(), replacement);

    fixture.db.set(&row, Some(replacement)).unwrap();
    assert!(row.is_dirty());
}

#[test]
fn replacement_swaps_tracking() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(Some(&document_value(&fixture)));

    let row = fixture.db.get(id).unwrap();
    let old = row.value("data").unwrap();
    let new = document_value(&fixture);
    fixture.db.set(&row, Some(new.clone())).unwrap();
    row.clear_dirty();

    // The new value propagates...
    new.set("year", 1989).unwrap();
    assert!(row.is_dirty());
    row.clear_dirty();

    // ...the detached one no longer does.
    old.set("year", 1700).unwrap();
    assert!(!row.is_dirty());
}

#[test]
fn type_gate_rejects_foreign_model() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(Some(&document_value(&fixture)));

    let row = fixture.db.get(id).unwrap();
    let foreign = docfield::Instance::new(
        fixture.schema.clone(),
        fixture.pages,
        vec![1i64, 2, 3],
    )
    .unwrap();

    let err = fixture.db.set(&row, Some(foreign)).unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(
        err.to_string(),
        "attribute 'data' does not accept objects of type Pages"
    );

    // The assignment left no trace: value unchanged, row clean.
    assert_eq!(row.value("data").unwrap(), document_value(&fixture));
    assert!(!row.is_dirty());
}

#[test]
fn assigning_none_clears_the_column() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(Some(&document_value(&fixture)));

    let row = fixture.db.get(id).unwrap();
    fixture.db.set(&row, None).unwrap();
    assert!(row.is_dirty());
    fixture.db.flush(&row);

    assert!(fixture.db.raw(id).is_none());
    let row = fixture.db.get(id).unwrap();
    assert!(row.value("data").is_none());
}
