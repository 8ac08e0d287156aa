use pretty_assertions::assert_eq;
use tests::{init_logging, nested_fixture, nested_value};

#[test]
fn marshalling_nested() {
    init_logging();
    let fixture = nested_fixture();
    let data = nested_value(&fixture);

    let id = fixture.db.insert(Some(&data));
    let row = fixture.db.get(id).unwrap();
    assert_eq!(row.value("data").unwrap(), data);

    let raw = fixture.db.raw(id).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(raw.as_text().unwrap()).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!({"label": "label", "inner": {"tags": ["a", "b"], "count": 1}})
    );
}

#[test]
fn mutating_sub_document_field_dirties_row() {
    init_logging();
    let fixture = nested_fixture();
    let id = fixture.db.insert(Some(&nested_value(&fixture)));

    let row = fixture.db.get(id).unwrap();
    let inner = row.value("data").unwrap().get("inner").unwrap().expect_record();
    inner.set("count", 2).unwrap();
    assert!(row.is_dirty());
    fixture.db.flush(&row);

    let row = fixture.db.get(id).unwrap();
    let inner = row.value("data").unwrap().get("inner").unwrap().expect_record();
    assert_eq!(inner.get("count").unwrap().as_i64(), Some(2));
}

#[test]
fn mutating_list_inside_sub_document_dirties_row() {
    init_logging();
    let fixture = nested_fixture();
    let id = fixture.db.insert(Some(&nested_value(&fixture)));

    let row = fixture.db.get(id).unwrap();
    let tags = row
        .value("data")
        .unwrap()
        .get("inner")
        .unwrap()
        .expect_record()
        .get("tags")
        .unwrap()
        .expect_list();
    tags.push("c").unwrap();
    assert!(row.is_dirty());
    fixture.db.flush(&row);

    let row = fixture.db.get(id).unwrap();
    let tags = row
        .value("data")
        .unwrap()
        .get("inner")
        .unwrap()
        .expect_record()
        .get("tags")
        .unwrap()
        .expect_list();
    let expected: Vec<docfield::Value> = vec!["a".into(), "b".into(), "c".into()];
    assert_eq!(tags.to_vec(), expected);
}

#[test]
fn replacing_sub_document_tracks_the_replacement() {
    init_logging();
    let fixture = nested_fixture();
    let id = fixture.db.insert(Some(&nested_value(&fixture)));

    let row = fixture.db.get(id).unwrap();
    let data = row.value("data").unwrap();
    data.set(
        "inner",
        docfield::Value::record_from_vec(vec![vec!["x"].into(), 9.into()]),
    )
    .unwrap();
    assert!(row.is_dirty());
    row.clear_dirty();

    // The replacement sub-document was wrapped and owned on the way in.
    let tags = data
        .get("inner")
        .unwrap()
        .expect_record()
        .get("tags")
        .unwrap()
        .expect_list();
    tags.push("y").unwrap();
    assert!(row.is_dirty());
    fixture.db.flush(&row);

    let row = fixture.db.get(id).unwrap();
    let inner = row.value("data").unwrap().get("inner").unwrap().expect_record();
    assert_eq!(inner.get("count").unwrap().as_i64(), Some(9));
    let expected: Vec<docfield::Value> = vec!["x".into(), "y".into()];
    assert_eq!(inner.get("tags").unwrap().expect_list().to_vec(), expected);
}
