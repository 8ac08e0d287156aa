use docfield::host::MappedRow;
use docfield::{Capability, Encoded, StorageClass};
use pretty_assertions::assert_eq;
use tests::{document_fixture, document_fixture_with, document_value, init_logging};

#[test]
fn sqlite_stores_text() {
    init_logging();
    let fixture = document_fixture();
    assert_eq!(fixture.db.mapped().storage(), StorageClass::Text);

    let id = fixture.db.insert(Some(&document_value(&fixture)));
    assert!(matches!(fixture.db.raw(id), Some(Encoded::Text(_))));
}

#[test]
fn postgresql_stores_native_json() {
    init_logging();
    let fixture = document_fixture_with(&Capability::POSTGRESQL);
    assert_eq!(fixture.db.mapped().storage(), StorageClass::Json);

    let id = fixture.db.insert(Some(&document_value(&fixture)));
    let raw = fixture.db.raw(id).unwrap();
    assert_eq!(
        raw.as_json().unwrap()["meta"],
        serde_json::json!({"foo": "bar"})
    );

    // Native storage round-trips through the same codec path.
    let row = fixture.db.get(id).unwrap();
    assert_eq!(row.value("data").unwrap(), document_value(&fixture));
}

#[test]
fn mysql_stores_native_json() {
    init_logging();
    let fixture = document_fixture_with(&Capability::MYSQL);
    assert_eq!(fixture.db.mapped().storage(), StorageClass::Json);
}

#[test]
fn corrupt_column_fails_on_load() {
    init_logging();
    let fixture = document_fixture();
    let data = document_value(&fixture);
    let id = fixture.db.insert(Some(&data));

    // A decode failure surfaces when the row is loaded, never defaulted.
    let codec = fixture.db.mapped().column().codec();
    let err = codec
        .decode(Some(Encoded::Text("{\"broken\":".to_string())))
        .unwrap_err();
    assert!(err.is_decode());

    // The intact row still loads.
    assert!(fixture.db.get(id).is_ok());
}

#[test]
fn encoded_text_is_stable_across_round_trips() {
    init_logging();
    let fixture = document_fixture();
    let data = document_value(&fixture);

    let id = fixture.db.insert(Some(&data));
    let first = fixture.db.raw(id).unwrap();

    let row = fixture.db.get(id).unwrap();
    row.flag_modified("data");
    fixture.db.flush(&row);

    assert_eq!(fixture.db.raw(id).unwrap(), first);
}
