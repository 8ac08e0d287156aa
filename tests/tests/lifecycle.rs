use docfield::host::{ClassId, MappedAttribute, MappedRow, PickleState};
use pretty_assertions::assert_eq;
use std::rc::Rc;
use tests::{document_fixture, document_value, init_logging, Row, AUTHOR};

#[test]
fn listener_only_installs_on_declaring_class() {
    init_logging();
    let fixture = document_fixture();
    let attribute = MappedAttribute {
        key: "data".to_string(),
        class_: AUTHOR,
    };

    let column = fixture.db.mapped().column();
    assert!(column
        .listen_on_attribute(&attribute, true, AUTHOR)
        .is_some());

    // A subclass inheriting the descriptor must not double-install.
    assert!(column
        .listen_on_attribute(&attribute, true, ClassId(99))
        .is_none());
}

#[test]
fn load_with_null_column_is_noop() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(None);

    let row = fixture.db.get(id).unwrap();
    assert!(row.value("data").is_none());
    assert!(!row.is_dirty());
}

#[test]
fn refresh_all_attaches() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(Some(&document_value(&fixture)));
    let row = fixture.db.get(id).unwrap();

    let fresh = Row::new(AUTHOR, id);
    fresh.put_attribute("data", row.value("data"));
    let fresh_dyn: Rc<dyn MappedRow> = fresh.clone();
    fixture
        .db
        .mapped()
        .listener()
        .refresh(&fresh_dyn, None)
        .unwrap();

    fresh.value("data").unwrap().set("year", 1989).unwrap();
    assert!(fresh.is_dirty());
}

#[test]
fn refresh_subset_containing_key_attaches() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(Some(&document_value(&fixture)));
    let row = fixture.db.get(id).unwrap();

    let fresh = Row::new(AUTHOR, id);
    fresh.put_attribute("data", row.value("data"));
    let fresh_dyn: Rc<dyn MappedRow> = fresh.clone();
    fixture
        .db
        .mapped()
        .listener()
        .refresh(&fresh_dyn, Some(&["name", "data"][..]))
        .unwrap();

    fresh.value("data").unwrap().set("year", 1989).unwrap();
    assert!(fresh.is_dirty());
}

#[test]
fn refresh_of_other_attributes_skips() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(Some(&document_value(&fixture)));
    let row = fixture.db.get(id).unwrap();

    let fresh = Row::new(AUTHOR, id);
    fresh.put_attribute("data", row.value("data"));
    let fresh_dyn: Rc<dyn MappedRow> = fresh.clone();
    fixture
        .db
        .mapped()
        .listener()
        .refresh(&fresh_dyn, Some(&["name"][..]))
        .unwrap();

    // Not attached: mutations reach the originally loaded row only.
    row.clear_dirty();
    fresh.value("data").unwrap().set("year", 1989).unwrap();
    assert!(!fresh.is_dirty());
    assert!(row.is_dirty());
}

#[test]
fn pickle_round_trip_reattaches() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(Some(&document_value(&fixture)));
    let row = fixture.db.get(id).unwrap();

    let restored = fixture.db.pickle_round_trip(&row);
    assert_eq!(restored.value("data").unwrap(), document_value(&fixture));

    restored.value("data").unwrap().set("year", 1989).unwrap();
    assert!(restored.is_dirty());
}

#[test]
fn pickle_of_null_attribute_stashes_nothing() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(None);
    let row = fixture.db.get(id).unwrap();

    let mut side = PickleState::new();
    let row_dyn: Rc<dyn MappedRow> = row.clone();
    fixture.db.mapped().listener().pickle(&row_dyn, &mut side);
    assert!(side.is_empty());
}

#[test]
fn dropped_row_does_not_block_mutation() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(Some(&document_value(&fixture)));

    let data = {
        let row = fixture.db.get(id).unwrap();
        row.value("data").unwrap()
    };

    // The owner is gone; the value is still usable and nothing explodes.
    data.set("year", 1989).unwrap();
    assert_eq!(data.get("year").unwrap().as_i64(), Some(1989));
}

#[test]
fn one_value_two_owners() {
    init_logging();
    let fixture = document_fixture();
    let id = fixture.db.insert(Some(&document_value(&fixture)));
    let row = fixture.db.get(id).unwrap();
    let shared = row.value("data").unwrap();

    // A second row adopts the same document.
    let other = Row::new(AUTHOR, 999);
    fixture.db.set(&other, Some(shared.clone())).unwrap();
    other.clear_dirty();
    row.clear_dirty();

    shared.set("year", 1989).unwrap();
    assert!(row.is_dirty());
    assert!(other.is_dirty());
}
