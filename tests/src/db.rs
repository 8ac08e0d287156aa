use docfield::host::{ClassId, MappedAttribute, MappedRow, PickleState};
use docfield::{
    AttributeListener, Capability, DocumentColumn, Encoded, Instance, Result, StorageClass,
};

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

/// One mapped row object: a per-instance state dict plus the owning
/// session's dirty ledger, the two host surfaces the tracker talks to.
pub struct Row {
    class: ClassId,
    id: u64,
    state: RefCell<HashMap<String, Option<Instance>>>,
    dirty: RefCell<HashSet<String>>,
}

impl Row {
    pub fn new(class: ClassId, id: u64) -> Rc<Row> {
        Rc::new(Row {
            class,
            id,
            state: RefCell::new(HashMap::new()),
            dirty: RefCell::new(HashSet::new()),
        })
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.borrow().is_empty()
    }

    pub fn dirty_keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.dirty.borrow().iter().cloned().collect();
        keys.sort();
        keys
    }

    pub fn clear_dirty(&self) {
        self.dirty.borrow_mut().clear();
    }

    /// Convenience read of a tracked attribute.
    pub fn value(&self, key: &str) -> Option<Instance> {
        self.get_attribute(key)
    }
}

impl MappedRow for Row {
    fn get_attribute(&self, key: &str) -> Option<Instance> {
        self.state.borrow().get(key).cloned().flatten()
    }

    fn put_attribute(&self, key: &str, value: Option<Instance>) {
        self.state.borrow_mut().insert(key.to_string(), value);
    }

    fn flag_modified(&self, key: &str) {
        self.dirty.borrow_mut().insert(key.to_string());
    }
}

/// The mapped-class wiring for one tracked document attribute: the column
/// type, its negotiated storage, and the installed lifecycle listener.
pub struct MappedClass {
    class: ClassId,
    key: String,
    column: DocumentColumn,
    listener: AttributeListener,
    storage: StorageClass,
}

impl MappedClass {
    pub fn new(
        class: ClassId,
        key: &str,
        column: DocumentColumn,
        capability: &Capability,
    ) -> MappedClass {
        let storage = column.storage_class(capability);
        let attribute = MappedAttribute {
            key: key.to_string(),
            class_: class,
        };
        let listener = column
            .listen_on_attribute(&attribute, true, class)
            .expect("attribute is declared on this class");

        MappedClass {
            class,
            key: key.to_string(),
            column,
            listener,
            storage,
        }
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn column(&self) -> &DocumentColumn {
        &self.column
    }

    pub fn listener(&self) -> &AttributeListener {
        &self.listener
    }

    pub fn storage(&self) -> StorageClass {
        self.storage
    }
}

/// An in-memory table of encoded column blobs plus the unit-of-work plumbing
/// a host mapper would provide around it: load fires the load hook,
/// assignment goes through the set hook, flush writes dirty rows back.
pub struct Db {
    mapped: MappedClass,
    table: RefCell<BTreeMap<u64, Option<Encoded>>>,
    next_id: Cell<u64>,
}

impl Db {
    pub fn new(mapped: MappedClass) -> Db {
        Db {
            mapped,
            table: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
        }
    }

    pub fn mapped(&self) -> &MappedClass {
        &self.mapped
    }

    /// Inserts a fresh document, returning its row id.
    pub fn insert(&self, value: Option<&Instance>) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let encoded = self.mapped.column.encode(value, self.mapped.storage);
        self.table.borrow_mut().insert(id, encoded);
        id
    }

    /// Reads the raw column blob, as a direct query on the table would.
    pub fn raw(&self, id: u64) -> Option<Encoded> {
        self.table.borrow().get(&id).cloned().flatten()
    }

    /// Loads the row: decode the column, populate the state dict, fire the
    /// load hook.
    pub fn get(&self, id: u64) -> Result<Rc<Row>> {
        let raw = self
            .table
            .borrow()
            .get(&id)
            .cloned()
            .expect("row exists in table");

        let value = self.mapped.column.decode(raw)?;
        let row = Row::new(self.mapped.class, id);
        row.put_attribute(&self.mapped.key, value);

        let row_dyn: Rc<dyn MappedRow> = row.clone();
        self.mapped.listener.load(&row_dyn)?;
        Ok(row)
    }

    /// Assigns the tracked attribute through the set hook, with the host's
    /// replace semantics: a real replacement dirties the attribute, handing
    /// back the identical document does not.
    pub fn set(&self, row: &Rc<Row>, value: Option<Instance>) -> Result<()> {
        let old = row.get_attribute(&self.mapped.key);
        let unchanged = match (&value, &old) {
            (Some(new), Some(old)) => new.is(old),
            (None, None) => true,
            _ => false,
        };

        let row_dyn: Rc<dyn MappedRow> = row.clone();
        let stored = self.mapped.listener.set(&row_dyn, value, old)?;

        row.put_attribute(&self.mapped.key, stored);
        if !unchanged {
            row.flag_modified(&self.mapped.key);
        }
        Ok(())
    }

    /// Writes the row's attribute back if the ledger marks it dirty, then
    /// clears the ledger. A clean row writes nothing.
    pub fn flush(&self, row: &Rc<Row>) {
        if !row.is_dirty() {
            return;
        }

        let value = row.get_attribute(&self.mapped.key);
        let encoded = self.mapped.column.encode(value.as_ref(), self.mapped.storage);
        self.table.borrow_mut().insert(row.id(), encoded);
        row.clear_dirty();
    }

    /// Serializes the row for transport: pickle hook on the way out,
    /// unpickle hook on the reconstituted row.
    pub fn pickle_round_trip(&self, row: &Rc<Row>) -> Rc<Row> {
        let mut side = PickleState::new();
        let row_dyn: Rc<dyn MappedRow> = row.clone();
        self.mapped.listener.pickle(&row_dyn, &mut side);

        // Within one process the state dict transports its values by handle.
        let restored = Row::new(self.mapped.class, row.id());
        restored.put_attribute(&self.mapped.key, row.get_attribute(&self.mapped.key));

        let restored_dyn: Rc<dyn MappedRow> = restored.clone();
        self.mapped.listener.unpickle(&restored_dyn, &side);
        restored
    }
}
