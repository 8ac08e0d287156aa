use super::{admit, check_value, notify_snapshot, wrap, OwnerSet, Tracked};
use crate::{
    host::MappedRow,
    schema::{Schema, Type},
    value::{Value, ValueMap},
    Result,
};

use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// A change-observing wrapper over a string-keyed mapping.
///
/// Cloning produces another handle to the same underlying map; mutations
/// through either handle notify the registered owners.
#[derive(Clone)]
pub struct TrackedMap {
    inner: Rc<RefCell<MapInner>>,
}

struct MapInner {
    schema: Arc<Schema>,
    value_ty: Type,
    entries: IndexMap<String, Tracked>,
    owners: OwnerSet,
}

impl TrackedMap {
    pub(crate) fn from_parts(schema: &Arc<Schema>, value_ty: &Type, entries: ValueMap) -> Self {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key, wrap(schema, value_ty, value)))
            .collect();

        Self {
            inner: Rc::new(RefCell::new(MapInner {
                schema: schema.clone(),
                value_ty: value_ty.clone(),
                entries,
                owners: OwnerSet::default(),
            })),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    pub fn value_ty(&self) -> Type {
        self.inner.borrow().value_ty.clone()
    }

    pub fn get(&self, key: &str) -> Option<Tracked> {
        self.inner.borrow().entries.get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.borrow().entries.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().entries.keys().cloned().collect()
    }

    /// Snapshot of the current entries as plain values.
    pub fn snapshot(&self) -> ValueMap {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|(key, value)| (key.clone(), value.to_value()))
            .collect()
    }

    /// True when both handles refer to the same underlying map.
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Inserts the entry, returning the previous value for the key.
    pub fn insert(
        &self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        let key = key.into();
        let value = value.into();
        let previous = {
            let mut inner = self.inner.borrow_mut();
            let inner = &mut *inner;
            check_value(&inner.schema, &inner.value_ty, &value, false)?;
            let tracked = admit(&inner.schema, &inner.value_ty, &inner.owners, value);
            inner
                .entries
                .insert(key, tracked)
                .map(|previous| previous.to_value())
        };
        self.changed();
        Ok(previous)
    }

    /// Removes the entry, preserving the order of the remaining entries.
    pub fn remove(&self, key: &str) -> Option<Value> {
        let removed = self
            .inner
            .borrow_mut()
            .entries
            .shift_remove(key)
            .map(|removed| removed.to_value());
        if removed.is_some() {
            self.changed();
        }
        removed
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().entries.clear();
        self.changed();
    }

    pub(crate) fn attach_owner(&self, row: &Rc<dyn MappedRow>, key: &Rc<str>) {
        self.inner.borrow_mut().owners.attach(row, key);
        for value in self.inner.borrow().entries.values() {
            value.attach_owner(row, key);
        }
    }

    pub(crate) fn detach_owner(&self, row: &Rc<dyn MappedRow>, key: &str) {
        self.inner.borrow_mut().owners.detach(row, key);
        for value in self.inner.borrow().entries.values() {
            value.detach_owner(row, key);
        }
    }

    pub(crate) fn adopt_owners(&self, owners: &OwnerSet) {
        self.inner.borrow_mut().owners.merge(owners);
        for value in self.inner.borrow().entries.values() {
            value.adopt_owners(owners);
        }
    }

    fn changed(&self) {
        let owners = self.inner.borrow().owners.snapshot();
        if notify_snapshot(&owners) {
            self.inner.borrow_mut().owners.prune();
        }
    }
}

impl std::fmt::Debug for TrackedMap {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_map()
            .entries(snapshot.iter().map(|(key, value)| (key, value)))
            .finish()
    }
}
