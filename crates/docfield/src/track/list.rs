use super::{admit, check_value, notify_snapshot, wrap, OwnerSet, Tracked};
use crate::{host::MappedRow, schema::Schema, schema::Type, value::Value, Result};

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// A change-observing wrapper over a list.
///
/// Cloning produces another handle to the same underlying list; mutations
/// through either handle notify the registered owners.
#[derive(Clone)]
pub struct TrackedList {
    inner: Rc<RefCell<ListInner>>,
}

struct ListInner {
    schema: Arc<Schema>,
    item_ty: Type,
    items: Vec<Tracked>,
    owners: OwnerSet,
}

impl TrackedList {
    pub(crate) fn from_parts(schema: &Arc<Schema>, item_ty: &Type, items: Vec<Value>) -> Self {
        let items = items
            .into_iter()
            .map(|item| wrap(schema, item_ty, item))
            .collect();

        Self {
            inner: Rc::new(RefCell::new(ListInner {
                schema: schema.clone(),
                item_ty: item_ty.clone(),
                items,
                owners: OwnerSet::default(),
            })),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    pub fn item_ty(&self) -> Type {
        self.inner.borrow().item_ty.clone()
    }

    pub fn get(&self, index: usize) -> Option<Tracked> {
        self.inner.borrow().items.get(index).cloned()
    }

    /// Snapshot of the current items as plain values.
    pub fn to_vec(&self) -> Vec<Value> {
        self.inner
            .borrow()
            .items
            .iter()
            .map(Tracked::to_value)
            .collect()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.inner
            .borrow()
            .items
            .iter()
            .any(|item| item.to_value() == *value)
    }

    /// True when both handles refer to the same underlying list.
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn push(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        {
            let mut inner = self.inner.borrow_mut();
            let inner = &mut *inner;
            check_value(&inner.schema, &inner.item_ty, &value, false)?;
            let tracked = admit(&inner.schema, &inner.item_ty, &inner.owners, value);
            inner.items.push(tracked);
        }
        self.changed();
        Ok(())
    }

    /// Panics if `index` is out of bounds, like `Vec::insert`.
    pub fn insert(&self, index: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        {
            let mut inner = self.inner.borrow_mut();
            let inner = &mut *inner;
            check_value(&inner.schema, &inner.item_ty, &value, false)?;
            let tracked = admit(&inner.schema, &inner.item_ty, &inner.owners, value);
            inner.items.insert(index, tracked);
        }
        self.changed();
        Ok(())
    }

    /// Replaces the item at `index`. Panics if out of bounds.
    pub fn set(&self, index: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        {
            let mut inner = self.inner.borrow_mut();
            let inner = &mut *inner;
            check_value(&inner.schema, &inner.item_ty, &value, false)?;
            let tracked = admit(&inner.schema, &inner.item_ty, &inner.owners, value);
            inner.items[index] = tracked;
        }
        self.changed();
        Ok(())
    }

    /// Appends every value, or none: validation failure applies no change.
    pub fn extend<T>(&self, values: impl IntoIterator<Item = T>) -> Result<()>
    where
        Value: From<T>,
    {
        let values: Vec<Value> = values.into_iter().map(Value::from).collect();
        {
            let mut inner = self.inner.borrow_mut();
            let inner = &mut *inner;
            for value in &values {
                check_value(&inner.schema, &inner.item_ty, value, false)?;
            }
            for value in values {
                let tracked = admit(&inner.schema, &inner.item_ty, &inner.owners, value);
                inner.items.push(tracked);
            }
        }
        self.changed();
        Ok(())
    }

    /// Removes and returns the item at `index`. Panics if out of bounds.
    pub fn remove(&self, index: usize) -> Value {
        let removed = self.inner.borrow_mut().items.remove(index).to_value();
        self.changed();
        removed
    }

    pub fn pop(&self) -> Option<Value> {
        let popped = self
            .inner
            .borrow_mut()
            .items
            .pop()
            .map(|item| item.to_value());
        if popped.is_some() {
            self.changed();
        }
        popped
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().items.clear();
        self.changed();
    }

    pub fn truncate(&self, len: usize) {
        self.inner.borrow_mut().items.truncate(len);
        self.changed();
    }

    pub(crate) fn attach_owner(&self, row: &Rc<dyn MappedRow>, key: &Rc<str>) {
        self.inner.borrow_mut().owners.attach(row, key);
        for item in self.inner.borrow().items.iter() {
            item.attach_owner(row, key);
        }
    }

    pub(crate) fn detach_owner(&self, row: &Rc<dyn MappedRow>, key: &str) {
        self.inner.borrow_mut().owners.detach(row, key);
        for item in self.inner.borrow().items.iter() {
            item.detach_owner(row, key);
        }
    }

    pub(crate) fn adopt_owners(&self, owners: &OwnerSet) {
        self.inner.borrow_mut().owners.merge(owners);
        for item in self.inner.borrow().items.iter() {
            item.adopt_owners(owners);
        }
    }

    fn changed(&self) {
        let owners = self.inner.borrow().owners.snapshot();
        if notify_snapshot(&owners) {
            self.inner.borrow_mut().owners.prune();
        }
    }
}

impl std::fmt::Debug for TrackedList {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_list()
            .entries(self.to_vec().iter())
            .finish()
    }
}
