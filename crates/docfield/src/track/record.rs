use super::{admit, check_value, notify_snapshot, wrap, OwnerSet, Tracked};
use crate::{
    host::MappedRow,
    schema::{ModelId, Schema},
    value::{Value, ValueRecord},
    Result,
};

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// A change-observing wrapper over the field container of a record-shaped
/// document.
///
/// Cloning produces another handle to the same underlying record; mutations
/// through either handle notify the registered owners.
#[derive(Clone)]
pub struct TrackedRecord {
    inner: Rc<RefCell<RecordInner>>,
}

struct RecordInner {
    schema: Arc<Schema>,
    model: ModelId,
    fields: Vec<Tracked>,
    owners: OwnerSet,
}

impl TrackedRecord {
    pub(crate) fn from_parts(schema: &Arc<Schema>, model: ModelId, fields: Vec<Value>) -> Self {
        let fields = fields
            .into_iter()
            .zip(schema.model(model).fields.iter())
            .map(|(value, field)| wrap(schema, &field.ty, value))
            .collect();

        Self {
            inner: Rc::new(RefCell::new(RecordInner {
                schema: schema.clone(),
                model,
                fields,
                owners: OwnerSet::default(),
            })),
        }
    }

    pub fn model_id(&self) -> ModelId {
        self.inner.borrow().model
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().fields.len()
    }

    /// Reads the named field. None if the model declares no such field.
    pub fn get(&self, name: &str) -> Option<Tracked> {
        let inner = self.inner.borrow();
        let model = inner.schema.model(inner.model);
        let field = model.field_by_name(name)?;
        Some(inner.fields[field.id.index].clone())
    }

    /// Replaces the named field's value.
    ///
    /// The value must conform to the field's declared type (and nullability);
    /// failure applies no change.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        {
            let mut inner = self.inner.borrow_mut();
            let inner = &mut *inner;
            let model = inner.schema.model(inner.model);
            let Some(field) = model.field_by_name(name) else {
                return Err(crate::err!(
                    "model `{}` has no field `{}`",
                    model.name,
                    name
                ));
            };
            check_value(&inner.schema, &field.ty, &value, field.nullable)?;
            let index = field.id.index;
            let tracked = admit(&inner.schema, &field.ty, &inner.owners, value);
            inner.fields[index] = tracked;
        }
        self.changed();
        Ok(())
    }

    /// Snapshot of the current fields as a plain record.
    pub fn snapshot(&self) -> ValueRecord {
        self.inner
            .borrow()
            .fields
            .iter()
            .map(Tracked::to_value)
            .collect()
    }

    /// True when both handles refer to the same underlying record.
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn attach_owner(&self, row: &Rc<dyn MappedRow>, key: &Rc<str>) {
        self.inner.borrow_mut().owners.attach(row, key);
        for field in self.inner.borrow().fields.iter() {
            field.attach_owner(row, key);
        }
    }

    pub(crate) fn detach_owner(&self, row: &Rc<dyn MappedRow>, key: &str) {
        self.inner.borrow_mut().owners.detach(row, key);
        for field in self.inner.borrow().fields.iter() {
            field.detach_owner(row, key);
        }
    }

    pub(crate) fn adopt_owners(&self, owners: &OwnerSet) {
        self.inner.borrow_mut().owners.merge(owners);
        for field in self.inner.borrow().fields.iter() {
            field.adopt_owners(owners);
        }
    }

    fn changed(&self) {
        let owners = self.inner.borrow().owners.snapshot();
        if notify_snapshot(&owners) {
            self.inner.borrow_mut().owners.prune();
        }
    }
}

impl std::fmt::Debug for TrackedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_tuple("TrackedRecord")
            .field(&self.snapshot())
            .finish()
    }
}
