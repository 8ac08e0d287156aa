use crate::{
    host::MappedRow,
    schema::{Model, ModelId, Schema, Type},
    track::{wrap, Tracked, TrackedList, TrackedMap, TrackedRecord},
    value::{validate, Value},
    Result,
};

use std::rc::Rc;
use std::sync::Arc;

/// A validated, wrapped document value: the decoded form of one stored
/// column.
///
/// An instance is a cheap-clone handle; clones share the same underlying
/// containers, so identity (which assignment no-op detection relies on) is
/// observable through [`Instance::is`]. Equality compares by value.
#[derive(Clone)]
pub struct Instance {
    schema: Arc<Schema>,
    model: ModelId,
    repr: Repr,
}

#[derive(Clone)]
enum Repr {
    /// Record-shaped document: the wrapped field container
    Record(TrackedRecord),

    /// Root-shaped document with a list root
    List(TrackedList),

    /// Root-shaped document with a map root
    Map(TrackedMap),
}

impl Instance {
    /// Validates `value` against the model definition and recursively wraps
    /// every mutable container in it.
    ///
    /// Scalars pass through unwrapped. Fails with a decode error naming the
    /// offending path if the value does not conform.
    pub fn new(schema: Arc<Schema>, model: ModelId, value: impl Into<Value>) -> Result<Self> {
        let value = value.into();
        validate(&schema, &Type::Model(model), &value, false, "$")?;
        Ok(Self::from_valid(schema, model, value))
    }

    /// Wraps a value already known to conform to the model definition.
    pub(crate) fn from_valid(schema: Arc<Schema>, model: ModelId, value: Value) -> Self {
        let repr = match wrap(&schema, &Type::Model(model), value) {
            Tracked::Record(record) => Repr::Record(record),
            Tracked::List(list) => Repr::List(list),
            Tracked::Map(map) => Repr::Map(map),
            Tracked::Value(value) => {
                panic!("document value wrapped to a scalar: {value:#?}")
            }
        };

        Self {
            schema,
            model,
            repr,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn model_id(&self) -> ModelId {
        self.model
    }

    pub fn model(&self) -> &Model {
        self.schema.model(self.model)
    }

    pub fn is_record(&self) -> bool {
        matches!(self.repr, Repr::Record(_))
    }

    pub fn is_root(&self) -> bool {
        !self.is_record()
    }

    /// The wrapped field container of a record-shaped document.
    pub fn record(&self) -> Option<TrackedRecord> {
        match &self.repr {
            Repr::Record(record) => Some(record.clone()),
            _ => None,
        }
    }

    /// The wrapped root container of a root-shaped document with a list root.
    pub fn root_list(&self) -> Option<TrackedList> {
        match &self.repr {
            Repr::List(list) => Some(list.clone()),
            _ => None,
        }
    }

    /// The wrapped root container of a root-shaped document with a map root.
    pub fn root_map(&self) -> Option<TrackedMap> {
        match &self.repr {
            Repr::Map(map) => Some(map.clone()),
            _ => None,
        }
    }

    /// Reads the named field of a record-shaped document. None for root
    /// shapes or undeclared fields.
    pub fn get(&self, field: &str) -> Option<Tracked> {
        self.record()?.get(field)
    }

    /// Replaces the named field of a record-shaped document.
    pub fn set(&self, field: &str, value: impl Into<Value>) -> Result<()> {
        match &self.repr {
            Repr::Record(record) => record.set(field, value),
            _ => Err(crate::err!(
                "model `{}` is root-shaped and has no named fields",
                self.model().name
            )),
        }
    }

    /// Snapshot of the document as a plain value.
    pub fn to_value(&self) -> Value {
        match &self.repr {
            Repr::Record(record) => Value::Record(record.snapshot()),
            Repr::List(list) => Value::List(list.to_vec()),
            Repr::Map(map) => Value::Map(map.snapshot()),
        }
    }

    /// True when both handles refer to the same underlying document.
    ///
    /// This is the identity check behind identical-value assignment being a
    /// no-op; two equal-by-value instances are still distinct documents.
    pub fn is(&self, other: &Instance) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Record(a), Repr::Record(b)) => a.same(b),
            (Repr::List(a), Repr::List(b)) => a.same(b),
            (Repr::Map(a), Repr::Map(b)) => a.same(b),
            _ => false,
        }
    }

    /// Registers `(row, key)` on the document's container tree.
    pub(crate) fn attach_owner(&self, row: &Rc<dyn MappedRow>, key: &Rc<str>) {
        self.tracked().attach_owner(row, key);
    }

    /// Removes `(row, key)` from the document's container tree. No-op if the
    /// pair was never registered.
    pub(crate) fn detach_owner(&self, row: &Rc<dyn MappedRow>, key: &str) {
        self.tracked().detach_owner(row, key);
    }

    fn tracked(&self) -> Tracked {
        match &self.repr {
            Repr::Record(record) => Tracked::Record(record.clone()),
            Repr::List(list) => Tracked::List(list.clone()),
            Repr::Map(map) => Tracked::Map(map.clone()),
        }
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model && self.to_value() == other.to_value()
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("model", &self.model().name)
            .field("value", &self.to_value())
            .finish()
    }
}
