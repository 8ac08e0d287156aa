mod list;
pub use list::TrackedList;

mod map;
pub use map::TrackedMap;

mod owners;
pub(crate) use owners::{notify_snapshot, OwnerSet};

mod record;
pub use record::TrackedRecord;

use crate::{
    host::MappedRow,
    schema::{ModelKind, Schema, Type},
    value::Value,
    Error, Result,
};

use std::rc::Rc;
use std::sync::Arc;

/// One node of a wrapped document value.
///
/// Mutable containers (lists, maps, nested records) become change-observing
/// wrappers; scalars pass through unchanged. Reads forward to the underlying
/// data, writes notify every owner registered on the container.
#[derive(Clone)]
pub enum Tracked {
    /// Scalar value, passed through unwrapped
    Value(Value),

    List(TrackedList),

    Map(TrackedMap),

    Record(TrackedRecord),
}

impl Tracked {
    /// Snapshot of the current data as a plain value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::List(list) => Value::List(list.to_vec()),
            Self::Map(map) => Value::Map(map.snapshot()),
            Self::Record(record) => Value::Record(record.snapshot()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Value(value) => value.as_bool(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Value(value) => value.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Value(value) => value.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(value) => value.as_str(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<TrackedList> {
        match self {
            Self::List(list) => Some(list.clone()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<TrackedMap> {
        match self {
            Self::Map(map) => Some(map.clone()),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<TrackedRecord> {
        match self {
            Self::Record(record) => Some(record.clone()),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_list(&self) -> TrackedList {
        self.as_list().expect("expected a tracked list")
    }

    #[track_caller]
    pub fn expect_map(&self) -> TrackedMap {
        self.as_map().expect("expected a tracked map")
    }

    #[track_caller]
    pub fn expect_record(&self) -> TrackedRecord {
        self.as_record().expect("expected a tracked record")
    }

    /// Registers `(row, key)` on this node and every nested container.
    pub(crate) fn attach_owner(&self, row: &Rc<dyn MappedRow>, key: &Rc<str>) {
        match self {
            Self::Value(_) => {}
            Self::List(list) => list.attach_owner(row, key),
            Self::Map(map) => map.attach_owner(row, key),
            Self::Record(record) => record.attach_owner(row, key),
        }
    }

    /// Removes `(row, key)` from this node and every nested container.
    /// Detaching an owner that was never registered is a no-op.
    pub(crate) fn detach_owner(&self, row: &Rc<dyn MappedRow>, key: &str) {
        match self {
            Self::Value(_) => {}
            Self::List(list) => list.detach_owner(row, key),
            Self::Map(map) => map.detach_owner(row, key),
            Self::Record(record) => record.detach_owner(row, key),
        }
    }

    /// Copies every owner in `owners` onto this node and every nested
    /// container. Used when a value is inserted into an already-owned
    /// container, so later mutations of the new subtree also propagate.
    pub(crate) fn adopt_owners(&self, owners: &OwnerSet) {
        match self {
            Self::Value(_) => {}
            Self::List(list) => list.adopt_owners(owners),
            Self::Map(map) => map.adopt_owners(owners),
            Self::Record(record) => record.adopt_owners(owners),
        }
    }
}

/// Recursively wraps a validated plain value of type `ty`.
///
/// Root-shaped model types resolve to their root collection type before
/// wrapping, so a root document wraps as its bare container.
pub(crate) fn wrap(schema: &Arc<Schema>, ty: &Type, value: Value) -> Tracked {
    if value.is_null() {
        return Tracked::Value(Value::Null);
    }

    match ty {
        Type::List(item_ty) => {
            let items = match value {
                Value::List(items) => items,
                value => panic!("expected Value::List; actual={value:#?}"),
            };
            Tracked::List(TrackedList::from_parts(schema, item_ty, items))
        }
        Type::Map(value_ty) => {
            let entries = match value {
                Value::Map(map) => map,
                value => panic!("expected Value::Map; actual={value:#?}"),
            };
            Tracked::Map(TrackedMap::from_parts(schema, value_ty, entries))
        }
        Type::Model(id) => {
            let model = schema.model(*id);
            match model.kind.clone() {
                ModelKind::Record => {
                    let record = match value {
                        Value::Record(record) => record,
                        value => panic!("expected Value::Record; actual={value:#?}"),
                    };
                    Tracked::Record(TrackedRecord::from_parts(schema, *id, record.fields))
                }
                ModelKind::Root(root_ty) => wrap(schema, &root_ty, value),
            }
        }
        _ => Tracked::Value(value),
    }
}

/// Wraps a value entering an already-owned container; the new subtree adopts
/// the container's owners so deep mutations of it propagate too.
pub(crate) fn admit(
    schema: &Arc<Schema>,
    ty: &Type,
    owners: &OwnerSet,
    value: Value,
) -> Tracked {
    let tracked = wrap(schema, ty, value);
    tracked.adopt_owners(owners);
    tracked
}

/// Gate for values entering a tracked container. The container applies no
/// partial change on failure.
pub(crate) fn check_value(
    schema: &Schema,
    ty: &Type,
    value: &Value,
    nullable: bool,
) -> Result<()> {
    crate::value::validate(schema, ty, value, nullable, "value")
        .map_err(|_| Error::type_conversion(value, format!("{ty:?}")))
}
