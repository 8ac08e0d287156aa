mod map;
pub use map::ValueMap;

mod record;
pub use record::ValueRecord;

use crate::{
    schema::{ModelKind, Schema, Type},
    Error, Result,
};

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 64-bit integer
    I64(i64),

    /// 64-bit float
    F64(f64),

    /// String value
    String(String),

    /// A list of values of the same type
    List(Vec<Value>),

    /// A string-keyed mapping with values of the same type
    Map(ValueMap),

    /// Record value: the fields of a record-shaped document, in declaration
    /// order
    Record(ValueRecord),
}

impl Value {
    /// Returns a `Value` representing null
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    pub const fn is_i64(&self) -> bool {
        matches!(self, Self::I64(_))
    }

    pub const fn is_f64(&self) -> bool {
        matches!(self, Self::F64(_))
    }

    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub const fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    pub const fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    pub fn record_from_vec(fields: Vec<Self>) -> Self {
        ValueRecord::from_vec(fields).into()
    }

    pub fn list_from_vec(items: Vec<Self>) -> Self {
        Self::List(items)
    }

    pub fn to_bool(self) -> Result<bool> {
        match self {
            Self::Bool(v) => Ok(v),
            _ => Err(Error::type_conversion(&self, "bool")),
        }
    }

    pub fn to_i64(self) -> Result<i64> {
        match self {
            Self::I64(v) => Ok(v),
            _ => Err(Error::type_conversion(&self, "i64")),
        }
    }

    pub fn to_f64(self) -> Result<f64> {
        match self {
            Self::F64(v) => Ok(v),
            _ => Err(Error::type_conversion(&self, "f64")),
        }
    }

    pub fn to_string(self) -> Result<String> {
        match self {
            Self::String(v) => Ok(v),
            _ => Err(Error::type_conversion(&self, "String")),
        }
    }

    pub fn to_list(self) -> Result<Vec<Value>> {
        match self {
            Self::List(v) => Ok(v),
            _ => Err(Error::type_conversion(&self, "List")),
        }
    }

    pub fn to_map(self) -> Result<ValueMap> {
        match self {
            Self::Map(v) => Ok(v),
            _ => Err(Error::type_conversion(&self, "Map")),
        }
    }

    pub fn to_record(self) -> Result<ValueRecord> {
        match self {
            Self::Record(v) => Ok(v),
            _ => Err(Error::type_conversion(&self, "Record")),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(&**v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(&v[..]),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&ValueRecord> {
        match self {
            Self::Record(v) => Some(v),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_string(&self) -> &str {
        match self {
            Self::String(v) => v,
            _ => panic!("expected Value::String; actual={self:#?}"),
        }
    }

    #[track_caller]
    pub fn expect_record(&self) -> &ValueRecord {
        match self {
            Self::Record(v) => v,
            _ => panic!("expected Value::Record; actual={self:#?}"),
        }
    }

    #[track_caller]
    pub fn expect_list(&self) -> &[Value] {
        match self {
            Self::List(v) => &v[..],
            _ => panic!("expected Value::List; actual={self:#?}"),
        }
    }

    /// Best-effort type of this value, for diagnostics.
    pub fn infer_ty(&self) -> Type {
        match self {
            Self::Null => Type::Null,
            Self::Bool(_) => Type::Bool,
            Self::I64(_) => Type::I64,
            Self::F64(_) => Type::F64,
            Self::String(_) => Type::String,
            Self::List(items) => match items.first() {
                Some(item) => Type::list(item.infer_ty()),
                None => Type::List(Box::new(Type::Unknown)),
            },
            Self::Map(map) => match map.values().next() {
                Some(item) => Type::map(item.infer_ty()),
                None => Type::Map(Box::new(Type::Unknown)),
            },
            Self::Record(_) => Type::Unknown,
        }
    }

    /// Structural type check. Null matches any type; nullability of record
    /// fields is enforced by [`validate`] instead.
    pub fn is_a(&self, schema: &Schema, ty: &Type) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(_) => ty.is_bool(),
            Self::I64(_) => ty.is_i64(),
            Self::F64(_) => ty.is_f64(),
            Self::String(_) => ty.is_string(),
            Self::List(items) => match ty {
                Type::List(item_ty) => items.iter().all(|item| item.is_a(schema, item_ty)),
                _ => false,
            },
            Self::Map(map) => match ty {
                Type::Map(value_ty) => map.values().all(|value| value.is_a(schema, value_ty)),
                _ => false,
            },
            Self::Record(record) => match ty {
                Type::Model(id) => {
                    let model = schema.model(*id);
                    match &model.kind {
                        ModelKind::Record => {
                            record.len() == model.fields.len()
                                && record
                                    .iter()
                                    .zip(model.fields.iter())
                                    .all(|(value, field)| value.is_a(schema, &field.ty))
                        }
                        ModelKind::Root(_) => false,
                    }
                }
                _ => false,
            },
        }
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Checks that `value` conforms to `ty`, including nullability, reporting the
/// offending path on failure.
///
/// A root-shaped model's value is the bare root collection, never a record.
pub(crate) fn validate(
    schema: &Schema,
    ty: &Type,
    value: &Value,
    nullable: bool,
    path: &str,
) -> Result<()> {
    if value.is_null() {
        if nullable {
            return Ok(());
        }
        return Err(Error::decode(format!("{path}: null is not allowed")));
    }

    match (value, ty) {
        (Value::Bool(_), Type::Bool)
        | (Value::I64(_), Type::I64)
        | (Value::F64(_), Type::F64)
        | (Value::String(_), Type::String) => Ok(()),
        (Value::List(items), Type::List(item_ty)) => {
            for (i, item) in items.iter().enumerate() {
                validate(schema, item_ty, item, false, &format!("{path}[{i}]"))?;
            }
            Ok(())
        }
        (Value::Map(map), Type::Map(value_ty)) => {
            for (key, item) in map.iter() {
                validate(schema, value_ty, item, false, &format!("{path}.{key}"))?;
            }
            Ok(())
        }
        (value, Type::Model(id)) => {
            let model = schema.model(*id);
            match &model.kind {
                ModelKind::Record => {
                    let Value::Record(record) = value else {
                        return Err(Error::decode(format!(
                            "{path}: expected {} record, found {:?}",
                            model.name,
                            value.infer_ty()
                        )));
                    };
                    if record.len() != model.fields.len() {
                        return Err(Error::decode(format!(
                            "{path}: expected {} fields for model {}, found {}",
                            model.fields.len(),
                            model.name,
                            record.len()
                        )));
                    }
                    for (item, field) in record.iter().zip(model.fields.iter()) {
                        validate(
                            schema,
                            &field.ty,
                            item,
                            field.nullable,
                            &format!("{path}.{}", field.name),
                        )?;
                    }
                    Ok(())
                }
                ModelKind::Root(root_ty) => validate(schema, root_ty, value, false, path),
            }
        }
        (value, ty) => Err(Error::decode(format!(
            "{path}: expected {:?}, found {:?}",
            ty,
            value.infer_ty()
        ))),
    }
}

impl AsRef<Self> for Value {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I64(src.into())
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<ValueMap> for Value {
    fn from(src: ValueMap) -> Self {
        Self::Map(src)
    }
}

impl From<ValueRecord> for Value {
    fn from(src: ValueRecord) -> Self {
        Self::Record(src)
    }
}

impl<T> From<Vec<T>> for Value
where
    Self: From<T>,
{
    fn from(src: Vec<T>) -> Self {
        Self::List(src.into_iter().map(Self::from).collect())
    }
}

impl<T> From<Option<T>> for Value
where
    Self: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::from(value),
            None => Self::Null,
        }
    }
}

impl<T, const N: usize> PartialEq<[T; N]> for Value
where
    T: PartialEq<Value>,
{
    fn eq(&self, other: &[T; N]) -> bool {
        match self {
            Value::List(items) => {
                items.len() == N
                    && items.iter().enumerate().all(|(i, item)| other[i].eq(item))
            }
            _ => false,
        }
    }
}

impl PartialEq<Value> for i64 {
    fn eq(&self, other: &Value) -> bool {
        matches!(other, Value::I64(v) if v == self)
    }
}

impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        matches!(other, Value::String(v) if v == self)
    }
}
