use super::ModelId;

/// A document value type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 64-bit integer
    I64,

    /// 64-bit float
    F64,

    /// String type
    String,

    /// A list of a single type
    List(Box<Type>),

    /// A string-keyed mapping with values of a single type
    Map(Box<Type>),

    /// An instance of a model
    Model(ModelId),

    /// The null type.
    ///
    /// Never declared in a schema; only produced by type inference.
    Null,

    /// A type that could not be inferred (e.g., empty list)
    Unknown,
}

impl Type {
    pub fn list(ty: impl Into<Self>) -> Self {
        Self::List(Box::new(ty.into()))
    }

    pub fn map(ty: impl Into<Self>) -> Self {
        Self::Map(Box::new(ty.into()))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    pub fn is_i64(&self) -> bool {
        matches!(self, Self::I64)
    }

    pub fn is_f64(&self) -> bool {
        matches!(self, Self::F64)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    pub fn is_model(&self) -> bool {
        matches!(self, Self::Model(_))
    }

    /// Returns true if values of this type are mutable containers that the
    /// tracker wraps; scalars pass through unwrapped.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::List(_) | Self::Map(_) | Self::Model(_))
    }

    #[track_caller]
    pub fn unwrap_list_ref(&self) -> &Type {
        match self {
            Type::List(items) => items,
            _ => panic!("expected Type::List; actual={self:#?}"),
        }
    }
}

impl From<&Self> for Type {
    fn from(value: &Self) -> Self {
        value.clone()
    }
}

impl From<ModelId> for Type {
    fn from(value: ModelId) -> Self {
        Self::Model(value)
    }
}
