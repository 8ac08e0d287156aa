use super::{Field, FieldId, Type};

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Name of the model
    pub name: String,

    /// Distinguishes record models (named fields) from root models (a single
    /// unnamed collection value)
    pub kind: ModelKind,

    /// Fields contained by the model. Empty for root models.
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone)]
pub enum ModelKind {
    /// Record model: the value is a set of named, typed fields
    Record,

    /// Root model: the value is a single bare collection of the given type
    Root(Type),
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ModelId(pub usize);

impl Model {
    /// Returns true if this is a record model (named fields)
    pub fn is_record(&self) -> bool {
        matches!(self.kind, ModelKind::Record)
    }

    /// Returns true if this is a root model (single collection value)
    pub fn is_root(&self) -> bool {
        matches!(self.kind, ModelKind::Root(_))
    }

    /// Returns the root value type if this is a root model, None if record
    pub fn root_ty(&self) -> Option<&Type> {
        match &self.kind {
            ModelKind::Root(ty) => Some(ty),
            ModelKind::Record => None,
        }
    }

    pub fn field(&self, field: impl Into<FieldId>) -> &Field {
        let field_id = field.into();
        assert_eq!(self.id, field_id.model);
        &self.fields[field_id.index]
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl std::fmt::Debug for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "ModelId({})", self.0)
    }
}
