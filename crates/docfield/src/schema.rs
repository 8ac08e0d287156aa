mod builder;
pub use builder::{ModelBuilder, SchemaBuilder};

mod field;
pub use field::{Field, FieldId};

mod model;
pub use model::{Model, ModelId, ModelKind};

mod ty;
pub use ty::Type;

/// A registry of model definitions.
///
/// Models reference each other by [`ModelId`], so nested documents resolve
/// through the schema they were registered in.
#[derive(Debug, Default)]
pub struct Schema {
    pub(crate) models: Vec<Model>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Gets the model with the given id.
    ///
    /// Panics if the id does not belong to this schema.
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        &self.models[id.into().0]
    }

    pub fn models(&self) -> impl ExactSizeIterator<Item = &Model> {
        self.models.iter()
    }

    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|model| model.name == name)
    }
}
