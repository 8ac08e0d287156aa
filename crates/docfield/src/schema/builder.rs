use super::{Field, FieldId, Model, ModelId, ModelKind, Schema, Type};
use crate::{Error, Result};

/// Incrementally builds a [`Schema`], verifying it before handing it out.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    models: Vec<Model>,
}

impl SchemaBuilder {
    /// Starts a record model with named fields.
    pub fn model(&mut self, name: impl Into<String>) -> ModelBuilder<'_> {
        ModelBuilder {
            schema: self,
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Registers a root model: the value is a single bare collection rather
    /// than a set of named fields.
    pub fn root(&mut self, name: impl Into<String>, ty: Type) -> ModelId {
        let id = ModelId(self.models.len());
        self.models.push(Model {
            id,
            name: name.into(),
            kind: ModelKind::Root(ty),
            fields: Vec::new(),
        });
        id
    }

    /// Verifies the accumulated model definitions and produces the schema.
    pub fn build(self) -> Result<Schema> {
        self.verify()?;
        Ok(Schema {
            models: self.models,
        })
    }

    fn verify(&self) -> Result<()> {
        for (i, model) in self.models.iter().enumerate() {
            if self.models[..i].iter().any(|other| other.name == model.name) {
                return Err(Error::invalid_schema(format!(
                    "duplicate model name `{}`",
                    model.name
                )));
            }

            match &model.kind {
                ModelKind::Record => {
                    for (j, field) in model.fields.iter().enumerate() {
                        if model.fields[..j].iter().any(|other| other.name == field.name) {
                            return Err(Error::invalid_schema(format!(
                                "model `{}` declares field `{}` more than once",
                                model.name, field.name
                            )));
                        }

                        // A required field of the model's own type can never
                        // hold a finite value.
                        if field.ty == Type::Model(model.id) && !field.nullable {
                            return Err(Error::invalid_schema(format!(
                                "model `{}` cannot require a field of its own type",
                                model.name
                            )));
                        }

                        self.verify_ty(model, &field.ty)?;
                    }
                }
                ModelKind::Root(ty) => {
                    if !ty.is_list() && !ty.is_map() {
                        return Err(Error::invalid_schema(format!(
                            "root model `{}` must be a list or map, not {:?}",
                            model.name, ty
                        )));
                    }
                    self.verify_ty(model, ty)?;
                }
            }
        }

        Ok(())
    }

    fn verify_ty(&self, model: &Model, ty: &Type) -> Result<()> {
        match ty {
            Type::Bool | Type::I64 | Type::F64 | Type::String => Ok(()),
            Type::List(item) | Type::Map(item) => self.verify_ty(model, item),
            Type::Model(id) => {
                if id.0 >= self.models.len() {
                    return Err(Error::invalid_schema(format!(
                        "model `{}` references unknown model {:?}",
                        model.name, id
                    )));
                }
                Ok(())
            }
            Type::Null | Type::Unknown => Err(Error::invalid_schema(format!(
                "model `{}` declares a field of type {:?}",
                model.name, ty
            ))),
        }
    }
}

/// Builds one record model within a [`SchemaBuilder`].
pub struct ModelBuilder<'a> {
    schema: &'a mut SchemaBuilder,
    name: String,
    fields: Vec<(String, Type, bool)>,
}

impl ModelBuilder<'_> {
    /// Adds a required field.
    pub fn field(mut self, name: impl Into<String>, ty: impl Into<Type>) -> Self {
        self.fields.push((name.into(), ty.into(), false));
        self
    }

    /// Adds a field that also accepts null.
    pub fn nullable_field(mut self, name: impl Into<String>, ty: impl Into<Type>) -> Self {
        self.fields.push((name.into(), ty.into(), true));
        self
    }

    /// Registers the model and returns its id.
    pub fn build(self) -> ModelId {
        let id = ModelId(self.schema.models.len());
        let fields = self
            .fields
            .into_iter()
            .enumerate()
            .map(|(index, (name, ty, nullable))| Field {
                id: FieldId { model: id, index },
                name,
                ty,
                nullable,
            })
            .collect();

        self.schema.models.push(Model {
            id,
            name: self.name,
            kind: ModelKind::Record,
            fields,
        });

        id
    }
}
