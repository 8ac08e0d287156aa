mod json;

use crate::{
    capability::Capability,
    schema::{Model, ModelId, Schema, Type},
    Error, Instance, Result,
};

use std::sync::Arc;

/// Storage representation negotiated with the column engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StorageClass {
    /// Plain text column holding the serialized document
    Text,

    /// Native structured JSON column
    Json,
}

/// One stored column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    Text(String),
    Json(serde_json::Value),
}

impl Encoded {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(json) => Some(json),
            Self::Text(_) => None,
        }
    }
}

/// Converts document instances to and from their stored column form.
#[derive(Clone)]
pub struct DocumentCodec {
    schema: Arc<Schema>,
    model: ModelId,
}

impl DocumentCodec {
    pub fn new(schema: Arc<Schema>, model: ModelId) -> Self {
        // Fail fast on a model id from another schema.
        let _ = schema.model(model);
        Self { schema, model }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn model(&self) -> &Model {
        self.schema.model(self.model)
    }

    /// Selects the storage representation for the given engine: native JSON
    /// when the engine has one, plain text otherwise.
    pub fn storage_class(&self, capability: &Capability) -> StorageClass {
        if capability.storage_types.json {
            StorageClass::Json
        } else {
            StorageClass::Text
        }
    }

    /// Serializes the instance for storage. `None` passes through unchanged
    /// and is stored as SQL NULL.
    ///
    /// Output is canonical: record fields in declaration order, compact JSON.
    pub fn encode(&self, value: Option<&Instance>, class: StorageClass) -> Option<Encoded> {
        let value = value?;
        let json = json::to_json(&self.schema, &Type::Model(self.model), &value.to_value());

        Some(match class {
            StorageClass::Json => Encoded::Json(json),
            StorageClass::Text => Encoded::Text(json.to_string()),
        })
    }

    /// Serializes the instance for direct embedding in a query rather than
    /// parameter binding. Re-use of [`encode`](Self::encode).
    pub fn literal_encode(
        &self,
        value: Option<&Instance>,
        class: StorageClass,
    ) -> Option<Encoded> {
        self.encode(value, class)
    }

    /// Parses a stored column value back into a validated, wrapped instance.
    /// The column's `None` decodes to `None`.
    ///
    /// Parsing is restricted to the declared model definition: only its
    /// types are ever constructed, and anything else — malformed JSON,
    /// unknown fields, shape or type mismatches — fails with a decode error.
    pub fn decode(&self, raw: Option<Encoded>) -> Result<Option<Instance>> {
        let Some(raw) = raw else { return Ok(None) };

        let parsed;
        let json = match &raw {
            Encoded::Json(json) => json,
            Encoded::Text(text) => {
                parsed = serde_json::from_str::<serde_json::Value>(text)
                    .map_err(|err| Error::decode(format!("invalid JSON: {err}")))?;
                &parsed
            }
        };

        let value = json::from_json(&self.schema, &Type::Model(self.model), json, "$")?;
        Ok(Some(Instance::from_valid(
            self.schema.clone(),
            self.model,
            value,
        )))
    }
}
