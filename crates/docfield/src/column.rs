use crate::{
    capability::Capability,
    codec::{DocumentCodec, Encoded, StorageClass},
    host::{ClassId, MappedAttribute},
    schema::{Model, ModelId, Schema},
    tracking::{AttributeListener, MutationTracking},
    Instance, Result,
};

use std::sync::Arc;

/// A document column type: the codec for one model definition bundled with
/// its mutation tracker.
///
/// This is the piece a host mapper binds to a mapped column — it negotiates
/// storage, converts values at the bind/result boundary, and installs the
/// lifecycle listener that keeps in-place edits observable.
#[derive(Clone)]
pub struct DocumentColumn {
    codec: DocumentCodec,
    tracking: MutationTracking,
}

impl DocumentColumn {
    pub fn new(schema: Arc<Schema>, model: ModelId) -> Self {
        Self {
            codec: DocumentCodec::new(schema.clone(), model),
            tracking: MutationTracking::new(schema, model),
        }
    }

    pub fn codec(&self) -> &DocumentCodec {
        &self.codec
    }

    pub fn tracking(&self) -> &MutationTracking {
        &self.tracking
    }

    pub fn model(&self) -> &Model {
        self.codec.model()
    }

    pub fn storage_class(&self, capability: &Capability) -> StorageClass {
        self.codec.storage_class(capability)
    }

    pub fn encode(&self, value: Option<&Instance>, class: StorageClass) -> Option<Encoded> {
        self.codec.encode(value, class)
    }

    pub fn literal_encode(
        &self,
        value: Option<&Instance>,
        class: StorageClass,
    ) -> Option<Encoded> {
        self.codec.literal_encode(value, class)
    }

    pub fn decode(&self, raw: Option<Encoded>) -> Result<Option<Instance>> {
        self.codec.decode(raw)
    }

    pub fn listen_on_attribute(
        &self,
        attribute: &MappedAttribute,
        coerce: bool,
        parent_cls: ClassId,
    ) -> Option<AttributeListener> {
        self.tracking.listen_on_attribute(attribute, coerce, parent_cls)
    }
}
