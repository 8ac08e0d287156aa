use crate::{
    host::{ClassId, MappedAttribute, MappedRow, PickleState},
    schema::{Model, ModelId, Schema},
    Instance, Result,
};

use std::rc::Rc;
use std::sync::Arc;

/// Makes in-place edits of a decoded document observable by the owning row's
/// change ledger.
///
/// One tracker serves one model definition; isolation between definitions
/// comes from the parameter, not from a synthesized type per schema.
#[derive(Clone)]
pub struct MutationTracking {
    schema: Arc<Schema>,
    model: ModelId,
}

impl MutationTracking {
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

    /// Validates that `value` is an instance of this tracker's model
    /// definition.
    ///
    /// `None` passes through. A foreign instance fails with a type mismatch
    /// before any owner bookkeeping happens. A conforming instance is already
    /// wrapped, so coercion is the identity on it.
    pub fn coerce(&self, key: &str, value: Option<Instance>) -> Result<Option<Instance>> {
        let Some(value) = value else { return Ok(None) };

        if value.model_id() != self.model || !Arc::ptr_eq(value.schema(), &self.schema) {
            return Err(crate::Error::type_mismatch(key, &value.model().name));
        }

        Ok(Some(value))
    }

    /// Establishes this tracker as a mutation listener for the given mapped
    /// attribute descriptor.
    ///
    /// Returns `None` unless the attribute's declaring class is exactly
    /// `parent_cls`, so a descriptor inherited from a base class does not
    /// produce a second listener for every subclass.
    pub fn listen_on_attribute(
        &self,
        attribute: &MappedAttribute,
        coerce: bool,
        parent_cls: ClassId,
    ) -> Option<AttributeListener> {
        if parent_cls != attribute.class_ {
            return None;
        }

        log::debug!(
            "installing mutation listener for attribute '{}' of model {}",
            attribute.key,
            self.model().name
        );

        Some(AttributeListener {
            tracking: self.clone(),
            key: Rc::from(&*attribute.key),
            coerce,
        })
    }
}

/// The five lifecycle hook points for one mapped attribute. The host calls
/// these at its documented lifecycle moments; each executes fully before
/// returning.
pub struct AttributeListener {
    tracking: MutationTracking,
    key: Rc<str>,
    coerce: bool,
}

impl AttributeListener {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The row was freshly loaded from storage or refreshed: wrap the
    /// attribute's current value and register the row as its owner.
    pub fn load(&self, row: &Rc<dyn MappedRow>) -> Result<()> {
        let Some(value) = row.get_attribute(&self.key) else {
            return Ok(());
        };

        let value = if self.coerce {
            let value = self
                .tracking
                .coerce(&self.key, Some(value))?
                .expect("coerce of a present value is present");
            row.put_attribute(&self.key, Some(value.clone()));
            value
        } else {
            value
        };

        log::trace!("attaching owner for attribute '{}' on load", self.key);
        value.attach_owner(row, &self.key);
        Ok(())
    }

    /// Only a subset of attributes was refreshed: run load-time wiring when
    /// this attribute is in the subset, or when no subset was given (all).
    pub fn refresh(&self, row: &Rc<dyn MappedRow>, attrs: Option<&[&str]>) -> Result<()> {
        match attrs {
            Some(attrs) if !attrs.contains(&&*self.key) => Ok(()),
            _ => self.load(row),
        }
    }

    /// The attribute is being assigned. Returns the value to actually store.
    ///
    /// Re-assigning the identical document is a pass-through with no tracking
    /// change. Otherwise the incoming value is coerced (failures propagate
    /// before any owner mutation), the row is registered on it, and the
    /// outgoing value's registration is removed.
    pub fn set(
        &self,
        row: &Rc<dyn MappedRow>,
        value: Option<Instance>,
        old_value: Option<Instance>,
    ) -> Result<Option<Instance>> {
        match (&value, &old_value) {
            (Some(new), Some(old)) if new.is(old) => return Ok(value),
            (None, None) => return Ok(None),
            _ => {}
        }

        let value = self.tracking.coerce(&self.key, value)?;

        if let Some(new) = &value {
            new.attach_owner(row, &self.key);
        }
        if let Some(old) = &old_value {
            // Only values of this tracker's kind carry its registrations.
            if old.model_id() == self.tracking.model {
                old.detach_owner(row, &self.key);
            }
        }

        log::trace!("attribute '{}' replaced", self.key);
        Ok(value)
    }

    /// The row is being serialized for transport or caching: stash the
    /// tracked value in the side list so wrapper identity survives.
    pub fn pickle(&self, row: &Rc<dyn MappedRow>, side: &mut PickleState) {
        if let Some(value) = row.get_attribute(&self.key) {
            side.push(&self.key, value);
        }
    }

    /// The row was deserialized: re-register it as owner of every value
    /// stashed for this attribute.
    pub fn unpickle(&self, row: &Rc<dyn MappedRow>, side: &PickleState) {
        for value in side.values_for(&self.key) {
            value.attach_owner(row, &self.key);
        }
    }
}
