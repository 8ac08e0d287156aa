use crate::Instance;

/// Identifies a mapped class within the host mapper.
///
/// Used to filter listener installation so a hook registered for a base
/// class's descriptor does not fire again for every subclass inheriting it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ClassId(pub usize);

/// A mapped attribute descriptor: the attribute key plus the class the
/// descriptor resolves on.
#[derive(Debug, Clone)]
pub struct MappedAttribute {
    pub key: String,
    pub class_: ClassId,
}

/// One mapped row object, as seen by the tracker.
///
/// The host mapper implements this for its row objects: a per-instance state
/// dict plus the owning session's change ledger. The tracker reads and writes
/// attribute state only through these accessors, and identity is the `Rc`
/// handle itself. Owner back-references hold the row weakly, so registering a
/// value's owner never keeps the row alive.
pub trait MappedRow {
    /// Reads the attribute's current value from the row's state dict.
    fn get_attribute(&self, key: &str) -> Option<Instance>;

    /// Replaces the attribute's stored value without firing set events.
    fn put_attribute(&self, key: &str, value: Option<Instance>);

    /// Marks the attribute as modified in the owning session's change ledger.
    fn flag_modified(&self, key: &str);
}

/// Auxiliary side list carried through the host's serialization boundary.
///
/// Tracked values are stashed here when a row is pickled so wrapper identity
/// survives the round-trip; unpickling re-attaches them to the reconstituted
/// row.
#[derive(Default)]
pub struct PickleState {
    values: Vec<(String, Instance)>,
}

impl PickleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn push(&mut self, key: &str, value: Instance) {
        self.values.push((key.to_string(), value));
    }

    pub(crate) fn values_for<'a>(
        &'a self,
        key: &'a str,
    ) -> impl Iterator<Item = &'a Instance> + 'a {
        self.values
            .iter()
            .filter(move |(stashed, _)| stashed == key)
            .map(|(_, value)| value)
    }
}
