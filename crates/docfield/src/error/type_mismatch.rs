use super::Error;

/// Error when a mapped attribute is assigned a value that is not an instance
/// of its declared model definition.
///
/// Raised by coercion before any owner bookkeeping happens, so a failed
/// assignment leaves no partial tracking state behind.
#[derive(Debug)]
pub(super) struct TypeMismatchError {
    attribute: Box<str>,
    actual: Box<str>,
}

impl std::error::Error for TypeMismatchError {}

impl core::fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "attribute '{}' does not accept objects of type {}",
            self.attribute, self.actual
        )
    }
}

impl Error {
    /// Creates a type mismatch error for the given attribute.
    pub fn type_mismatch(attribute: impl Into<String>, actual: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::TypeMismatch(TypeMismatchError {
            attribute: attribute.into().into(),
            actual: actual.into().into(),
        }))
    }

    /// Returns `true` if this error is a type mismatch error.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TypeMismatch(_))
    }
}
