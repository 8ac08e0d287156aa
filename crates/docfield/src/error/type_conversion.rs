use crate::Value;

/// Error when a value cannot be converted to the expected type.
#[derive(Debug)]
pub(super) struct TypeConversionError {
    found: crate::schema::Type,
    to_type: Box<str>,
}

impl std::error::Error for TypeConversionError {}

impl core::fmt::Display for TypeConversionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cannot convert {:?} to {}", self.found, self.to_type)
    }
}

impl super::Error {
    /// Creates a type conversion error.
    pub fn type_conversion(value: &Value, to_type: impl Into<String>) -> super::Error {
        super::Error::from(super::ErrorKind::TypeConversion(TypeConversionError {
            found: value.infer_ty(),
            to_type: to_type.into().into(),
        }))
    }

    /// Returns `true` if this error is a type conversion error.
    pub fn is_type_conversion(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TypeConversion(_))
    }
}
