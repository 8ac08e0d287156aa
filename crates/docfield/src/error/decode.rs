use super::Error;

/// Error when a stored column value fails to parse or fails schema validation
/// on read.
///
/// This covers both syntactic failures (the blob is not valid JSON) and
/// semantic ones (the parsed document does not conform to the declared model
/// definition). Either way the read fails; corrupt data is never silently
/// defaulted.
#[derive(Debug)]
pub(super) struct DecodeError {
    message: Box<str>,
}

impl std::error::Error for DecodeError {}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "failed to decode stored document: {}", self.message)
    }
}

impl Error {
    /// Creates a decode error.
    ///
    /// The message should name the offending path within the document, e.g.
    /// `$.meta.foo: expected String, found I64`.
    pub fn decode(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Decode(DecodeError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a decode error.
    pub fn is_decode(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Decode(_))
    }
}
