pub mod capability;
pub use capability::Capability;

mod codec;
pub use codec::{DocumentCodec, Encoded, StorageClass};

mod column;
pub use column::DocumentColumn;

mod error;
pub use error::Error;

pub mod host;

mod instance;
pub use instance::Instance;

pub mod schema;
pub use schema::Schema;

mod track;
pub use track::{Tracked, TrackedList, TrackedMap, TrackedRecord};

mod tracking;
pub use tracking::{AttributeListener, MutationTracking};

pub mod value;
pub use value::Value;

/// A Result type alias that uses docfield's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
