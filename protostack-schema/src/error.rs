//! Schema-resolution errors.

use crate::types::Encoding;
use thiserror::Error;

/// Result type for schema resolution.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while resolving declarations into schemas.
///
/// These surface when schemas are compiled, before any message is ever
/// processed, and are disjoint from the runtime decode/encode errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The declared type cannot be serialized: an unsupported scalar, or an
    /// optional/repeated wrapper nested inside another wrapper.
    #[error("field `{field}` of `{composite}`: type `{ty}` cannot be serialized")]
    WrongType {
        composite: String,
        field: String,
        ty: String,
    },

    /// A field has neither an explicit key nor a positional default.
    #[error("field `{field}` of `{composite}` has no key")]
    MissingKey { composite: String, field: String },

    /// A key lies outside [1, 0x1FFF_FFFF].
    #[error("field `{field}` of `{composite}`: key {key} is out of range")]
    KeyOutOfRange {
        composite: String,
        field: String,
        key: u32,
    },

    /// A key lies in the range reserved by the wire format.
    #[error("field `{field}` of `{composite}`: key {key} is reserved")]
    ReservedKey {
        composite: String,
        field: String,
        key: u32,
    },

    /// An explicit encoding annotation names no known encoding.
    #[error("field `{field}` of `{composite}`: unknown encoding `{name}`")]
    UnknownEncoding {
        composite: String,
        field: String,
        name: String,
    },

    /// The logical type cannot be represented with the chosen encoding.
    #[error("field `{field}` of `{composite}`: no conversion between {ty} and {encoding}")]
    NoConversion {
        composite: String,
        field: String,
        ty: String,
        encoding: Encoding,
    },

    /// A type parameter was never bound to an argument.
    #[error("field `{field}` of `{composite}`: unbound type parameter `{param}`")]
    UnboundParam {
        composite: String,
        field: String,
        param: String,
    },

    /// `instantiate` was called with the wrong number of type arguments.
    #[error("`{composite}` takes {expected} type argument(s), got {got}")]
    WrongArity {
        composite: String,
        expected: usize,
        got: usize,
    },

    /// A referenced composite was never registered.
    #[error("`{composite}` references unregistered type `{reference}`")]
    UnresolvedReference {
        composite: String,
        reference: String,
    },
}
