//! Error types and field paths for the runtime codec.
//!
//! Decode and encode have disjoint error channels. Errors that point at a
//! specific field carry a dotted [`Path`] naming the owning composite and
//! every traversed field, tuple index, or variant case, so a failure deep in
//! a nested message stays attributable.

use crate::PayloadKind;
use std::fmt;
use thiserror::Error;

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for encode operations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Dotted path identifying a field across nested composites.
///
/// Built from the owning composite's name followed by each traversed
/// segment, e.g. `Person.address.street` or `Pair.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path(String);

impl Path {
    /// Starts a path at a composite type's name.
    #[must_use]
    pub fn root(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Extends the path with a field or case name.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        Self(format!("{}.{}", self.0, segment))
    }

    /// Extends the path with a positional (tuple or argument) index.
    #[must_use]
    pub fn index(&self, position: usize) -> Self {
        self.child(&position.to_string())
    }

    /// Returns the rendered dotted path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised while decoding a message.
///
/// Unknown field numbers are not an error; they are skipped to keep old
/// readers compatible with newer writers. Everything else aborts the decode
/// immediately; no partially-decoded composite is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// The buffer ended in the middle of a value.
    #[error("input ended unexpectedly")]
    Incomplete,

    /// A varint ran past the ten-byte maximum without terminating.
    #[error("varint exceeds ten bytes")]
    OverlongVarint,

    /// A tag carried a wire type this format does not define.
    #[error("unsupported wire type {wire_type}")]
    MalformedField { wire_type: u8 },

    /// A wire value does not fit the field's in-memory representation.
    #[error("value of `{path}` is out of range")]
    Overflow { path: Path },

    /// A known field arrived with the wrong payload kind.
    #[error("`{path}` has unexpected {kind} payload")]
    UnexpectedPayload { path: Path, kind: PayloadKind },

    /// A required field never appeared in the message.
    #[error("required field `{path}` is missing")]
    MissingField { path: Path },

    /// A variant message selected no case, or more than one.
    #[error("variant `{path}` is malformed")]
    MalformedVariant { path: Path },

    /// A string field holds bytes that are not valid UTF-8.
    #[error("`{path}` is not valid UTF-8")]
    InvalidUtf8 { path: Path },

    /// No schema is registered under the requested type name.
    #[error("no schema registered for type `{name}`")]
    UnknownType { name: String },
}

/// Errors raised while encoding a message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// An in-memory value does not fit the field's wire encoding.
    #[error("value of `{path}` is out of range for its encoding")]
    Overflow { path: Path },

    /// A dynamic value's shape does not match the schema.
    #[error("value of `{path}` does not match the schema (expected {expected})")]
    Mismatch { path: Path, expected: &'static str },

    /// No schema is registered under the requested type name.
    #[error("no schema registered for type `{name}`")]
    UnknownType { name: String },
}
