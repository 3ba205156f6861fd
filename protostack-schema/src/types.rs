//! Logical types, wire encodings, and field kinds.

use protostack_wire::PayloadKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The wire representation chosen for a logical field.
///
/// Orthogonal to the logical type: a 64-bit integer may ride as a varint, a
/// zigzag varint, or a fixed word, as long as the pairing is in the
/// compatibility matrix ([`LogicalType::allows`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Varint restricted to 0/1 on the write side.
    Bool,
    /// Plain base-128 varint.
    Varint,
    /// Zigzag-mapped varint, compact for small negative magnitudes.
    Zigzag,
    /// Fixed four-byte little-endian word.
    Bits32,
    /// Fixed eight-byte little-endian word.
    Bits64,
    /// Length-delimited byte block.
    Bytes,
}

impl Encoding {
    /// Parses an explicit encoding annotation.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Bool),
            "varint" => Some(Self::Varint),
            "zigzag" => Some(Self::Zigzag),
            "bits32" => Some(Self::Bits32),
            "bits64" => Some(Self::Bits64),
            "bytes" => Some(Self::Bytes),
            _ => None,
        }
    }

    /// Returns the payload kind this encoding rides on.
    #[must_use]
    pub const fn payload_kind(self) -> PayloadKind {
        match self {
            Self::Bool | Self::Varint | Self::Zigzag => PayloadKind::Varint,
            Self::Bits32 => PayloadKind::Bits32,
            Self::Bits64 => PayloadKind::Bits64,
            Self::Bytes => PayloadKind::Bytes,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Varint => "varint",
            Self::Zigzag => "zigzag",
            Self::Bits32 => "bits32",
            Self::Bits64 => "bits64",
            Self::Bytes => "bytes",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The logical (in-memory) type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalType {
    /// Boolean.
    Bool,
    /// Platform integer, carried as 64 bits in the dynamic model.
    Int,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Unsigned 64-bit integer.
    UInt64,
    /// Double-precision float.
    Double,
    /// UTF-8 string.
    String,
    /// Reference to another composite schema, by name.
    Reference(String),
}

impl LogicalType {
    /// Returns the encoding used when a field carries no explicit
    /// annotation.
    #[must_use]
    pub fn default_encoding(&self) -> Encoding {
        match self {
            Self::Bool => Encoding::Bool,
            Self::Int => Encoding::Varint,
            Self::Int32 | Self::UInt32 => Encoding::Bits32,
            Self::Int64 | Self::UInt64 | Self::Double => Encoding::Bits64,
            Self::String | Self::Reference(_) => Encoding::Bytes,
        }
    }

    /// Returns true when this type may be represented with the given
    /// encoding.
    ///
    /// This is the full compatibility matrix; no pairing outside it is
    /// constructible through the resolver.
    #[must_use]
    pub fn allows(&self, encoding: Encoding) -> bool {
        match self {
            Self::Bool => encoding == Encoding::Bool,
            Self::Int | Self::Int32 | Self::Int64 | Self::UInt32 | Self::UInt64 => matches!(
                encoding,
                Encoding::Varint | Encoding::Zigzag | Encoding::Bits32 | Encoding::Bits64
            ),
            Self::Double => matches!(encoding, Encoding::Bits32 | Encoding::Bits64),
            Self::String | Self::Reference(_) => encoding == Encoding::Bytes,
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Int32 => f.write_str("int32"),
            Self::Int64 => f.write_str("int64"),
            Self::UInt32 => f.write_str("uint32"),
            Self::UInt64 => f.write_str("uint64"),
            Self::Double => f.write_str("double"),
            Self::String => f.write_str("string"),
            Self::Reference(name) => f.write_str(name),
        }
    }
}

/// How often a field appears in its composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Exactly once; missing on decode is an error.
    Required,
    /// At most once; absence is a valid value.
    Optional,
    /// Any number of times, in source order.
    Repeated,
}
