//! Wire-level payload kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The wire-level shape of one encoded value.
///
/// Every field tag carries one of these in its low three bits; the kind
/// determines how the bytes that follow are consumed, independently of the
/// logical type a schema assigns to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    /// Base-128 little-endian integer terminated by a clear continuation bit.
    Varint,
    /// Four little-endian bytes.
    Bits32,
    /// Eight little-endian bytes.
    Bits64,
    /// Varint length followed by that many raw bytes.
    Bytes,
}

impl PayloadKind {
    /// Maps a 3-bit wire type to a payload kind.
    ///
    /// Wire types 3 and 4 (deprecated group delimiters) and 6–7 are not
    /// valid in this format and map to `None`.
    #[must_use]
    pub fn from_wire_type(wire_type: u8) -> Option<Self> {
        match wire_type {
            0 => Some(Self::Varint),
            1 => Some(Self::Bits64),
            2 => Some(Self::Bytes),
            5 => Some(Self::Bits32),
            _ => None,
        }
    }

    /// Returns the 3-bit wire type for this kind.
    #[must_use]
    pub const fn wire_type(self) -> u8 {
        match self {
            Self::Varint => 0,
            Self::Bits64 => 1,
            Self::Bytes => 2,
            Self::Bits32 => 5,
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Varint => "varint",
            Self::Bits32 => "bits32",
            Self::Bits64 => "bits64",
            Self::Bytes => "bytes",
        };
        f.write_str(name)
    }
}
