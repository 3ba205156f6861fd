//! Checked numeric narrowing shared by schema-driven and handwritten codecs.
//!
//! Every narrowing is range-checked; a value that cannot be represented
//! exactly in the target width fails with `Overflow` naming the field it
//! belonged to. Truncation is never silent.

use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult, Path};

/// Narrows a signed 64-bit value to 32 bits.
pub fn i32_from_i64(v: i64, path: &Path) -> DecodeResult<i32> {
    i32::try_from(v).map_err(|_| DecodeError::Overflow { path: path.clone() })
}

/// Narrows an unsigned 64-bit value to 32 bits.
pub fn u32_from_u64(v: u64, path: &Path) -> DecodeResult<u32> {
    u32::try_from(v).map_err(|_| DecodeError::Overflow { path: path.clone() })
}

/// Narrows a signed 64-bit value to an unsigned 32-bit one.
///
/// Negative values are out of range by definition.
pub fn u32_from_i64(v: i64, path: &Path) -> DecodeResult<u32> {
    u32::try_from(v).map_err(|_| DecodeError::Overflow { path: path.clone() })
}

/// Sign-extends a raw 32-bit wire word to a signed 64-bit value.
#[must_use]
pub fn i64_from_bits32(raw: u32) -> i64 {
    i64::from(raw as i32)
}

/// Interprets a varint pattern as a boolean: any nonzero value is true.
#[must_use]
pub fn bool_from_u64(v: u64) -> bool {
    v != 0
}

/// Narrows a signed 64-bit value to a 32-bit wire word for encoding.
pub fn bits32_from_i64(v: i64, path: &Path) -> EncodeResult<u32> {
    i32::try_from(v)
        .map(|v| v as u32)
        .map_err(|_| EncodeError::Overflow { path: path.clone() })
}

/// Narrows an unsigned 64-bit value to a 32-bit wire word for encoding.
pub fn bits32_from_u64(v: u64, path: &Path) -> EncodeResult<u32> {
    u32::try_from(v).map_err(|_| EncodeError::Overflow { path: path.clone() })
}
