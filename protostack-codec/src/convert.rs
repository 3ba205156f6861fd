//! Conversion between raw wire words and dynamic values.
//!
//! Decode reads a raw word per the field's *encoding*, then interprets it
//! against the field's *logical type*; encode performs the inverse
//! narrowing. Every narrowing is range-checked: an unrepresentable value
//! fails with `Overflow` on the field's path, never a silent truncation.
//! Pairings outside the compatibility matrix are unconstructible through
//! the schema resolver, so they do not appear here.

use crate::value::Value;
use protostack_schema::{Encoding, LogicalType};
use protostack_wire::{
    bits32_from_i64, bits32_from_u64, bool_from_u64, i32_from_i64, i64_from_bits32, u32_from_i64,
    u32_from_u64, DecodeError, DecodeResult, Decoder, EncodeError, EncodeResult, Encoder, Path,
};

/// One raw wire value, read per the field's encoding but not yet
/// interpreted against the logical type.
pub(crate) enum RawValue<'a> {
    Varint(u64),
    Zigzag(i64),
    Bits32(u32),
    Bits64(u64),
    Bytes(&'a [u8]),
}

/// Reads one raw value of the given encoding.
pub(crate) fn read_raw<'a>(d: &mut Decoder<'a>, encoding: Encoding) -> DecodeResult<RawValue<'a>> {
    Ok(match encoding {
        Encoding::Bool | Encoding::Varint => RawValue::Varint(d.varint()?),
        Encoding::Zigzag => RawValue::Zigzag(d.zigzag()?),
        Encoding::Bits32 => RawValue::Bits32(d.bits32()?),
        Encoding::Bits64 => RawValue::Bits64(d.bits64()?),
        Encoding::Bytes => RawValue::Bytes(d.bytes()?),
    })
}

/// Interprets a raw wire value against a scalar logical type.
pub(crate) fn scalar_value(
    ty: &LogicalType,
    raw: RawValue<'_>,
    path: &Path,
) -> DecodeResult<Value> {
    Ok(match (ty, raw) {
        (LogicalType::Bool, RawValue::Varint(v)) => Value::Bool(bool_from_u64(v)),

        (LogicalType::Int, RawValue::Varint(v) | RawValue::Bits64(v)) => Value::Int(v as i64),
        (LogicalType::Int, RawValue::Zigzag(v)) => Value::Int(v),
        (LogicalType::Int, RawValue::Bits32(w)) => Value::Int(i64_from_bits32(w)),

        (LogicalType::Int32, RawValue::Bits32(w)) => Value::Int32(w as i32),
        (LogicalType::Int32, RawValue::Varint(v) | RawValue::Bits64(v)) => {
            Value::Int32(i32_from_i64(v as i64, path)?)
        }
        (LogicalType::Int32, RawValue::Zigzag(v)) => Value::Int32(i32_from_i64(v, path)?),

        (LogicalType::Int64, RawValue::Varint(v) | RawValue::Bits64(v)) => Value::Int64(v as i64),
        (LogicalType::Int64, RawValue::Zigzag(v)) => Value::Int64(v),
        (LogicalType::Int64, RawValue::Bits32(w)) => Value::Int64(i64_from_bits32(w)),

        (LogicalType::UInt32, RawValue::Bits32(w)) => Value::UInt32(w),
        (LogicalType::UInt32, RawValue::Varint(v) | RawValue::Bits64(v)) => {
            Value::UInt32(u32_from_u64(v, path)?)
        }
        (LogicalType::UInt32, RawValue::Zigzag(v)) => Value::UInt32(u32_from_i64(v, path)?),

        (LogicalType::UInt64, RawValue::Varint(v) | RawValue::Bits64(v)) => Value::UInt64(v),
        (LogicalType::UInt64, RawValue::Zigzag(v)) => Value::UInt64(v as u64),
        (LogicalType::UInt64, RawValue::Bits32(w)) => Value::UInt64(u64::from(w)),

        (LogicalType::Double, RawValue::Bits32(w)) => Value::Double(f64::from(f32::from_bits(w))),
        (LogicalType::Double, RawValue::Bits64(v)) => Value::Double(f64::from_bits(v)),

        (LogicalType::String, RawValue::Bytes(b)) => Value::Str(
            String::from_utf8(b.to_vec()).map_err(|_| DecodeError::InvalidUtf8 {
                path: path.clone(),
            })?,
        ),

        _ => unreachable!("pairing rejected at schema resolution"),
    })
}

/// Writes one scalar value with the inverse narrowing.
pub(crate) fn write_scalar(
    e: &mut Encoder,
    ty: &LogicalType,
    encoding: Encoding,
    value: &Value,
    path: &Path,
) -> EncodeResult<()> {
    let mismatch = |expected: &'static str| EncodeError::Mismatch {
        path: path.clone(),
        expected,
    };
    match ty {
        LogicalType::Bool => {
            let Value::Bool(b) = value else {
                return Err(mismatch("bool"));
            };
            e.varint(u64::from(*b));
        }
        LogicalType::Int => {
            let Value::Int(v) = value else {
                return Err(mismatch("int"));
            };
            write_signed(e, encoding, *v, path)?;
        }
        LogicalType::Int32 => {
            let Value::Int32(v) = value else {
                return Err(mismatch("int32"));
            };
            write_signed(e, encoding, i64::from(*v), path)?;
        }
        LogicalType::Int64 => {
            let Value::Int64(v) = value else {
                return Err(mismatch("int64"));
            };
            write_signed(e, encoding, *v, path)?;
        }
        LogicalType::UInt32 => {
            let Value::UInt32(v) = value else {
                return Err(mismatch("uint32"));
            };
            write_unsigned(e, encoding, u64::from(*v), path)?;
        }
        LogicalType::UInt64 => {
            let Value::UInt64(v) = value else {
                return Err(mismatch("uint64"));
            };
            write_unsigned(e, encoding, *v, path)?;
        }
        LogicalType::Double => {
            let Value::Double(v) = value else {
                return Err(mismatch("double"));
            };
            match encoding {
                Encoding::Bits32 => e.bits32((*v as f32).to_bits()),
                Encoding::Bits64 => e.bits64(v.to_bits()),
                _ => unreachable!("pairing rejected at schema resolution"),
            }
        }
        LogicalType::String => {
            let Value::Str(s) = value else {
                return Err(mismatch("string"));
            };
            e.bytes(s.as_bytes());
        }
        LogicalType::Reference(_) => unreachable!("references are framed by the engine"),
    }
    Ok(())
}

fn write_signed(e: &mut Encoder, encoding: Encoding, v: i64, path: &Path) -> EncodeResult<()> {
    match encoding {
        Encoding::Varint => e.varint(v as u64),
        Encoding::Zigzag => e.zigzag(v),
        Encoding::Bits64 => e.bits64(v as u64),
        Encoding::Bits32 => e.bits32(bits32_from_i64(v, path)?),
        _ => unreachable!("pairing rejected at schema resolution"),
    }
    Ok(())
}

fn write_unsigned(e: &mut Encoder, encoding: Encoding, v: u64, path: &Path) -> EncodeResult<()> {
    match encoding {
        Encoding::Varint => e.varint(v),
        Encoding::Zigzag => e.zigzag(v as i64),
        Encoding::Bits64 => e.bits64(v),
        Encoding::Bits32 => e.bits32(bits32_from_u64(v, path)?),
        _ => unreachable!("pairing rejected at schema resolution"),
    }
    Ok(())
}
