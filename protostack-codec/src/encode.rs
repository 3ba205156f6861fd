//! The encode engine: strict descriptor-order field emission.

use crate::convert::write_scalar;
use crate::registry::Registry;
use crate::value::Value;
use protostack_schema::{
    CompositeSchema, FieldDescriptor, FieldKind, LogicalType, MessageSchema, VariantSchema,
};
use protostack_wire::{EncodeError, EncodeResult, Encoder, Path, PayloadKind};

fn mismatch(path: &Path, expected: &'static str) -> EncodeError {
    EncodeError::Mismatch {
        path: path.clone(),
        expected,
    }
}

/// Encodes one composite of any shape.
pub(crate) fn composite(
    reg: &Registry,
    schema: &CompositeSchema,
    value: &Value,
    e: &mut Encoder,
    path: &Path,
) -> EncodeResult<()> {
    match schema {
        CompositeSchema::Message(m) => message(reg, m, value, e, path),
        CompositeSchema::Variant(v) => variant(reg, v, value, e, path),
    }
}

/// Writes a payload-free case as a single un-keyed varint.
pub(crate) fn bare_case(
    variant: &VariantSchema,
    value: &Value,
    e: &mut Encoder,
    path: &Path,
) -> EncodeResult<()> {
    let Value::Case { name, args } = value else {
        return Err(mismatch(path, "variant case"));
    };
    let case = variant
        .case_by_name(name)
        .ok_or_else(|| mismatch(path, "known case"))?;
    if case.has_payload() || !args.is_empty() {
        return Err(mismatch(&path.child(case.name()), "payload-free case"));
    }
    e.varint(u64::from(case.key()));
    Ok(())
}

/// Emits one field value with its tag, framing nested references.
fn single(
    reg: &Registry,
    desc: &FieldDescriptor,
    value: &Value,
    e: &mut Encoder,
    path: &Path,
) -> EncodeResult<()> {
    match desc.logical_type() {
        LogicalType::Reference(name) => {
            if let Some(bare) = reg.bare_variant(name) {
                e.key(desc.key(), PayloadKind::Varint);
                bare_case(bare, value, e, path)
            } else {
                let schema = reg.get(name).ok_or_else(|| EncodeError::UnknownType {
                    name: name.clone(),
                })?;
                e.key(desc.key(), PayloadKind::Bytes);
                e.nested(|inner| composite(reg, schema, value, inner, path))
            }
        }
        ty => {
            e.key(desc.key(), desc.payload_kind());
            write_scalar(e, ty, desc.encoding(), value, path)
        }
    }
}

/// Emits one field according to its kind; `value` is `None` for an absent
/// optional or repeated field.
fn field(
    reg: &Registry,
    desc: &FieldDescriptor,
    value: Option<&Value>,
    e: &mut Encoder,
    path: &Path,
) -> EncodeResult<()> {
    match desc.kind() {
        FieldKind::Required => {
            let value = value.ok_or_else(|| mismatch(path, "required value"))?;
            single(reg, desc, value, e, path)
        }
        FieldKind::Optional => match value {
            Some(value) => single(reg, desc, value, e, path),
            None => Ok(()),
        },
        FieldKind::Repeated => {
            let Some(value) = value else {
                return Ok(());
            };
            let Value::List(items) = value else {
                return Err(mismatch(path, "list"));
            };
            for (i, item) in items.iter().enumerate() {
                single(reg, desc, item, e, &path.index(i))?;
            }
            Ok(())
        }
    }
}

fn message(
    reg: &Registry,
    schema: &MessageSchema,
    value: &Value,
    e: &mut Encoder,
    path: &Path,
) -> EncodeResult<()> {
    if schema.is_positional() {
        let Value::Tuple(items) = value else {
            return Err(mismatch(path, "tuple"));
        };
        if items.len() != schema.fields().len() {
            return Err(mismatch(path, "one value per tuple element"));
        }
        for (desc, item) in schema.fields().iter().zip(items) {
            let field_path = path.child(desc.name());
            let present = match item {
                Value::Null => None,
                present => Some(present),
            };
            field(reg, desc, present, e, &field_path)?;
        }
    } else {
        let Value::Record(entries) = value else {
            return Err(mismatch(path, "record"));
        };
        for desc in schema.fields() {
            let field_path = path.child(desc.name());
            let present = entries
                .iter()
                .find(|(n, _)| n == desc.name())
                .map(|(_, v)| v)
                .filter(|v| !matches!(v, Value::Null));
            field(reg, desc, present, e, &field_path)?;
        }
    }
    Ok(())
}

fn variant(
    reg: &Registry,
    schema: &VariantSchema,
    value: &Value,
    e: &mut Encoder,
    path: &Path,
) -> EncodeResult<()> {
    let Value::Case { name, args } = value else {
        return Err(mismatch(path, "variant case"));
    };
    let case = schema
        .case_by_name(name)
        .ok_or_else(|| mismatch(path, "known case"))?;

    if !case.has_payload() {
        if !args.is_empty() {
            return Err(mismatch(&path.child(case.name()), "no arguments"));
        }
        e.key(case.key(), PayloadKind::Varint);
        e.varint(1);
        return Ok(());
    }

    if args.len() != case.args().len() {
        return Err(mismatch(&path.child(case.name()), "one value per argument"));
    }
    for (desc, arg) in case.args().iter().zip(args) {
        single(reg, desc, arg, e, &path.child(desc.name()))?;
    }
    Ok(())
}
