//! The decode engine: a tag-dispatch state machine per composite.
//!
//! One slot per field descriptor accumulates values while the message is
//! scanned; unknown field numbers are skipped; the composite materializes
//! only after the final tag, so a failure never yields a partial value.

use crate::convert::{read_raw, scalar_value};
use crate::registry::Registry;
use crate::value::Value;
use protostack_schema::{
    CompositeSchema, FieldDescriptor, FieldKind, LogicalType, MessageSchema, VariantSchema,
};
use protostack_wire::{DecodeError, DecodeResult, Decoder, Path, PayloadKind};

enum Slot {
    Empty,
    Single(Value),
    Many(Vec<Value>),
}

/// Decodes one composite of any shape.
pub(crate) fn composite(
    reg: &Registry,
    schema: &CompositeSchema,
    d: &mut Decoder<'_>,
    path: &Path,
) -> DecodeResult<Value> {
    match schema {
        CompositeSchema::Message(m) => message(reg, m, d, path),
        CompositeSchema::Variant(v) => variant(reg, v, d, path),
    }
}

/// Maps a single un-keyed varint to a payload-free case of a variant.
pub(crate) fn bare_case(variant: &VariantSchema, raw: u64, path: &Path) -> DecodeResult<Value> {
    let malformed = || DecodeError::MalformedVariant { path: path.clone() };
    let key = u32::try_from(raw).map_err(|_| malformed())?;
    let case = variant.case_by_key(key).ok_or_else(malformed)?;
    if case.has_payload() {
        return Err(malformed());
    }
    Ok(Value::case(case.name()))
}

/// The payload kind a field's values arrive with on the wire.
///
/// A reference to a bare variant rides as a varint (a wire-format enum),
/// not as a framed block; everything else follows the field's encoding.
fn expected_kind(reg: &Registry, desc: &FieldDescriptor) -> PayloadKind {
    if let LogicalType::Reference(name) = desc.logical_type() {
        if reg.bare_variant(name).is_some() {
            return PayloadKind::Varint;
        }
    }
    desc.payload_kind()
}

/// Decodes one field value, dispatching nested references through the
/// registry.
fn field_value(
    reg: &Registry,
    desc: &FieldDescriptor,
    d: &mut Decoder<'_>,
    path: &Path,
) -> DecodeResult<Value> {
    match desc.logical_type() {
        LogicalType::Reference(name) => {
            if let Some(variant) = reg.bare_variant(name) {
                let raw = d.varint()?;
                bare_case(variant, raw, path)
            } else {
                let schema = reg.get(name).ok_or_else(|| DecodeError::UnknownType {
                    name: name.clone(),
                })?;
                let mut sub = d.nested()?;
                composite(reg, schema, &mut sub, path)
            }
        }
        ty => {
            let raw = read_raw(d, desc.encoding())?;
            scalar_value(ty, raw, path)
        }
    }
}

fn materialize(desc: &FieldDescriptor, slot: Slot, path: &Path) -> DecodeResult<Option<Value>> {
    match desc.kind() {
        FieldKind::Required => match slot {
            Slot::Single(v) => Ok(Some(v)),
            _ => Err(DecodeError::MissingField {
                path: path.child(desc.name()),
            }),
        },
        FieldKind::Optional => match slot {
            Slot::Single(v) => Ok(Some(v)),
            _ => Ok(None),
        },
        FieldKind::Repeated => match slot {
            Slot::Many(items) => Ok(Some(Value::List(items))),
            _ => Ok(Some(Value::List(Vec::new()))),
        },
    }
}

fn message(
    reg: &Registry,
    schema: &MessageSchema,
    d: &mut Decoder<'_>,
    path: &Path,
) -> DecodeResult<Value> {
    let fields = schema.fields();
    let mut slots: Vec<Slot> = (0..fields.len()).map(|_| Slot::Empty).collect();

    while let Some((key, kind)) = d.key()? {
        let Some(idx) = fields.iter().position(|f| f.key() == key) else {
            d.skip(kind)?;
            continue;
        };
        let desc = &fields[idx];
        let field_path = path.child(desc.name());
        if expected_kind(reg, desc) != kind {
            return Err(DecodeError::UnexpectedPayload {
                path: field_path,
                kind,
            });
        }
        let value = field_value(reg, desc, d, &field_path)?;
        match desc.kind() {
            FieldKind::Repeated => match &mut slots[idx] {
                Slot::Many(items) => items.push(value),
                slot => *slot = Slot::Many(vec![value]),
            },
            _ => slots[idx] = Slot::Single(value),
        }
    }

    if schema.is_positional() {
        let mut items = Vec::with_capacity(fields.len());
        for (desc, slot) in fields.iter().zip(slots) {
            items.push(materialize(desc, slot, path)?.unwrap_or(Value::Null));
        }
        Ok(Value::Tuple(items))
    } else {
        let mut entries = Vec::with_capacity(fields.len());
        for (desc, slot) in fields.iter().zip(slots) {
            if let Some(value) = materialize(desc, slot, path)? {
                entries.push((desc.name().to_string(), value));
            }
        }
        Ok(Value::Record(entries))
    }
}

fn variant(
    reg: &Registry,
    schema: &VariantSchema,
    d: &mut Decoder<'_>,
    path: &Path,
) -> DecodeResult<Value> {
    let cases = schema.cases();
    let mut markers = vec![false; cases.len()];
    let mut slots: Vec<Vec<Option<Value>>> =
        cases.iter().map(|c| vec![None; c.args().len()]).collect();

    'message: while let Some((key, kind)) = d.key()? {
        // Payload-free cases are marked by a varint field at their own key.
        if let Some(ci) = cases.iter().position(|c| !c.has_payload() && c.key() == key) {
            let case_path = path.child(cases[ci].name());
            if kind != PayloadKind::Varint {
                return Err(DecodeError::UnexpectedPayload {
                    path: case_path,
                    kind,
                });
            }
            d.varint()?;
            markers[ci] = true;
            continue;
        }
        // Payload arguments ride at `case_key + 1 + i`.
        for (ci, case) in cases.iter().enumerate() {
            for (ai, desc) in case.args().iter().enumerate() {
                if desc.key() == key {
                    let arg_path = path.child(desc.name());
                    if expected_kind(reg, desc) != kind {
                        return Err(DecodeError::UnexpectedPayload {
                            path: arg_path,
                            kind,
                        });
                    }
                    slots[ci][ai] = Some(field_value(reg, desc, d, &arg_path)?);
                    continue 'message;
                }
            }
        }
        d.skip(kind)?;
    }

    // Which case is active is inferred from slot occupancy, not a shared
    // discriminant field.
    let occupied: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter(|(_, args)| args.iter().any(Option::is_some))
        .map(|(ci, _)| ci)
        .collect();

    match occupied.as_slice() {
        [] => {
            let seen: Vec<usize> = markers
                .iter()
                .enumerate()
                .filter(|(_, seen)| **seen)
                .map(|(ci, _)| ci)
                .collect();
            if let [ci] = seen.as_slice() {
                Ok(Value::case(cases[*ci].name()))
            } else {
                Err(DecodeError::MalformedVariant { path: path.clone() })
            }
        }
        [ci] => {
            let case = &cases[*ci];
            let mut args = Vec::with_capacity(case.args().len());
            let case_slots = std::mem::take(&mut slots[*ci]);
            for (ai, slot) in case_slots.into_iter().enumerate() {
                match slot {
                    Some(value) => args.push(value),
                    None => {
                        return Err(DecodeError::MissingField {
                            path: path.child(case.args()[ai].name()),
                        });
                    }
                }
            }
            Ok(Value::case_with(case.name(), args))
        }
        _ => Err(DecodeError::MalformedVariant { path: path.clone() }),
    }
}
