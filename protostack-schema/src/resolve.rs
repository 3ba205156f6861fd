//! Declaration resolution.
//!
//! Turns declared fields into validated [`FieldDescriptor`]s and whole
//! declarations into composite schemas. Resolution is pure: the same
//! declaration always resolves to the same schema or the same error.
//!
//! Key uniqueness inside one composite is deliberately not enforced. Two
//! fields declared with the same key both match the same wire tag; decode
//! resolves the ambiguity by arrival order (the last occurrence overwrites
//! for non-repeated fields).

use crate::decl::{CompositeDecl, RecordDecl, TupleDecl, TypeExpr, VariantDecl};
use crate::descriptor::{
    CompositeSchema, FieldDescriptor, MessageSchema, VariantCase, VariantSchema, MAX_KEY, MIN_KEY,
    RESERVED_KEYS,
};
use crate::error::{SchemaError, SchemaResult};
use crate::types::{Encoding, FieldKind, LogicalType};

/// Scalar names the wire format has no representation for. Everything else
/// that is not in the scalar table resolves as a composite reference.
const UNSUPPORTED_SCALARS: &[&str] = &[
    "i8", "u8", "i16", "u16", "i128", "u128", "f32", "float", "char", "bytes", "unit", "isize",
    "usize",
];

fn scalar_type(name: &str) -> Option<LogicalType> {
    match name {
        "bool" => Some(LogicalType::Bool),
        "int" => Some(LogicalType::Int),
        "int32" | "i32" => Some(LogicalType::Int32),
        "int64" | "i64" => Some(LogicalType::Int64),
        "uint32" | "u32" => Some(LogicalType::UInt32),
        "uint64" | "u64" => Some(LogicalType::UInt64),
        "double" | "f64" => Some(LogicalType::Double),
        "string" => Some(LogicalType::String),
        _ => None,
    }
}

fn wrong_type(composite: &str, field: &str, ty: &TypeExpr) -> SchemaError {
    SchemaError::WrongType {
        composite: composite.to_string(),
        field: field.to_string(),
        ty: ty.to_string(),
    }
}

/// Strips at most one optional/repeated wrapper, yielding the field kind
/// and the bare inner type. A wrapper nested inside another wrapper has no
/// wire representation and is rejected.
fn unwrap_kind<'t>(
    composite: &str,
    field: &str,
    ty: &'t TypeExpr,
) -> SchemaResult<(FieldKind, &'t TypeExpr)> {
    match ty {
        TypeExpr::Optional(inner) => match inner.as_ref() {
            TypeExpr::Optional(_) | TypeExpr::Repeated(_) => {
                Err(wrong_type(composite, field, ty))
            }
            bare => Ok((FieldKind::Optional, bare)),
        },
        TypeExpr::Repeated(inner) => match inner.as_ref() {
            TypeExpr::Optional(_) | TypeExpr::Repeated(_) => {
                Err(wrong_type(composite, field, ty))
            }
            bare => Ok((FieldKind::Repeated, bare)),
        },
        bare => Ok((FieldKind::Required, bare)),
    }
}

fn base_type(composite: &str, field: &str, ty: &TypeExpr) -> SchemaResult<LogicalType> {
    match ty {
        TypeExpr::Name(name) => {
            if let Some(scalar) = scalar_type(name) {
                Ok(scalar)
            } else if UNSUPPORTED_SCALARS.contains(&name.as_str()) {
                Err(wrong_type(composite, field, ty))
            } else {
                Ok(LogicalType::Reference(name.clone()))
            }
        }
        TypeExpr::Param(param) => Err(SchemaError::UnboundParam {
            composite: composite.to_string(),
            field: field.to_string(),
            param: param.clone(),
        }),
        TypeExpr::Optional(_) | TypeExpr::Repeated(_) => Err(wrong_type(composite, field, ty)),
    }
}

fn validate_key(composite: &str, field: &str, key: u32) -> SchemaResult<()> {
    if !(MIN_KEY..=MAX_KEY).contains(&key) {
        return Err(SchemaError::KeyOutOfRange {
            composite: composite.to_string(),
            field: field.to_string(),
            key,
        });
    }
    if RESERVED_KEYS.contains(&key) {
        return Err(SchemaError::ReservedKey {
            composite: composite.to_string(),
            field: field.to_string(),
            key,
        });
    }
    Ok(())
}

/// Resolves one declared field into a descriptor.
///
/// `default_key` is the caller-derived key: the 1-based position for tuple
/// elements, `case_key + 1 + i` for variant case arguments. Record fields
/// pass `None` and must annotate keys explicitly.
pub fn resolve_field(
    composite: &str,
    field: &str,
    ty: &TypeExpr,
    explicit_key: Option<u32>,
    explicit_encoding: Option<&str>,
    default_key: Option<u32>,
) -> SchemaResult<FieldDescriptor> {
    let (kind, bare) = unwrap_kind(composite, field, ty)?;
    let logical = base_type(composite, field, bare)?;

    let key = explicit_key
        .or(default_key)
        .ok_or_else(|| SchemaError::MissingKey {
            composite: composite.to_string(),
            field: field.to_string(),
        })?;
    validate_key(composite, field, key)?;

    let encoding = match explicit_encoding {
        Some(name) => {
            Encoding::from_name(name).ok_or_else(|| SchemaError::UnknownEncoding {
                composite: composite.to_string(),
                field: field.to_string(),
                name: name.to_string(),
            })?
        }
        None => logical.default_encoding(),
    };

    if !logical.allows(encoding) {
        return Err(SchemaError::NoConversion {
            composite: composite.to_string(),
            field: field.to_string(),
            ty: logical.to_string(),
            encoding,
        });
    }

    Ok(FieldDescriptor::new(field, key, encoding, logical, kind))
}

/// Resolves a record declaration.
pub fn resolve_record(decl: &RecordDecl) -> SchemaResult<MessageSchema> {
    let mut fields = Vec::with_capacity(decl.fields.len());
    for f in &decl.fields {
        fields.push(resolve_field(
            &decl.name,
            &f.name,
            &f.ty,
            f.key,
            f.encoding.as_deref(),
            None,
        )?);
    }
    Ok(MessageSchema::new(decl.name.clone(), fields, false))
}

/// Resolves a tuple declaration; element keys default to the 1-based
/// position.
pub fn resolve_tuple(decl: &TupleDecl) -> SchemaResult<MessageSchema> {
    let mut fields = Vec::with_capacity(decl.elements.len());
    for (i, e) in decl.elements.iter().enumerate() {
        fields.push(resolve_field(
            &decl.name,
            &i.to_string(),
            &e.ty,
            e.key,
            e.encoding.as_deref(),
            Some(i as u32 + 1),
        )?);
    }
    Ok(MessageSchema::new(decl.name.clone(), fields, true))
}

/// Resolves a variant declaration.
///
/// Case keys default to 1-based declaration order; payload arguments are
/// keyed `case_key + 1 + i`. Arguments must be bare types; wrapping a case
/// argument in optional/repeated has no wire representation.
pub fn resolve_variant(decl: &VariantDecl) -> SchemaResult<VariantSchema> {
    let mut cases = Vec::with_capacity(decl.cases.len());
    for (i, c) in decl.cases.iter().enumerate() {
        let case_key = c.key.unwrap_or(i as u32 + 1);
        validate_key(&decl.name, &c.name, case_key)?;

        let mut args = Vec::with_capacity(c.args.len());
        for (j, a) in c.args.iter().enumerate() {
            let arg_name = format!("{}.{}", c.name, j);
            let descriptor = resolve_field(
                &decl.name,
                &arg_name,
                &a.ty,
                a.key,
                a.encoding.as_deref(),
                Some(case_key + 1 + j as u32),
            )?;
            if descriptor.kind() != FieldKind::Required {
                return Err(wrong_type(&decl.name, &arg_name, &a.ty));
            }
            args.push(descriptor);
        }
        cases.push(VariantCase::new(c.name.clone(), case_key, args));
    }
    Ok(VariantSchema::new(decl.name.clone(), cases))
}

/// Resolves any composite declaration.
pub fn resolve(decl: &CompositeDecl) -> SchemaResult<CompositeSchema> {
    match decl {
        CompositeDecl::Record(d) => Ok(CompositeSchema::Message(resolve_record(d)?)),
        CompositeDecl::Tuple(d) => Ok(CompositeSchema::Message(resolve_tuple(d)?)),
        CompositeDecl::Variant(d) => Ok(CompositeSchema::Variant(resolve_variant(d)?)),
    }
}
