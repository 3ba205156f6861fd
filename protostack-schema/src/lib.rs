//! Schema resolution for the protostack serialization engine.
//!
//! This crate turns declarative type descriptions into validated, immutable
//! wire schemas:
//! - [`TypeExpr`], [`FieldDecl`], [`RecordDecl`] / [`TupleDecl`] /
//!   [`VariantDecl`] — the declaration model an external extractor supplies
//!   (constructible in code, or via serde from JSON)
//! - [`FieldDescriptor`] — resolved per-field metadata: key, encoding,
//!   logical type, and kind
//! - [`MessageSchema`] / [`VariantSchema`] — ordered composite schemas
//! - [`resolve`] and friends — the resolution algorithm, including the
//!   default-encoding table and the type/encoding compatibility matrix
//!
//! Resolution failures are [`SchemaError`]s and surface when schemas are
//! compiled, before any message is processed. Runtime decode/encode errors
//! live in `protostack-wire`.

mod decl;
mod descriptor;
mod error;
mod resolve;
mod types;

pub use decl::{
    CaseDecl, CompositeDecl, ElementDecl, FieldDecl, RecordDecl, TupleDecl, TypeExpr, VariantDecl,
};
pub use descriptor::{
    CompositeSchema, FieldDescriptor, MessageSchema, VariantCase, VariantSchema, MAX_KEY, MIN_KEY,
    RESERVED_KEYS,
};
pub use error::{SchemaError, SchemaResult};
pub use resolve::{resolve, resolve_field, resolve_record, resolve_tuple, resolve_variant};
pub use types::{Encoding, FieldKind, LogicalType};
