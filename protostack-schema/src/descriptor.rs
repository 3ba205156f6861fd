//! Resolved, immutable schema metadata.

use crate::types::{Encoding, FieldKind, LogicalType};
use protostack_wire::PayloadKind;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Lowest permitted field key.
pub const MIN_KEY: u32 = 1;

/// Highest permitted field key (29 bits).
pub const MAX_KEY: u32 = 0x1FFF_FFFF;

/// Keys reserved by the wire format.
pub const RESERVED_KEYS: RangeInclusive<u32> = 19000..=19999;

/// Resolved, validated metadata for one schema field.
///
/// Constructed only by the resolver; immutable afterwards. The key is
/// guaranteed in range and the (logical type, encoding) pairing is a member
/// of the compatibility matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    name: String,
    key: u32,
    encoding: Encoding,
    ty: LogicalType,
    kind: FieldKind,
}

impl FieldDescriptor {
    pub(crate) fn new(
        name: impl Into<String>,
        key: u32,
        encoding: Encoding,
        ty: LogicalType,
        kind: FieldKind,
    ) -> Self {
        Self {
            name: name.into(),
            key,
            encoding,
            ty,
            kind,
        }
    }

    /// The field's declared name (a position index for tuple elements and
    /// case arguments).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field key.
    #[must_use]
    pub fn key(&self) -> u32 {
        self.key
    }

    /// The wire encoding.
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// The logical type.
    #[must_use]
    pub fn logical_type(&self) -> &LogicalType {
        &self.ty
    }

    /// Required, optional, or repeated.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The payload kind this field's values arrive with.
    #[must_use]
    pub fn payload_kind(&self) -> PayloadKind {
        self.encoding.payload_kind()
    }
}

/// A record or tuple schema: the owning type's name plus its ordered fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSchema {
    name: String,
    fields: Vec<FieldDescriptor>,
    positional: bool,
}

impl MessageSchema {
    pub(crate) fn new(name: String, fields: Vec<FieldDescriptor>, positional: bool) -> Self {
        Self {
            name,
            fields,
            positional,
        }
    }

    /// The owning type's name, used for error paths.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered field descriptors.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// True for tuples: fields are positional and values materialize as a
    /// tuple rather than a record.
    #[must_use]
    pub fn is_positional(&self) -> bool {
        self.positional
    }
}

/// One resolved variant case: name, key, and payload descriptors.
///
/// A case without payload is marked on the wire by a varint presence field
/// at the case's own key; payload arguments ride at `key + 1 + i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCase {
    name: String,
    key: u32,
    args: Vec<FieldDescriptor>,
}

impl VariantCase {
    pub(crate) fn new(name: String, key: u32, args: Vec<FieldDescriptor>) -> Self {
        Self { name, key, args }
    }

    /// The case's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The case key.
    #[must_use]
    pub fn key(&self) -> u32 {
        self.key
    }

    /// The payload argument descriptors; empty for a marker-only case.
    #[must_use]
    pub fn args(&self) -> &[FieldDescriptor] {
        &self.args
    }

    /// True when the case carries payload arguments.
    #[must_use]
    pub fn has_payload(&self) -> bool {
        !self.args.is_empty()
    }
}

/// A sum-type schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSchema {
    name: String,
    cases: Vec<VariantCase>,
}

impl VariantSchema {
    pub(crate) fn new(name: String, cases: Vec<VariantCase>) -> Self {
        Self { name, cases }
    }

    /// The owning type's name, used for error paths.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered cases.
    #[must_use]
    pub fn cases(&self) -> &[VariantCase] {
        &self.cases
    }

    /// True when no case carries payload. Bare variants bypass message
    /// framing entirely: a value is a single un-keyed varint equal to the
    /// active case's key.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.cases.iter().all(|c| !c.has_payload())
    }

    /// Looks a case up by key.
    #[must_use]
    pub fn case_by_key(&self, key: u32) -> Option<&VariantCase> {
        self.cases.iter().find(|c| c.key() == key)
    }

    /// Looks a case up by name.
    #[must_use]
    pub fn case_by_name(&self, name: &str) -> Option<&VariantCase> {
        self.cases.iter().find(|c| c.name() == name)
    }
}

/// A resolved composite schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompositeSchema {
    Message(MessageSchema),
    Variant(VariantSchema),
}

impl CompositeSchema {
    /// The owning type's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Message(m) => m.name(),
            Self::Variant(v) => v.name(),
        }
    }
}
