//! Schema registration and the runtime entry points.

use crate::{decode, encode, value::Value};
use protostack_schema::{
    resolve, CompositeDecl, CompositeSchema, LogicalType, SchemaError, SchemaResult, VariantSchema,
};
use protostack_wire::{
    DecodeError, DecodeResult, Decoder, EncodeError, EncodeResult, Encoder, Path,
};
use std::collections::HashMap;

/// Collects composite declarations and freezes them into a [`Registry`].
///
/// Each declaration is resolved as it is registered, so schema errors
/// surface at the registration site. Registering a second declaration
/// under an existing name replaces the first.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    types: HashMap<String, CompositeSchema>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves and registers one composite declaration.
    pub fn register(&mut self, decl: &CompositeDecl) -> SchemaResult<&mut Self> {
        let schema = resolve(decl)?;
        self.types.insert(schema.name().to_string(), schema);
        Ok(self)
    }

    /// Verifies that every reference resolves, then freezes the registry.
    ///
    /// Reference checking happens here rather than per registration so
    /// recursive and mutually recursive schemas can be registered in any
    /// order.
    pub fn build(self) -> SchemaResult<Registry> {
        for schema in self.types.values() {
            let descriptors: Vec<_> = match schema {
                CompositeSchema::Message(m) => m.fields().iter().collect(),
                CompositeSchema::Variant(v) => {
                    v.cases().iter().flat_map(|c| c.args().iter()).collect()
                }
            };
            for descriptor in descriptors {
                if let LogicalType::Reference(name) = descriptor.logical_type() {
                    if !self.types.contains_key(name) {
                        return Err(SchemaError::UnresolvedReference {
                            composite: schema.name().to_string(),
                            reference: name.clone(),
                        });
                    }
                }
            }
        }
        Ok(Registry { types: self.types })
    }
}

/// An immutable set of resolved composite schemas, and the runtime entry
/// points over them.
///
/// Nested references dispatch through the registry by name at decode and
/// encode time; [`RegistryBuilder::build`] guarantees every reference
/// resolves. The registry is immutable and shareable across threads, so
/// independent decode/encode calls run fully in parallel.
///
/// Field-key uniqueness inside one composite is not validated: two fields
/// declared with the same key both match the same wire tag, and decode
/// resolves the ambiguity by arrival order (last occurrence wins for
/// non-repeated fields).
#[derive(Debug)]
pub struct Registry {
    types: HashMap<String, CompositeSchema>,
}

impl Registry {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Looks up a schema by type name.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&CompositeSchema> {
        self.types.get(type_name)
    }

    /// Returns the number of registered composites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no composite is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Decodes one framed message of the named type.
    pub fn decode(&self, type_name: &str, buf: &[u8]) -> DecodeResult<Value> {
        let schema = self
            .types
            .get(type_name)
            .ok_or_else(|| DecodeError::UnknownType {
                name: type_name.to_string(),
            })?;
        let mut decoder = Decoder::new(buf);
        decode::composite(self, schema, &mut decoder, &Path::root(schema.name()))
    }

    /// Encodes one framed message of the named type.
    pub fn encode(&self, type_name: &str, value: &Value) -> EncodeResult<Vec<u8>> {
        let schema = self
            .types
            .get(type_name)
            .ok_or_else(|| EncodeError::UnknownType {
                name: type_name.to_string(),
            })?;
        let mut encoder = Encoder::new();
        encode::composite(self, schema, value, &mut encoder, &Path::root(schema.name()))?;
        Ok(encoder.into_bytes())
    }

    /// Decodes a bare variant: a single un-keyed varint equal to the active
    /// case's key, with no message framing.
    ///
    /// Fails with [`DecodeError::MalformedVariant`] when the named type is
    /// not a bare variant or the varint matches no case.
    pub fn decode_bare(&self, type_name: &str, buf: &[u8]) -> DecodeResult<Value> {
        let schema = self
            .types
            .get(type_name)
            .ok_or_else(|| DecodeError::UnknownType {
                name: type_name.to_string(),
            })?;
        let path = Path::root(schema.name());
        let CompositeSchema::Variant(variant) = schema else {
            return Err(DecodeError::MalformedVariant { path });
        };
        let mut decoder = Decoder::new(buf);
        let raw = decoder.varint()?;
        decode::bare_case(variant, raw, &path)
    }

    /// Encodes a bare variant as a single un-keyed varint.
    pub fn encode_bare(&self, type_name: &str, value: &Value) -> EncodeResult<Vec<u8>> {
        let schema = self
            .types
            .get(type_name)
            .ok_or_else(|| EncodeError::UnknownType {
                name: type_name.to_string(),
            })?;
        let path = Path::root(schema.name());

        let CompositeSchema::Variant(variant) = schema else {
            return Err(EncodeError::Mismatch {
                path,
                expected: "bare variant",
            });
        };
        let mut encoder = Encoder::new();
        encode::bare_case(variant, value, &mut encoder, &path)?;
        Ok(encoder.into_bytes())
    }

    /// Returns the schema when the named type resolves to a bare variant,
    /// whose values ride as un-keyed varints.
    pub(crate) fn bare_variant(&self, type_name: &str) -> Option<&VariantSchema> {
        match self.types.get(type_name) {
            Some(CompositeSchema::Variant(v)) if v.is_bare() => Some(v),
            _ => None,
        }
    }
}
