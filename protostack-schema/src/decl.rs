//! Declarations handed to the resolver.
//!
//! This is the input contract of the engine. Whatever extracts schemas from
//! host types (a code generator, a build script, handwritten registration)
//! describes each composite as an ordered list of declared fields, each a
//! type expression plus optional key and encoding annotations. Everything
//! here is serde-serializable so declarations can also arrive as JSON.

use crate::error::{SchemaError, SchemaResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A declared (unresolved) type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeExpr {
    /// A scalar name (`bool`, `int32`, `string`, …) or a reference to
    /// another composite.
    Name(String),
    /// At most one occurrence of the inner type.
    Optional(Box<TypeExpr>),
    /// An ordered sequence of the inner type.
    Repeated(Box<TypeExpr>),
    /// A type-argument placeholder of a parametric composite.
    Param(String),
}

impl TypeExpr {
    /// A scalar or reference by name.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Wraps a type as optional.
    #[must_use]
    pub fn optional(inner: TypeExpr) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Wraps a type as a repeated sequence.
    #[must_use]
    pub fn repeated(inner: TypeExpr) -> Self {
        Self::Repeated(Box::new(inner))
    }

    /// A type-argument placeholder.
    #[must_use]
    pub fn param(name: impl Into<String>) -> Self {
        Self::Param(name.into())
    }

    fn substitute(&self, bindings: &HashMap<&str, &TypeExpr>) -> TypeExpr {
        match self {
            Self::Name(_) => self.clone(),
            Self::Optional(inner) => Self::Optional(Box::new(inner.substitute(bindings))),
            Self::Repeated(inner) => Self::Repeated(Box::new(inner.substitute(bindings))),
            Self::Param(name) => bindings
                .get(name.as_str())
                .map_or_else(|| self.clone(), |bound| (*bound).clone()),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) | Self::Param(name) => f.write_str(name),
            Self::Optional(inner) => write!(f, "optional<{inner}>"),
            Self::Repeated(inner) => write!(f, "repeated<{inner}>"),
        }
    }
}

/// One declared record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
    /// Explicit field key; record fields have no positional default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<u32>,
    /// Explicit encoding annotation (`varint`, `zigzag`, …).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

impl FieldDecl {
    /// Declares a field with no annotations.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            key: None,
            encoding: None,
        }
    }

    /// Sets an explicit field key.
    #[must_use]
    pub fn with_key(mut self, key: u32) -> Self {
        self.key = Some(key);
        self
    }

    /// Sets an explicit encoding annotation.
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }
}

/// One positional element of a tuple or variant-case payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDecl {
    pub ty: TypeExpr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

impl ElementDecl {
    /// Declares an element with no annotations.
    #[must_use]
    pub fn new(ty: TypeExpr) -> Self {
        Self {
            ty,
            key: None,
            encoding: None,
        }
    }

    /// Sets an explicit field key.
    #[must_use]
    pub fn with_key(mut self, key: u32) -> Self {
        self.key = Some(key);
        self
    }

    /// Sets an explicit encoding annotation.
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }
}

/// One declared variant case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDecl {
    pub name: String,
    /// Explicit case key; defaults to 1-based declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<u32>,
    /// Payload arguments; empty for a marker-only case.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ElementDecl>,
}

impl CaseDecl {
    /// Declares a case with no payload.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
            args: Vec::new(),
        }
    }

    /// Sets an explicit case key.
    #[must_use]
    pub fn with_key(mut self, key: u32) -> Self {
        self.key = Some(key);
        self
    }

    /// Adds one payload argument.
    #[must_use]
    pub fn with_arg(mut self, arg: ElementDecl) -> Self {
        self.args.push(arg);
        self
    }
}

/// A named-field composite declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    pub fields: Vec<FieldDecl>,
}

/// A positional composite declaration; element keys default to the 1-based
/// position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    pub elements: Vec<ElementDecl>,
}

/// A sum-type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    pub cases: Vec<CaseDecl>,
}

/// Any composite declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeDecl {
    Record(RecordDecl),
    Tuple(TupleDecl),
    Variant(VariantDecl),
}

impl CompositeDecl {
    /// The declared composite's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Record(d) => &d.name,
            Self::Tuple(d) => &d.name,
            Self::Variant(d) => &d.name,
        }
    }

    /// The declared type parameters, if any.
    #[must_use]
    pub fn params(&self) -> &[String] {
        match self {
            Self::Record(d) => &d.params,
            Self::Tuple(d) => &d.params,
            Self::Variant(d) => &d.params,
        }
    }

    /// Substitutes type arguments for this declaration's parameters.
    ///
    /// The result is a monomorphic declaration named `Name<arg, …>`, ready
    /// to register like any other composite. The caller binds parameters
    /// once, here, instead of threading codecs through every decode and
    /// encode call.
    pub fn instantiate(&self, args: &[TypeExpr]) -> SchemaResult<CompositeDecl> {
        let params = self.params();
        if params.len() != args.len() {
            return Err(SchemaError::WrongArity {
                composite: self.name().to_string(),
                expected: params.len(),
                got: args.len(),
            });
        }
        let bindings: HashMap<&str, &TypeExpr> = params
            .iter()
            .map(String::as_str)
            .zip(args.iter())
            .collect();
        let rendered: Vec<String> = args.iter().map(ToString::to_string).collect();
        let name = format!("{}<{}>", self.name(), rendered.join(", "));

        let instantiated = match self {
            Self::Record(d) => Self::Record(RecordDecl {
                name,
                params: Vec::new(),
                fields: d
                    .fields
                    .iter()
                    .map(|f| FieldDecl {
                        name: f.name.clone(),
                        ty: f.ty.substitute(&bindings),
                        key: f.key,
                        encoding: f.encoding.clone(),
                    })
                    .collect(),
            }),
            Self::Tuple(d) => Self::Tuple(TupleDecl {
                name,
                params: Vec::new(),
                elements: d
                    .elements
                    .iter()
                    .map(|e| ElementDecl {
                        ty: e.ty.substitute(&bindings),
                        key: e.key,
                        encoding: e.encoding.clone(),
                    })
                    .collect(),
            }),
            Self::Variant(d) => Self::Variant(VariantDecl {
                name,
                params: Vec::new(),
                cases: d
                    .cases
                    .iter()
                    .map(|c| CaseDecl {
                        name: c.name.clone(),
                        key: c.key,
                        args: c
                            .args
                            .iter()
                            .map(|a| ElementDecl {
                                ty: a.ty.substitute(&bindings),
                                key: a.key,
                                encoding: a.encoding.clone(),
                            })
                            .collect(),
                    })
                    .collect(),
            }),
        };
        Ok(instantiated)
    }
}
