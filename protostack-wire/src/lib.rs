//! Wire-level primitives for the Protocol Buffers binary format.
//!
//! This crate is the bottom layer of the protostack engine:
//! - [`Decoder`] — a cursor over an immutable byte buffer reading the six
//!   payload operations (varints, zigzag integers, fixed 32/64-bit words,
//!   length-delimited byte blocks, nested sub-messages, field tags)
//! - [`Encoder`] — the mirror writer over a growable buffer
//! - [`PayloadKind`] — the wire-level tag kinds, orthogonal to logical types
//! - [`DecodeError`] / [`EncodeError`] — the runtime error model, carrying
//!   dotted field [`Path`]s across nested composites
//! - checked narrowing helpers shared by schema-driven and handwritten codecs
//!
//! Nothing in this crate knows about schemas. Field resolution lives in
//! `protostack-schema`; the decode/encode engines live in `protostack-codec`.

mod decoder;
mod encoder;
mod error;
mod narrow;
mod payload;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult, Path};
pub use narrow::{
    bits32_from_i64, bits32_from_u64, bool_from_u64, i32_from_i64, i64_from_bits32, u32_from_i64,
    u32_from_u64,
};
pub use payload::PayloadKind;
