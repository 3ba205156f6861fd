//! Schema-driven decode and encode engines.
//!
//! This crate is the top layer of the protostack engine. Composite
//! declarations (from `protostack-schema`) are registered into a
//! [`Registry`], which compiles them into schemas once and then serves as
//! the runtime entry point:
//!
//! - [`Registry::decode`] / [`Registry::encode`] — framed messages
//! - [`Registry::decode_bare`] / [`Registry::encode_bare`] — bare variants,
//!   which ride as a single un-keyed varint instead of a framed message
//!
//! Values are dynamic [`Value`] trees. Decode follows the tag-dispatch
//! state machine of the wire format: known fields accumulate into slots,
//! unknown fields are skipped (forward compatibility), and the composite
//! materializes only once the message is exhausted. Missing required
//! fields, payload-kind mismatches, and ambiguous variant occupancy all
//! fail with a dotted path to the offending field. Encode emits fields in
//! descriptor declaration order.
//!
//! Nested references dispatch through the registry by name at runtime, so
//! recursive and mutually recursive schemas work regardless of
//! registration order.

mod convert;
mod decode;
mod encode;
mod registry;
mod value;

pub use registry::{Registry, RegistryBuilder};
pub use value::Value;

pub use protostack_wire::{DecodeError, DecodeResult, EncodeError, EncodeResult, Path};
