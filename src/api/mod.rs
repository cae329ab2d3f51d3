//! Purpose: Define the stable public Rust API boundary for init6 decoding.
//! Exports: Decoder entry points, record tree, schema builder, errors, and loader helpers.
//! Role: Public, additive-only surface used by the CLI and by downstream tools.
//! Invariants: Callers never need `core` paths for decoding or inspecting a record.

pub use crate::core::cipher::{SpanDecryptor, decrypt_field};
pub use crate::core::cursor::ByteCursor;
pub use crate::core::decode::{DecodeOptions, decode_record, decode_record_with, decode_with_schema};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::hexdump;
pub use crate::core::layout::{INIT6_LEN, build_init6_schema, init6_schema};
pub use crate::core::record::{Field, Record, Value};
pub use crate::core::schema::{DIGEST_LEN, FieldKind, FieldSpec, LayoutEntry, Schema, SchemaBuilder};
