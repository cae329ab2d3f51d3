//! Purpose: Drive a schema against a byte cursor and assemble the record tree.
//! Exports: `DecodeOptions`, `decode_record`, `decode_record_with`, `decode_with_schema`.
//! Role: The only interpreter of `Schema`; pure function over an in-memory buffer.
//! Invariants: Fields decode strictly in schema order; the first failure aborts the decode.
//! Invariants: Errors carry the dotted field path where decoding stopped.
//! Invariants: A nested scope never reads bytes owned by its parent.

use tracing::{debug, trace};

use crate::core::cursor::ByteCursor;
use crate::core::error::Error;
use crate::core::layout::init6_schema;
use crate::core::record::{Field, Record, Value};
use crate::core::schema::{DIGEST_LEN, FieldKind, Schema};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DecodeOptions {
    /// Reject bytes left over after the last root field.
    pub strict: bool,
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Decodes an init6 record, ignoring any bytes past the last field.
pub fn decode_record(buf: &[u8]) -> Result<Record, Error> {
    decode_record_with(buf, &DecodeOptions::default())
}

pub fn decode_record_with(buf: &[u8], options: &DecodeOptions) -> Result<Record, Error> {
    decode_with_schema(init6_schema()?, buf, options)
}

pub fn decode_with_schema(
    schema: &Schema,
    buf: &[u8],
    options: &DecodeOptions,
) -> Result<Record, Error> {
    let mut cursor = ByteCursor::new(buf);
    let record = decode_scope(schema, &mut cursor).inspect_err(|err| {
        debug!(
            schema = schema.name(),
            field = err.field().unwrap_or_default(),
            error = %err,
            "decode failed"
        );
    })?;

    if options.strict && !cursor.is_exhausted() {
        let err = Error::trailing_data(cursor.absolute_position(), cursor.remaining());
        debug!(schema = schema.name(), error = %err, "strict decode rejected trailing bytes");
        return Err(err);
    }

    debug!(
        schema = schema.name(),
        consumed = cursor.position(),
        ignored = cursor.remaining(),
        "decoded record"
    );
    Ok(record)
}

fn decode_scope(schema: &Schema, cursor: &mut ByteCursor<'_>) -> Result<Record, Error> {
    let mut fields = Vec::with_capacity(schema.fields().len());
    for spec in schema.fields() {
        let offset = cursor.absolute_position();
        let value = decode_field(spec.kind(), cursor).map_err(|err| err.within(spec.name()))?;
        trace!(
            field = spec.name(),
            kind = spec.kind().label(),
            offset,
            len = value.encoded_len(),
            "decoded field"
        );
        fields.push(Field::new(spec.name(), offset, value));
    }
    Ok(Record::new(schema.name(), fields))
}

fn decode_field(kind: &FieldKind, cursor: &mut ByteCursor<'_>) -> Result<Value, Error> {
    let value = match kind {
        FieldKind::Constant(expected) => {
            Value::Constant(cursor.ensure_fixed_content(expected)?.to_vec())
        }
        FieldKind::Digest => Value::Digest(cursor.read_array::<DIGEST_LEN>()?),
        FieldKind::Raw(len) => Value::Raw(cursor.read_exact(*len)?.to_vec()),
        FieldKind::Nested { schema, len } => {
            let mut scope = cursor.sub_view(*len)?;
            debug!(
                schema = schema.name(),
                offset = scope.absolute_position(),
                len,
                "entering nested scope"
            );
            let record = decode_scope(schema, &mut scope)?;
            debug_assert!(scope.is_exhausted(), "schema build guarantees full scopes");
            Value::Nested(record)
        }
        FieldKind::Remainder => Value::Remainder(cursor.read_remainder().to_vec()),
    };
    Ok(value)
}
