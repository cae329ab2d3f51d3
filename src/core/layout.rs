//! Purpose: The init6 record layout as a schema table.
//! Exports: `init6_schema`, `build_init6_schema`, field length constants.
//! Role: Format definition consumed by `decode_record`; built once per process.
//! Invariants: Field order is wire order.
//! Invariants: Constants are written as signed literals; the builder canonicalizes them.

use std::sync::OnceLock;

use crate::core::error::Error;
use crate::core::schema::Schema;

pub const DATA2_LEN: usize = 161;
pub const DATA3_LEN: usize = 184;
pub const DATA4_LEN: usize = 420;
pub const DATA5_LEN: usize = 256;
pub const DATA6_LEN: usize = 256;
pub const DATA7_LEN: usize = 400;
pub const DATA7_PART1_LEN: usize = 144;
pub const DATA7_SIGNATURE_LEN: usize = 76;
/// Total length of a well-formed record.
pub const INIT6_LEN: usize = 1938;

static INIT6: OnceLock<Schema> = OnceLock::new();

pub fn init6_schema() -> Result<&'static Schema, Error> {
    if let Some(schema) = INIT6.get() {
        return Ok(schema);
    }
    let schema = build_init6_schema()?;
    Ok(INIT6.get_or_init(|| schema))
}

pub fn build_init6_schema() -> Result<Schema, Error> {
    let data2 = Schema::builder("data2")
        .raw("data1", 17)
        .raw("encrypted", 112)
        .raw("data2", 32)
        .build()?;

    let data3 = Schema::builder("data3")
        .raw("header", 8)
        .raw("data1", 32)
        .raw("pad1", 36)
        .raw("data2", 32)
        .raw("pad2", 44)
        .raw("data3", 32)
        .build()?;

    let data7 = Schema::builder("data7")
        .raw("part1", DATA7_PART1_LEN)
        .raw("signature", DATA7_SIGNATURE_LEN)
        .remainder("part2")
        .build()?;

    Schema::builder("init6")
        .constant_signed("const1", &[0, 0, 0, 16, 0, 0, 0, 0, 0, 0, 1])
        .digest("hash1")
        .constant_signed("const2", &[29, 0, 4, 0, -95, 0])
        .digest("data2_hash")
        .nested("data2", data2, DATA2_LEN)
        .constant_signed("const3", &[3, 0, -72, 0])
        .digest("data3_hash")
        .nested("data3", data3, DATA3_LEN)
        .constant_signed("const4", &[5, 0, -92, 1])
        .digest("data4_hash")
        .raw("data4", DATA4_LEN)
        .constant_signed("const5", &[1, 0, 0, 1])
        .digest("data5_hash")
        .raw("data5", DATA5_LEN)
        .constant_signed("const6", &[2, 0, 0, 1])
        .digest("data6_hash")
        .raw("data6", DATA6_LEN)
        .constant_signed("const7", &[6, 0, -112, 1])
        .digest("data7_hash")
        .nested("data7", data7, DATA7_LEN)
        .build()
}
