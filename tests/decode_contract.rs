// Decoder contract tests against the init6 layout: offsets, failure localization, strictness.
use init6::api::{
    DecodeOptions, ErrorKind, FieldKind, INIT6_LEN, Value, decode_record, decode_record_with,
    init6_schema,
};
use proptest::prelude::*;

/// A well-formed capture: exact constants, every other byte derived from its offset.
fn conformant() -> Vec<u8> {
    let schema = init6_schema().expect("schema");
    let mut buf = Vec::with_capacity(INIT6_LEN);
    for field in schema.fields() {
        match field.kind() {
            FieldKind::Constant(bytes) => buf.extend_from_slice(bytes),
            kind => {
                let len = kind.declared_len().expect("top-level fields are fixed");
                let start = buf.len();
                buf.extend((start..start + len).map(|idx| (idx * 7 % 251) as u8));
            }
        }
    }
    assert_eq!(buf.len(), INIT6_LEN);
    buf
}

/// Top-level (name, offset, len, is_constant) rows in wire order.
fn top_level() -> Vec<(String, usize, usize, bool)> {
    let schema = init6_schema().expect("schema");
    let mut offset = 0;
    schema
        .fields()
        .iter()
        .map(|field| {
            let len = field.kind().declared_len().expect("fixed");
            let row = (
                field.name().to_string(),
                offset,
                len,
                matches!(field.kind(), FieldKind::Constant(_)),
            );
            offset += len;
            row
        })
        .collect()
}

#[test]
fn conformant_buffer_decodes_without_gaps() {
    let buf = conformant();
    let record = decode_record(&buf).expect("decode");
    assert_eq!(record.name(), "init6");
    assert_eq!(record.encoded_len(), INIT6_LEN);

    let mut expected_offset = 0;
    for (path, field) in record.leaves() {
        assert_eq!(field.offset(), expected_offset, "gap or overlap before {path}");
        let bytes = field.value().as_bytes().expect("leaf");
        assert_eq!(bytes, &buf[field.offset()..field.offset() + bytes.len()], "{path}");
        expected_offset += bytes.len();
    }
    assert_eq!(expected_offset, INIT6_LEN);
}

#[test]
fn data2_data1_sits_after_the_first_four_fields() {
    let buf = conformant();
    let record = decode_record(&buf).expect("decode");
    assert_eq!(record.bytes("data2.data1"), Some(&buf[81..98]));
    assert_eq!(record.bytes("data2.encrypted").map(<[u8]>::len), Some(112));
}

#[test]
fn constants_and_digests_are_stored_verbatim() {
    let buf = conformant();
    let record = decode_record(&buf).expect("decode");
    match record.get("const2") {
        Some(Value::Constant(bytes)) => assert_eq!(bytes, &[0x1D, 0x00, 0x04, 0x00, 0xA1, 0x00]),
        other => panic!("unexpected const2 {other:?}"),
    }
    match record.get("hash1") {
        Some(Value::Digest(digest)) => assert_eq!(&digest[..], &buf[11..43]),
        other => panic!("unexpected hash1 {other:?}"),
    }
}

#[test]
fn data7_part2_is_the_scope_remainder() {
    let record = decode_record(&conformant()).expect("decode");
    let data7 = record.child("data7").expect("data7");
    assert_eq!(data7.encoded_len(), 400);
    assert_eq!(record.bytes("data7.part1").map(<[u8]>::len), Some(144));
    assert_eq!(record.bytes("data7.signature").map(<[u8]>::len), Some(76));
    assert_eq!(record.bytes("data7.part2").map(<[u8]>::len), Some(180));
    assert!(matches!(record.get_path("data7.part2"), Some(Value::Remainder(_))));
}

#[test]
fn corrupt_const1_is_reported_before_anything_else() {
    let mut buf = conformant();
    buf[3] ^= 0xFF;
    // A later constant is broken too; the first one in schema order wins.
    buf[242] ^= 0xFF;
    let err = decode_record(&buf).expect_err("corrupt");
    assert_eq!(err.kind(), ErrorKind::ConstantMismatch);
    assert_eq!(err.field(), Some("const1"));
    assert_eq!(err.offset(), Some(0));
    assert_eq!(err.actual().map(|actual| actual[3]), Some(0xEF));
}

#[test]
fn truncation_at_200_fails_on_data2() {
    let buf = conformant();
    let err = decode_record(&buf[..200]).expect_err("truncated");
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    assert_eq!(err.field(), Some("data2"));
    assert_eq!(err.needed(), Some(161));
    assert_eq!(err.available(), Some(119));
    assert_eq!(err.offset(), Some(81));
}

#[test]
fn trailing_bytes_are_ignored_unless_strict() {
    let mut buf = conformant();
    buf.extend_from_slice(&[0xEE; 5]);

    let lenient = decode_record(&buf).expect("lenient");
    assert_eq!(lenient.encoded_len(), INIT6_LEN);

    let err = decode_record_with(&buf, &DecodeOptions::strict()).expect_err("strict");
    assert_eq!(err.kind(), ErrorKind::TrailingData);
    assert_eq!(err.extra(), Some(5));
    assert_eq!(err.offset(), Some(INIT6_LEN as u64));

    decode_record_with(&conformant(), &DecodeOptions::strict()).expect("exact length is fine");
}

#[test]
fn decoding_is_deterministic() {
    let buf = conformant();
    let first = decode_record(&buf).expect("first");
    let second = decode_record(&buf).expect("second");
    assert_eq!(first, second);
}

#[test]
fn independent_buffers_decode_in_parallel() {
    let handles: Vec<_> = (0..4u8)
        .map(|seed| {
            std::thread::spawn(move || {
                let mut buf = conformant();
                buf[100] = seed;
                let record = decode_record(&buf).expect("decode");
                record.bytes("data2.encrypted").map(|bytes| bytes[2])
            })
        })
        .collect();
    for (seed, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().expect("thread"), Some(seed as u8));
    }
}

proptest! {
    #[test]
    fn truncation_names_the_unfinished_field(len in 0usize..INIT6_LEN) {
        let buf = conformant();
        let err = decode_record(&buf[..len]).expect_err("truncated");
        let (name, offset, field_len, _) = top_level()
            .into_iter()
            .find(|(_, offset, field_len, _)| offset + field_len > len)
            .expect("some field is unfinished");
        prop_assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
        prop_assert_eq!(err.field(), Some(name.as_str()));
        prop_assert_eq!(err.needed(), Some(field_len));
        prop_assert_eq!(err.available(), Some(len - offset));
    }

    #[test]
    fn a_single_bad_constant_byte_is_localized(pick in any::<prop::sample::Index>(), flip in 1u8..=255) {
        let constants: Vec<_> = top_level().into_iter().filter(|row| row.3).collect();
        let (name, offset, len, _) = pick.get(&constants).clone();
        let mut buf = conformant();
        let at = offset + (flip as usize % len);
        buf[at] ^= flip;
        let err = decode_record(&buf).expect_err("mismatch");
        prop_assert_eq!(err.kind(), ErrorKind::ConstantMismatch);
        prop_assert_eq!(err.field(), Some(name.as_str()));
        prop_assert_eq!(err.offset(), Some(offset as u64));
    }

    #[test]
    fn payload_bytes_never_affect_structure(payload in prop::collection::vec(any::<u8>(), INIT6_LEN)) {
        let mut buf = conformant();
        for (_, offset, len, is_constant) in top_level() {
            if !is_constant {
                buf[offset..offset + len].copy_from_slice(&payload[offset..offset + len]);
            }
        }
        let record = decode_record(&buf).expect("decode");
        prop_assert_eq!(record.bytes("data7.part2").map(<[u8]>::len), Some(180));
        prop_assert_eq!(record.bytes("data4"), Some(&buf[498..918]));
    }
}
