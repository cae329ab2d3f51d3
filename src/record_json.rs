//! Purpose: JSON serializers for decoded records and the schema layout.
//! Exports: `record_json`, `layout_json`.
//! Role: Machine-readable output for `init6 decode --format json` and `init6 layout`.
//! Invariants: Stable key names; byte fields are lowercase hex strings.
//! Invariants: Nested records carry `fields` instead of `hex`.

use init6::api::{Field, LayoutEntry, Record, Value as FieldValue};
use serde_json::{Map, Value, json};

use crate::field_filter::FieldFilter;

pub(crate) fn record_json(record: &Record, filter: &FieldFilter) -> Value {
    let mut map = Map::new();
    map.insert("record".to_string(), json!(record.name()));
    map.insert("len".to_string(), json!(record.encoded_len()));
    map.insert("fields".to_string(), fields_json(record, "", filter));
    Value::Object(map)
}

fn fields_json(record: &Record, prefix: &str, filter: &FieldFilter) -> Value {
    let mut out = Vec::new();
    for field in record {
        let path = join_path(prefix, field.name());
        if !filter.selects(&path) {
            continue;
        }
        out.push(field_json(field, &path, filter));
    }
    Value::Array(out)
}

fn field_json(field: &Field, path: &str, filter: &FieldFilter) -> Value {
    let mut map = Map::new();
    map.insert("name".to_string(), json!(field.name()));
    map.insert("path".to_string(), json!(path));
    map.insert("kind".to_string(), json!(field.value().kind_label()));
    map.insert("offset".to_string(), json!(field.offset()));
    map.insert("len".to_string(), json!(field.len()));
    match field.value() {
        FieldValue::Nested(child) => {
            map.insert("fields".to_string(), fields_json(child, path, filter));
        }
        leaf => {
            let bytes = leaf.as_bytes().unwrap_or_default();
            map.insert("hex".to_string(), json!(hex::encode(bytes)));
        }
    }
    Value::Object(map)
}

pub(crate) fn layout_json(schema_name: &str, entries: &[LayoutEntry]) -> Value {
    let rows: Vec<Value> = entries
        .iter()
        .map(|entry| {
            json!({
                "path": entry.path,
                "kind": entry.kind,
                "depth": entry.depth,
                "offset": entry.offset,
                "len": entry.len,
            })
        })
        .collect();
    json!({ "record": schema_name, "fields": rows })
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::{layout_json, record_json};
    use crate::field_filter::FieldFilter;
    use init6::api::{DecodeOptions, Schema, decode_with_schema};

    fn schema() -> Schema {
        let inner = Schema::builder("inner")
            .raw("a", 1)
            .remainder("rest")
            .build()
            .expect("inner");
        Schema::builder("outer")
            .constant("magic", &[0xAB])
            .nested("body", inner, 3)
            .build()
            .expect("outer")
    }

    #[test]
    fn record_json_nests_children() {
        let record =
            decode_with_schema(&schema(), &[0xAB, 1, 2, 3], &DecodeOptions::default()).expect("decode");
        let value = record_json(&record, &FieldFilter::default());
        assert_eq!(value["record"], "outer");
        assert_eq!(value["len"], 4);
        assert_eq!(value["fields"][0]["hex"], "ab");
        assert_eq!(value["fields"][1]["kind"], "nested");
        assert_eq!(value["fields"][1]["fields"][1]["path"], "body.rest");
        assert_eq!(value["fields"][1]["fields"][1]["offset"], 2);
        assert_eq!(value["fields"][1]["fields"][1]["hex"], "0203");
    }

    #[test]
    fn record_json_applies_filter() {
        let record =
            decode_with_schema(&schema(), &[0xAB, 1, 2, 3], &DecodeOptions::default()).expect("decode");
        let filter = FieldFilter::new(vec!["body.a".to_string()]);
        let value = record_json(&record, &filter);
        let fields = value["fields"].as_array().expect("fields");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0]["fields"].as_array().expect("children").len(), 1);
    }

    #[test]
    fn layout_json_reports_unknown_lengths_as_null() {
        let layout = Schema::builder("s")
            .remainder("rest")
            .build()
            .expect("schema")
            .layout();
        let value = layout_json("s", &layout);
        assert!(value["fields"][0]["len"].is_null());
    }
}
