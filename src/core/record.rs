//! Purpose: Immutable tree of decoded field values.
//! Exports: `Record`, `Field`, `Value`.
//! Role: Output of the decoder; consumed by renderers and span-level collaborators.
//! Invariants: Fields keep schema order and their absolute offset in the input.
//! Invariants: Nested records are owned by their parent slot; the tree has no sharing.

use crate::core::schema::DIGEST_LEN;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    /// Validated constant bytes, kept verbatim for diagnostics.
    Constant(Vec<u8>),
    Digest([u8; DIGEST_LEN]),
    Raw(Vec<u8>),
    Nested(Record),
    Remainder(Vec<u8>),
}

impl Value {
    /// Leaf bytes; `None` for a nested record.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Constant(bytes) | Value::Raw(bytes) | Value::Remainder(bytes) => {
                Some(bytes.as_slice())
            }
            Value::Digest(bytes) => Some(bytes.as_slice()),
            Value::Nested(_) => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Nested(record) => Some(record),
            _ => None,
        }
    }

    pub fn encoded_len(&self) -> usize {
        match self {
            Value::Nested(record) => record.encoded_len(),
            leaf => leaf.as_bytes().map_or(0, <[u8]>::len),
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Value::Constant(_) => "constant",
            Value::Digest(_) => "digest",
            Value::Raw(_) => "raw",
            Value::Nested(_) => "nested",
            Value::Remainder(_) => "remainder",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    name: String,
    offset: usize,
    value: Value,
}

impl Field {
    pub(crate) fn new(name: impl Into<String>, offset: usize, value: Value) -> Self {
        Self {
            name: name.into(),
            offset,
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute offset of the field's first byte in the decoded buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn len(&self) -> usize {
        self.value.encoded_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    name: String,
    fields: Vec<Field>,
}

impl Record {
    pub(crate) fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Name of the schema this record was decoded with.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.field(name).map(Field::value)
    }

    /// Looks up a dotted path such as `data7.part2`.
    pub fn field_at(&self, path: &str) -> Option<&Field> {
        let mut segments = path.split('.');
        let mut field = self.field(segments.next()?)?;
        for segment in segments {
            field = field.value.as_record()?.field(segment)?;
        }
        Some(field)
    }

    pub fn get_path(&self, path: &str) -> Option<&Value> {
        self.field_at(path).map(Field::value)
    }

    /// Leaf bytes at a dotted path.
    pub fn bytes(&self, path: &str) -> Option<&[u8]> {
        self.get_path(path)?.as_bytes()
    }

    pub fn child(&self, path: &str) -> Option<&Record> {
        self.get_path(path)?.as_record()
    }

    /// Offset of the first field, or `None` for an empty record.
    pub fn offset(&self) -> Option<usize> {
        self.fields.first().map(Field::offset)
    }

    pub fn encoded_len(&self) -> usize {
        self.fields.iter().map(Field::len).sum()
    }

    /// Leaves in wire order with their dotted paths.
    pub fn leaves(&self) -> Vec<(String, &Field)> {
        let mut out = Vec::new();
        self.collect_leaves("", &mut out);
        out
    }

    fn collect_leaves<'r>(&'r self, prefix: &str, out: &mut Vec<(String, &'r Field)>) {
        for field in &self.fields {
            let path = if prefix.is_empty() {
                field.name.clone()
            } else {
                format!("{prefix}.{}", field.name)
            };
            match &field.value {
                Value::Nested(child) => child.collect_leaves(&path, out),
                _ => out.push((path, field)),
            }
        }
    }
}

impl<'r> IntoIterator for &'r Record {
    type Item = &'r Field;
    type IntoIter = std::slice::Iter<'r, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Field, Record, Value};

    fn sample() -> Record {
        let inner = Record::new(
            "inner",
            vec![
                Field::new("a", 3, Value::Raw(vec![1, 2])),
                Field::new("b", 5, Value::Remainder(vec![])),
            ],
        );
        Record::new(
            "outer",
            vec![
                Field::new("magic", 0, Value::Constant(vec![0xCA, 0xFE, 0x00])),
                Field::new("inner", 3, Value::Nested(inner)),
            ],
        )
    }

    #[test]
    fn path_lookup_walks_nested_records() {
        let record = sample();
        assert_eq!(record.bytes("inner.a"), Some(&[1u8, 2][..]));
        assert_eq!(record.field_at("inner.b").map(Field::offset), Some(5));
        assert_eq!(record.bytes("inner"), None);
        assert!(record.child("inner").is_some());
        assert_eq!(record.get_path("inner.zzz"), None);
        assert_eq!(record.get_path("magic.a"), None);
        assert_eq!(record.get_path(""), None);
    }

    #[test]
    fn lengths_include_nested_children() {
        let record = sample();
        assert_eq!(record.encoded_len(), 5);
        assert_eq!(record.field("inner").map(Field::len), Some(2));
        assert!(record.field_at("inner.b").expect("b").is_empty());
    }

    #[test]
    fn leaves_are_in_wire_order() {
        let record = sample();
        let paths: Vec<String> = record.leaves().into_iter().map(|(path, _)| path).collect();
        assert_eq!(paths, vec!["magic", "inner.a", "inner.b"]);
    }
}
