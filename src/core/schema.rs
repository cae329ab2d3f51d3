//! Purpose: Declarative description of a fixed-layout record, in wire order.
//! Exports: `Schema`, `SchemaBuilder`, `FieldSpec`, `FieldKind`, `LayoutEntry`.
//! Role: Single source of truth for the format; the decoder only interprets it.
//! Invariants: Constants are stored as canonical unsigned bytes from build time on.
//! Invariants: A remainder field is always the last entry of its schema.
//! Invariants: A nested schema exactly fills its declared scope unless it ends in a remainder.

use crate::core::error::{Error, ErrorKind};

pub const DIGEST_LEN: usize = 32;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Constant(Box<[u8]>),
    Digest,
    Raw(usize),
    Nested { schema: Box<Schema>, len: usize },
    Remainder,
}

impl FieldKind {
    /// Byte length on the wire; `None` for a remainder, whose size is the scope's leftover.
    pub fn declared_len(&self) -> Option<usize> {
        match self {
            FieldKind::Constant(bytes) => Some(bytes.len()),
            FieldKind::Digest => Some(DIGEST_LEN),
            FieldKind::Raw(len) => Some(*len),
            FieldKind::Nested { len, .. } => Some(*len),
            FieldKind::Remainder => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Constant(_) => "constant",
            FieldKind::Digest => "digest",
            FieldKind::Raw(_) => "raw",
            FieldKind::Nested { .. } => "nested",
            FieldKind::Remainder => "remainder",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
}

impl FieldSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Schema {
    name: String,
    fields: Vec<FieldSpec>,
}

/// One row of a flattened schema, with offsets relative to the root scope.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LayoutEntry {
    pub path: String,
    pub kind: &'static str,
    pub depth: usize,
    pub offset: usize,
    pub len: Option<usize>,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn has_remainder(&self) -> bool {
        matches!(
            self.fields.last().map(FieldSpec::kind),
            Some(FieldKind::Remainder)
        )
    }

    /// Bytes consumed by every field except a trailing remainder.
    pub fn min_len(&self) -> usize {
        self.fields
            .iter()
            .filter_map(|field| field.kind.declared_len())
            .sum()
    }

    /// Exact encoded length, known only when there is no remainder field.
    pub fn fixed_len(&self) -> Option<usize> {
        if self.has_remainder() {
            None
        } else {
            Some(self.min_len())
        }
    }

    pub fn layout(&self) -> Vec<LayoutEntry> {
        let mut out = Vec::new();
        self.layout_into("", 0, 0, None, &mut out);
        out
    }

    fn layout_into(
        &self,
        prefix: &str,
        depth: usize,
        start: usize,
        scope_len: Option<usize>,
        out: &mut Vec<LayoutEntry>,
    ) {
        let mut offset = start;
        for field in &self.fields {
            let path = if prefix.is_empty() {
                field.name.clone()
            } else {
                format!("{prefix}.{}", field.name)
            };
            let len = match &field.kind {
                FieldKind::Remainder => scope_len.map(|scope| start + scope - offset),
                kind => kind.declared_len(),
            };
            out.push(LayoutEntry {
                path: path.clone(),
                kind: field.kind.label(),
                depth,
                offset,
                len,
            });
            if let FieldKind::Nested { schema, len } = &field.kind {
                schema.layout_into(&path, depth + 1, offset, Some(*len), out);
            }
            offset += len.unwrap_or(0);
        }
    }
}

/// Accumulates fields in wire order; `build` checks the layout invariants.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    pub fn constant(self, name: impl Into<String>, bytes: &[u8]) -> Self {
        self.push(name, FieldKind::Constant(bytes.into()))
    }

    /// Constant given as signed byte literals; -95 is stored as 0xA1.
    pub fn constant_signed(self, name: impl Into<String>, bytes: &[i8]) -> Self {
        let canonical: Vec<u8> = bytes.iter().map(|&byte| byte as u8).collect();
        self.push(name, FieldKind::Constant(canonical.into_boxed_slice()))
    }

    pub fn digest(self, name: impl Into<String>) -> Self {
        self.push(name, FieldKind::Digest)
    }

    pub fn raw(self, name: impl Into<String>, len: usize) -> Self {
        self.push(name, FieldKind::Raw(len))
    }

    pub fn nested(self, name: impl Into<String>, schema: Schema, len: usize) -> Self {
        self.push(
            name,
            FieldKind::Nested {
                schema: Box::new(schema),
                len,
            },
        )
    }

    pub fn remainder(self, name: impl Into<String>) -> Self {
        self.push(name, FieldKind::Remainder)
    }

    fn push(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn build(self) -> Result<Schema, Error> {
        let invalid = |field: &str, message: String| {
            Error::new(ErrorKind::InvalidSchema)
                .with_message(message)
                .with_field(format!("{}.{field}", self.name))
        };

        let last = self.fields.len().saturating_sub(1);
        for (idx, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() || field.name.contains('.') {
                return Err(invalid(
                    &field.name,
                    format!("field name {:?} must be non-empty and dot-free", field.name),
                ));
            }
            if self.fields[..idx].iter().any(|prev| prev.name == field.name) {
                return Err(invalid(&field.name, "duplicate field name".to_string()));
            }
            match &field.kind {
                FieldKind::Remainder if idx != last => {
                    return Err(invalid(
                        &field.name,
                        "remainder field must be the last entry".to_string(),
                    ));
                }
                FieldKind::Nested { schema, len } => match schema.fixed_len() {
                    Some(fixed) if fixed != *len => {
                        return Err(invalid(
                            &field.name,
                            format!("nested fields cover {fixed} bytes of a {len} byte scope"),
                        ));
                    }
                    None if schema.min_len() > *len => {
                        return Err(invalid(
                            &field.name,
                            format!(
                                "nested fields need {} bytes but the scope is {len}",
                                schema.min_len()
                            ),
                        ));
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        Ok(Schema {
            name: self.name,
            fields: self.fields,
        })
    }
}
