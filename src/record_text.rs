//! Purpose: Human-oriented rendering of decoded records and the schema layout.
//! Exports: `render_record`, `render_layout`.
//! Role: Default output of `init6 decode` / `init6 layout`.
//! Invariants: Every leaf is printed as `name:` followed by an indented hex dump.
//! Invariants: ANSI escapes appear only when colour is explicitly enabled.

use init6::api::{LayoutEntry, Record, Value, hexdump};

use crate::field_filter::FieldFilter;

const INDENT: &str = "  ";
const COLOR_LABEL: &str = "36";
const COLOR_META: &str = "90";

pub(crate) fn render_record(record: &Record, filter: &FieldFilter, use_color: bool) -> String {
    let mut out = String::new();
    write_fields(record, "", 0, filter, use_color, &mut out);
    out
}

fn write_fields(
    record: &Record,
    prefix: &str,
    depth: usize,
    filter: &FieldFilter,
    use_color: bool,
    out: &mut String,
) {
    for field in record {
        let path = if prefix.is_empty() {
            field.name().to_string()
        } else {
            format!("{prefix}.{}", field.name())
        };
        if !filter.selects(&path) {
            continue;
        }

        push_indent(depth, out);
        push_colored(&format!("{}:", field.name()), COLOR_LABEL, use_color, out);
        out.push(' ');
        push_colored(
            &format!(
                "({}, offset {}, {} bytes)",
                field.value().kind_label(),
                field.offset(),
                field.len()
            ),
            COLOR_META,
            use_color,
            out,
        );
        out.push('\n');

        match field.value() {
            Value::Nested(child) => write_fields(child, &path, depth + 1, filter, use_color, out),
            leaf => {
                let bytes = leaf.as_bytes().unwrap_or_default();
                for line in hexdump::dump(bytes).lines() {
                    push_indent(depth + 1, out);
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
    }
}

pub(crate) fn render_layout(entries: &[LayoutEntry]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<8} {:<8} {:<10} {}\n", "OFFSET", "LEN", "KIND", "FIELD"));
    for entry in entries {
        let len = entry
            .len
            .map(|len| len.to_string())
            .unwrap_or_else(|| "*".to_string());
        out.push_str(&format!(
            "{:<8} {:<8} {:<10} {}{}\n",
            entry.offset,
            len,
            entry.kind,
            INDENT.repeat(entry.depth),
            entry.path
        ));
    }
    out
}

fn push_indent(level: usize, out: &mut String) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

fn push_colored(text: &str, color: &str, use_color: bool, out: &mut String) {
    if !use_color {
        out.push_str(text);
        return;
    }
    out.push_str("\u{1b}[");
    out.push_str(color);
    out.push('m');
    out.push_str(text);
    out.push_str("\u{1b}[0m");
}
