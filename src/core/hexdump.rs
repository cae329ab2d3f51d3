//! Purpose: Convert between raw bytes and the textual hex-dump form captures are shared in.
//! Exports: `dump`, `restore`, `looks_like_text`, `BYTES_PER_LINE`.
//! Role: Loader/renderer helpers; the decoder itself only ever sees raw bytes.
//! Invariants: `restore(&dump(bytes))` returns `bytes` unchanged.
//! Invariants: The ascii column of a dump line is never parsed as data.

use crate::core::error::{Error, ErrorKind};

pub const BYTES_PER_LINE: usize = 16;

const ADDR_LEN: usize = 8;
// "XXXXXXXX: "
const PREFIX_LEN: usize = ADDR_LEN + 2;
// 16 bytes as "XX " with one extra gap after the eighth.
const HEX_COLUMN_LEN: usize = BYTES_PER_LINE * 3;

/// Renders `bytes` as `00000010: 1D 00 04 00 A1 00 ...  ......` lines, newline-terminated.
pub fn dump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (idx, chunk) in bytes.chunks(BYTES_PER_LINE).enumerate() {
        let mut hex = String::with_capacity(HEX_COLUMN_LEN);
        for (pos, byte) in chunk.iter().enumerate() {
            if pos == 8 {
                hex.push(' ');
            }
            if pos > 0 {
                hex.push(' ');
            }
            hex.push_str(&format!("{byte:02X}"));
        }
        let ascii: String = chunk
            .iter()
            .map(|&byte| {
                if byte.is_ascii_graphic() || byte == b' ' {
                    byte as char
                } else {
                    '.'
                }
            })
            .collect();
        out.push_str(&format!(
            "{:08X}: {hex:<width$}  {ascii}\n",
            idx * BYTES_PER_LINE,
            width = HEX_COLUMN_LEN
        ));
    }
    out
}

/// Restores bytes from a dump produced by [`dump`] (or the same layout from
/// other tools), or from a plain hex stream with arbitrary whitespace.
pub fn restore(text: &str) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    let mut plain = String::new();
    let mut plain_start: Option<usize> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        if let Some(region) = dump_line_region(line) {
            if plain_start.is_some() {
                return Err(invalid("dump lines mixed with plain hex", line_no));
            }
            for token in region.split_ascii_whitespace() {
                if token.len() != 2 {
                    return Err(invalid(format!("bad byte token {token:?}"), line_no));
                }
                let byte = hex::decode(token).map_err(|err| {
                    invalid(format!("bad byte token {token:?}"), line_no).with_source(err)
                })?;
                out.extend_from_slice(&byte);
            }
            continue;
        }
        if !out.is_empty() {
            return Err(invalid("plain hex mixed with dump lines", line_no));
        }
        plain_start.get_or_insert(line_no);
        for ch in line.chars().filter(|ch| !ch.is_whitespace()) {
            if !ch.is_ascii_hexdigit() {
                return Err(invalid(format!("unexpected character {ch:?}"), line_no));
            }
            plain.push(ch);
        }
    }

    if let Some(line_no) = plain_start {
        return hex::decode(&plain).map_err(|err| {
            invalid("plain hex stream has an odd number of digits", line_no).with_source(err)
        });
    }
    Ok(out)
}

/// True when every byte is printable ASCII or whitespace, i.e. the input is
/// probably a hex dump rather than a binary capture.
pub fn looks_like_text(bytes: &[u8]) -> bool {
    !bytes.is_empty()
        && bytes
            .iter()
            .all(|&byte| byte.is_ascii_graphic() || byte.is_ascii_whitespace())
}

fn dump_line_region(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    if bytes.len() < PREFIX_LEN
        || !bytes[..ADDR_LEN].iter().all(u8::is_ascii_hexdigit)
        || bytes[ADDR_LEN] != b':'
        || bytes[ADDR_LEN + 1] != b' '
    {
        return None;
    }
    // A multi-byte char straddling the column edge belongs to the ascii side.
    let mut end = line.len().min(PREFIX_LEN + HEX_COLUMN_LEN);
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    Some(&line[PREFIX_LEN..end])
}

fn invalid(message: impl Into<String>, line_no: usize) -> Error {
    Error::new(ErrorKind::InvalidInput)
        .with_message(message)
        .with_field(format!("line {line_no}"))
        .with_hint("Expected `XXXXXXXX: hh hh ...` dump lines or a plain hex stream.")
}
