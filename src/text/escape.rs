use crate::options::Dialect;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Appends `value` with every character that cannot appear raw between
/// `quote` characters escaped. Does not write the quotes themselves.
pub fn escape_into(out: &mut Vec<u8>, value: &str, quote: char, dialect: Dialect) {
    let bytes = value.as_bytes();
    let quote = quote as u8;
    let mut start = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        let byte = bytes[idx];
        let width = match byte {
            0xE2 if is_paragraph_or_line_separator(&bytes[idx..]) => 3,
            b'\\' | 0x00..=0x1F => 1,
            _ if byte == quote => 1,
            _ => {
                idx += 1;
                continue;
            }
        };
        out.extend_from_slice(&bytes[start..idx]);
        match byte {
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            0x08 => out.extend_from_slice(b"\\b"),
            0x0C => out.extend_from_slice(b"\\f"),
            0x0B if dialect.is_json5() => out.extend_from_slice(b"\\v"),
            0xE2 => {
                let code = if bytes[idx + 2] == 0xA8 { b'8' } else { b'9' };
                out.extend_from_slice(b"\\u202");
                out.push(code);
            }
            0x00..=0x1F => {
                out.extend_from_slice(b"\\u00");
                out.push(HEX[usize::from(byte >> 4)]);
                out.push(HEX[usize::from(byte & 0x0F)]);
            }
            _ => {
                out.push(b'\\');
                out.push(byte);
            }
        }
        idx += width;
        start = idx;
    }
    out.extend_from_slice(&bytes[start..]);
}

pub fn escape(value: &str, quote: char, dialect: Dialect) -> String {
    let mut out = Vec::with_capacity(value.len() + 2);
    escape_into(&mut out, value, quote, dialect);
    String::from_utf8(out).unwrap_or_default()
}

#[inline]
fn is_paragraph_or_line_separator(bytes: &[u8]) -> bool {
    matches!(bytes, [0xE2, 0x80, 0xA8 | 0xA9, ..])
}
