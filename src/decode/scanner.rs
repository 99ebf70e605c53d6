//! Token scanners. Each one either consumes a whole token or reports
//! [`Halt::Suspend`] and leaves the caller to rewind to the token start.

use std::borrow::Cow;

use crate::constants::{
    is_json5_whitespace, is_json_whitespace, is_line_terminator, DEFAULT_MAX_EXPONENT, MAX_EXPONENT,
};
use crate::decode::cursor::Cursor;
use crate::decode::{Halt, Step};
use crate::error::ParseErrorKind;
use crate::num::decimal::Decimal;
use crate::num::number::Number;
use crate::options::Dialect;
use crate::text::ident::{is_id_part, is_id_start};

/// Skips whitespace, line terminators and comments.
///
/// Progress over complete whitespace and comments is kept when this suspends;
/// an incomplete comment is rewound to its `/`.
pub fn skip_whitespace_and_comments(cursor: &mut Cursor<'_>, dialect: Dialect) -> Step<()> {
    loop {
        let Some(ch) = cursor.peek() else {
            return Ok(());
        };
        match ch {
            '\r' => {
                if cursor.peek_second().is_none() && !cursor.is_final() {
                    return Err(Halt::Suspend);
                }
                cursor.advance();
            }
            '\n' => {
                cursor.advance();
            }
            '\u{2028}' | '\u{2029}' if dialect.is_json5() => {
                cursor.advance();
            }
            '/' if dialect.is_json5() => match cursor.peek_second() {
                Some('/') => skip_line_comment(cursor)?,
                Some('*') => skip_block_comment(cursor)?,
                Some(_) => return Ok(()),
                None if cursor.is_final() => return Ok(()),
                None => return Err(Halt::Suspend),
            },
            _ if dialect.is_json5() && is_json5_whitespace(ch) => {
                cursor.advance();
            }
            _ if is_json_whitespace(ch) => {
                cursor.advance();
            }
            _ => return Ok(()),
        }
    }
}

fn skip_line_comment(cursor: &mut Cursor<'_>) -> Step<()> {
    let start = *cursor;
    cursor.advance();
    cursor.advance();
    while let Some(ch) = cursor.peek() {
        if is_line_terminator(ch) {
            return Ok(());
        }
        cursor.advance();
    }
    if cursor.is_final() {
        Ok(())
    } else {
        *cursor = start;
        Err(Halt::Suspend)
    }
}

fn skip_block_comment(cursor: &mut Cursor<'_>) -> Step<()> {
    let start = *cursor;
    cursor.advance();
    cursor.advance();
    loop {
        match cursor.peek() {
            Some('*') if cursor.peek_second() == Some('/') => {
                cursor.advance();
                cursor.advance();
                return Ok(());
            }
            Some(_) => {
                cursor.advance();
            }
            None if cursor.is_final() => {
                return Err(start.error(ParseErrorKind::UnterminatedComment));
            }
            None => {
                *cursor = start;
                return Err(Halt::Suspend);
            }
        }
    }
}

fn unterminated_string(start: &Cursor<'_>, cursor: &Cursor<'_>) -> Halt {
    if cursor.is_final() {
        start.error(ParseErrorKind::UnterminatedString)
    } else {
        Halt::Suspend
    }
}

/// Scans a quoted string. Strings without escapes borrow from the buffer.
pub fn scan_string<'a>(cursor: &mut Cursor<'a>, dialect: Dialect) -> Step<Cow<'a, str>> {
    let start = *cursor;
    let quote = match cursor.peek() {
        Some('"') => '"',
        Some('\'') if dialect.is_json5() => '\'',
        Some(other) => return Err(cursor.error(ParseErrorKind::UnexpectedCharacter(other))),
        None => return Err(cursor.need_more()),
    };
    cursor.advance();

    if let Some(len) = plain_run(cursor.rest(), quote, dialect) {
        let body = cursor.advance_span(len);
        cursor.advance();
        return Ok(Cow::Borrowed(body));
    }

    let mut out = String::new();
    loop {
        let Some(ch) = cursor.peek() else {
            return Err(unterminated_string(&start, cursor));
        };
        if ch == quote {
            cursor.advance();
            return Ok(Cow::Owned(out));
        }
        if is_line_terminator(ch) {
            return Err(start.error(ParseErrorKind::UnterminatedString));
        }
        if ch < ' ' && !dialect.is_json5() {
            return Err(cursor.error(ParseErrorKind::UnexpectedCharacter(ch)));
        }
        if ch == '\\' {
            scan_escape(cursor, &start, &mut out, dialect)?;
        } else {
            out.push(ch);
            cursor.advance();
        }
    }
}

/// Length of the string body when it closes before any escape or raw line break.
fn plain_run(rest: &str, quote: char, dialect: Dialect) -> Option<usize> {
    let bytes = rest.as_bytes();
    let end = memchr::memchr2(quote as u8, b'\\', bytes)?;
    if bytes[end] != quote as u8 {
        return None;
    }
    let body = &bytes[..end];
    if memchr::memchr2(b'\n', b'\r', body).is_some() {
        return None;
    }
    if memchr::memchr(0xE2, body).is_some() && rest[..end].contains(['\u{2028}', '\u{2029}']) {
        return None;
    }
    if !dialect.is_json5() && body.iter().any(|byte| *byte < 0x20) {
        return None;
    }
    Some(end)
}

fn scan_escape(
    cursor: &mut Cursor<'_>,
    string_start: &Cursor<'_>,
    out: &mut String,
    dialect: Dialect,
) -> Step<()> {
    let escape_start = *cursor;
    cursor.advance();
    let Some(ch) = cursor.peek() else {
        return Err(unterminated_string(string_start, cursor));
    };
    let json5 = dialect.is_json5();
    let invalid = |text: String| escape_start.error(ParseErrorKind::InvalidEscape(text));
    match ch {
        '"' | '\\' | '/' => out.push(ch),
        '\'' if json5 => out.push(ch),
        'b' => out.push('\u{8}'),
        'f' => out.push('\u{c}'),
        'n' => out.push('\n'),
        'r' => out.push('\r'),
        't' => out.push('\t'),
        'v' if json5 => out.push('\u{b}'),
        '0' if json5 => {
            cursor.advance();
            match cursor.peek() {
                Some(next) if next.is_ascii_digit() => {
                    return Err(invalid(format!("\\0{next}")));
                }
                None => return Err(unterminated_string(string_start, cursor)),
                Some(_) => {}
            }
            out.push('\0');
            return Ok(());
        }
        'x' if json5 => {
            cursor.advance();
            let code = read_hex(cursor, string_start, &escape_start, 2)?;
            out.push(char::from_u32(code).ok_or_else(|| invalid(format!("\\x{code:02x}")))?);
            return Ok(());
        }
        'u' => {
            cursor.advance();
            let ch = scan_unicode_escape(cursor, string_start, &escape_start, dialect)?;
            out.push(ch);
            return Ok(());
        }
        _ if json5 && is_line_terminator(ch) => {
            cursor.advance();
            return Ok(());
        }
        _ => return Err(invalid(format!("\\{ch}"))),
    }
    cursor.advance();
    Ok(())
}

/// Decodes the part after `\u`: `HHHH`, a surrogate pair, or `{H...H}`.
fn scan_unicode_escape(
    cursor: &mut Cursor<'_>,
    string_start: &Cursor<'_>,
    escape_start: &Cursor<'_>,
    dialect: Dialect,
) -> Step<char> {
    let invalid = |text: String| escape_start.error(ParseErrorKind::InvalidEscape(text));
    if dialect.is_json5() && cursor.peek() == Some('{') {
        cursor.advance();
        let mut code: u32 = 0;
        let mut digits = 0usize;
        loop {
            match cursor.peek() {
                Some('}') if digits > 0 => {
                    cursor.advance();
                    break;
                }
                Some(ch) if ch.is_ascii_hexdigit() => {
                    code = code
                        .checked_mul(16)
                        .and_then(|code| code.checked_add(ch.to_digit(16).unwrap_or(0)))
                        .filter(|code| *code <= 0x10FFFF)
                        .ok_or_else(|| invalid("\\u{...} out of range".to_string()))?;
                    digits += 1;
                    cursor.advance();
                }
                Some(ch) => return Err(invalid(format!("\\u{{ followed by {ch:?}"))),
                None => return Err(unterminated_string(string_start, cursor)),
            }
        }
        return char::from_u32(code).ok_or_else(|| invalid(format!("\\u{{{code:x}}}")));
    }

    let high = read_hex(cursor, string_start, escape_start, 4)?;
    match high {
        0xD800..=0xDBFF => {
            match (cursor.peek(), cursor.peek_second()) {
                (Some('\\'), Some('u')) => {}
                (None, _) | (Some('\\'), None) => {
                    return Err(unterminated_string(string_start, cursor));
                }
                _ => return Err(invalid(format!("unpaired surrogate \\u{high:04x}"))),
            }
            cursor.advance();
            cursor.advance();
            let low = read_hex(cursor, string_start, escape_start, 4)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(invalid(format!("unpaired surrogate \\u{high:04x}")));
            }
            let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
            char::from_u32(combined).ok_or_else(|| invalid(format!("\\u{high:04x}")))
        }
        0xDC00..=0xDFFF => Err(invalid(format!("unpaired surrogate \\u{high:04x}"))),
        _ => char::from_u32(high).ok_or_else(|| invalid(format!("\\u{high:04x}"))),
    }
}

fn read_hex(
    cursor: &mut Cursor<'_>,
    string_start: &Cursor<'_>,
    escape_start: &Cursor<'_>,
    count: usize,
) -> Step<u32> {
    let mut code = 0u32;
    for _ in 0..count {
        match cursor.peek() {
            Some(ch) if ch.is_ascii_hexdigit() => {
                code = code * 16 + ch.to_digit(16).unwrap_or(0);
                cursor.advance();
            }
            Some(ch) => {
                return Err(escape_start.error(ParseErrorKind::InvalidEscape(format!(
                    "expected hex digit, found {ch:?}"
                ))));
            }
            None => return Err(unterminated_string(string_start, cursor)),
        }
    }
    Ok(code)
}

/// Scans a numeric literal, including `Infinity`, `NaN` and hex in JSON5.
pub fn scan_number(cursor: &mut Cursor<'_>, dialect: Dialect) -> Step<Number> {
    scan_number_with_limit(cursor, dialect, DEFAULT_MAX_EXPONENT)
}

/// [`scan_number`] rejecting literals whose `e` part exceeds `max_exponent`
/// in magnitude.
pub fn scan_number_with_limit(
    cursor: &mut Cursor<'_>,
    dialect: Dialect,
    max_exponent: u32,
) -> Step<Number> {
    let start = *cursor;
    let json5 = dialect.is_json5();
    let negative = match cursor.peek() {
        Some('-') => {
            cursor.advance();
            true
        }
        Some('+') if json5 => {
            cursor.advance();
            false
        }
        _ => false,
    };

    match cursor.peek() {
        None => return Err(cursor.need_more()),
        Some(ch) if is_id_start(ch) => {
            let word_start = *cursor;
            let word = scan_identifier(cursor)?;
            return match word {
                "Infinity" if json5 && negative => Ok(Number::NegativeInfinity),
                "Infinity" if json5 => Ok(Number::PositiveInfinity),
                "NaN" if json5 => Ok(Number::NaN),
                _ => Err(word_start.error(ParseErrorKind::UnexpectedIdentifier(word.to_string()))),
            };
        }
        _ => {}
    }

    if json5 && cursor.peek() == Some('0') && matches!(cursor.peek_second(), Some('x' | 'X')) {
        cursor.advance();
        cursor.advance();
        let digits = take_while(cursor, |ch| ch.is_ascii_hexdigit());
        if cursor.at_end() && !cursor.is_final() {
            return Err(Halt::Suspend);
        }
        if digits.is_empty() {
            return Err(start.error(ParseErrorKind::InvalidNumber("missing hex digits")));
        }
        return Ok(Number::Finite(Decimal::from_hex_digits(negative, digits)));
    }

    let int_digits = take_while(cursor, |ch| ch.is_ascii_digit());
    if !json5 {
        if int_digits.is_empty() {
            return Err(match cursor.peek() {
                Some(ch) => cursor.error(ParseErrorKind::UnexpectedCharacter(ch)),
                None => cursor.need_more(),
            });
        }
        if int_digits.len() > 1 && int_digits.starts_with('0') {
            return Err(start.error(ParseErrorKind::InvalidNumber("leading zero")));
        }
    }

    let mut frac_digits = "";
    if cursor.peek() == Some('.') {
        cursor.advance();
        frac_digits = take_while(cursor, |ch| ch.is_ascii_digit());
        if !json5 && frac_digits.is_empty() {
            return Err(incomplete_number(cursor, &start, "missing fraction digits"));
        }
    }
    if int_digits.is_empty() && frac_digits.is_empty() {
        return Err(incomplete_number(cursor, &start, "missing digits"));
    }

    let mut literal_exponent: i64 = 0;
    if matches!(cursor.peek(), Some('e' | 'E')) {
        cursor.advance();
        let exponent_negative = match cursor.peek() {
            Some('-') => {
                cursor.advance();
                true
            }
            Some('+') => {
                cursor.advance();
                false
            }
            _ => false,
        };
        let exponent_digits = take_while(cursor, |ch| ch.is_ascii_digit());
        if exponent_digits.is_empty() {
            return Err(incomplete_number(cursor, &start, "missing exponent digits"));
        }
        for byte in exponent_digits.bytes() {
            literal_exponent = literal_exponent
                .saturating_mul(10)
                .saturating_add(i64::from(byte - b'0'));
        }
        if exponent_negative {
            literal_exponent = -literal_exponent;
        }
    }

    if cursor.at_end() && !cursor.is_final() {
        return Err(Halt::Suspend);
    }
    let exponent = literal_exponent.saturating_sub(frac_digits.len() as i64);
    let limit = u64::from(max_exponent).min(MAX_EXPONENT as u64);
    if literal_exponent.unsigned_abs() > limit || exponent.unsigned_abs() > MAX_EXPONENT as u64 {
        return Err(start.error(ParseErrorKind::InvalidNumber("exponent out of range")));
    }
    Ok(Number::Finite(Decimal::from_digits(
        negative,
        int_digits,
        frac_digits,
        literal_exponent,
    )))
}

fn incomplete_number(cursor: &Cursor<'_>, start: &Cursor<'_>, reason: &'static str) -> Halt {
    if cursor.at_end() && !cursor.is_final() {
        Halt::Suspend
    } else {
        start.error(ParseErrorKind::InvalidNumber(reason))
    }
}

/// Scans `$`, `_` or an XID_Start character followed by identifier parts.
pub fn scan_identifier<'a>(cursor: &mut Cursor<'a>) -> Step<&'a str> {
    match cursor.peek() {
        Some(ch) if is_id_start(ch) => {}
        Some(ch) => return Err(cursor.error(ParseErrorKind::UnexpectedCharacter(ch))),
        None => return Err(cursor.need_more()),
    }
    let begin = cursor.index();
    cursor.advance();
    while let Some(ch) = cursor.peek() {
        if !is_id_part(ch) {
            break;
        }
        cursor.advance();
    }
    if cursor.at_end() && !cursor.is_final() {
        return Err(Halt::Suspend);
    }
    Ok(cursor.slice(begin, cursor.index()))
}

fn take_while<'a>(cursor: &mut Cursor<'a>, accept: impl Fn(char) -> bool) -> &'a str {
    let begin = cursor.index();
    while let Some(ch) = cursor.peek() {
        if !accept(ch) {
            break;
        }
        cursor.advance();
    }
    cursor.slice(begin, cursor.index())
}
