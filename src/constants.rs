pub const KEYWORDS: &[&str] = &["null", "true", "false", "Infinity", "NaN"];

pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Characters of context kept on each side of a parse error.
pub const CONTEXT_RADIUS: usize = 16;

pub const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Longest hex literal that still fits the `u64` fast path.
pub(crate) const MAX_FAST_HEX_DIGITS: usize = 16;

/// Longest decimal mantissa that always fits the `u64` fast path.
pub(crate) const MAX_FAST_DECIMAL_DIGITS: usize = 19;

/// Largest `|e|` a numeric literal may carry unless `DecodeOptions` says otherwise.
/// Plain rendering writes out every zero the exponent implies.
pub const DEFAULT_MAX_EXPONENT: u32 = 4096;

/// Ceiling on the exponent of any `Decimal`.
pub const MAX_EXPONENT: i64 = 1 << 20;

#[inline]
pub fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Whitespace accepted between tokens. Line terminators are handled separately.
#[inline]
pub fn is_json5_whitespace(ch: char) -> bool {
    ch == '\u{FEFF}' || (ch.is_whitespace() && ch != '\u{85}' && !is_line_terminator(ch))
}

#[inline]
pub fn is_json_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t')
}

#[inline]
pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}
