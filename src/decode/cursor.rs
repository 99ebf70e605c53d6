use crate::constants::CONTEXT_RADIUS;
use crate::decode::Halt;
use crate::error::{Location, ParseError, ParseErrorKind};

/// Committed read position, independent of any buffer borrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Absolute byte offset from the start of the document.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn location(self) -> Location {
        Location::new(self.offset, self.line, self.column)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

/// Character cursor over one buffered chunk of a document.
///
/// `base` is the absolute offset of `input[0]`, so a cursor over a buffer
/// whose consumed prefix was dropped still reports document offsets.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    base: usize,
    line: usize,
    column: usize,
    is_final: bool,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str, is_final: bool) -> Self {
        Self::resume(input, 0, Position::start(), is_final)
    }

    /// Rebuilds a cursor at `position` over `input`, which starts at absolute offset `base`.
    pub fn resume(input: &'a str, base: usize, position: Position, is_final: bool) -> Self {
        Self {
            input,
            pos: position.offset.saturating_sub(base).min(input.len()),
            base,
            line: position.line,
            column: position.column,
            is_final,
        }
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        let bytes = self.input.as_bytes();
        match bytes.get(self.pos) {
            Some(&byte) if byte.is_ascii() => Some(byte as char),
            Some(_) => self.input[self.pos..].chars().next(),
            None => None,
        }
    }

    pub fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next()?;
        chars.next()
    }

    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        match ch {
            '\r' => {
                if self.input.as_bytes().get(self.pos) == Some(&b'\n') {
                    self.pos += 1;
                }
                self.new_line();
            }
            '\n' | '\u{2028}' | '\u{2029}' => self.new_line(),
            _ => self.column += 1,
        }
        Some(ch)
    }

    /// Consumes `len` bytes known to hold no line terminator and returns them.
    pub fn advance_span(&mut self, len: usize) -> &'a str {
        let span = &self.input[self.pos..self.pos + len];
        self.column += span.chars().count();
        self.pos += len;
        span
    }

    fn new_line(&mut self) {
        self.line += 1;
        self.column = 1;
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Unread remainder of the buffer.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Buffer-relative byte index, for slicing with [`Cursor::slice`].
    pub fn index(&self) -> usize {
        self.pos
    }

    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub fn position(&self) -> Position {
        Position {
            offset: self.offset(),
            line: self.line,
            column: self.column,
        }
    }

    pub fn location(&self) -> Location {
        self.position().location()
    }

    /// Signal for input that ran out mid-token.
    pub fn need_more(&self) -> Halt {
        if self.is_final {
            self.error(ParseErrorKind::UnexpectedEndOfInput)
        } else {
            Halt::Suspend
        }
    }

    pub fn error(&self, kind: ParseErrorKind) -> Halt {
        Halt::Fail(self.parse_error(kind))
    }

    pub fn parse_error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.location(), self.excerpt())
    }

    /// Up to `CONTEXT_RADIUS` characters on each side of the cursor.
    pub fn excerpt(&self) -> String {
        let before = &self.input[..self.pos];
        let after = &self.input[self.pos..];
        let start = before
            .char_indices()
            .rev()
            .nth(CONTEXT_RADIUS - 1)
            .map_or(0, |(idx, _)| idx);
        let end = after
            .char_indices()
            .nth(CONTEXT_RADIUS)
            .map_or(after.len(), |(idx, _)| idx);
        format!("{}{}", &before[start..], &after[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_advance_tracks_lines_and_columns() {
        let mut cursor = Cursor::new("ab\ncd", true);
        assert_eq!(cursor.advance(), Some('a'));
        assert_eq!(cursor.advance(), Some('b'));
        assert_eq!((cursor.position().line, cursor.position().column), (1, 3));
        assert_eq!(cursor.advance(), Some('\n'));
        assert_eq!((cursor.position().line, cursor.position().column), (2, 1));
        cursor.advance();
        assert_eq!(cursor.position().column, 2);
    }

    #[rstest::rstest]
    #[case("\r\nx", 2)]
    #[case("\rx", 2)]
    #[case("\n\rx", 3)]
    #[case("\u{2028}x", 2)]
    #[case("\u{2029}x", 2)]
    fn test_line_terminators(#[case] input: &str, #[case] line: usize) {
        let mut cursor = Cursor::new(input, true);
        while cursor.peek() != Some('x') {
            cursor.advance();
        }
        assert_eq!(cursor.position().line, line);
        assert_eq!(cursor.position().column, 1);
    }

    #[rstest::rstest]
    fn test_columns_count_characters() {
        let mut cursor = Cursor::new("ü€x", true);
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.peek(), Some('x'));
        assert_eq!(cursor.position().column, 3);
        assert_eq!(cursor.offset(), 5);
    }

    #[rstest::rstest]
    fn test_peek_second() {
        let cursor = Cursor::new("/*", false);
        assert_eq!(cursor.peek(), Some('/'));
        assert_eq!(cursor.peek_second(), Some('*'));
        assert_eq!(Cursor::new("/", false).peek_second(), None);
    }

    #[rstest::rstest]
    fn test_resume_uses_absolute_offsets() {
        let position = Position {
            offset: 12,
            line: 3,
            column: 4,
        };
        let cursor = Cursor::resume("xyz", 10, position, false);
        assert_eq!(cursor.peek(), Some('z'));
        assert_eq!(cursor.location(), Location::new(12, 3, 4));
    }

    #[rstest::rstest]
    fn test_need_more_depends_on_finality() {
        assert_eq!(Cursor::new("", false).need_more(), Halt::Suspend);
        match Cursor::new("", true).need_more() {
            Halt::Fail(err) => assert_eq!(err.kind, ParseErrorKind::UnexpectedEndOfInput),
            Halt::Suspend => panic!("final chunk must not suspend"),
        }
    }

    #[rstest::rstest]
    fn test_excerpt_is_bounded() {
        let text = "a".repeat(40) + "|" + &"b".repeat(40);
        let mut cursor = Cursor::new(&text, true);
        for _ in 0..40 {
            cursor.advance();
        }
        let excerpt = cursor.excerpt();
        assert_eq!(excerpt, format!("{}|{}", "a".repeat(16), "b".repeat(15)));
    }
}
