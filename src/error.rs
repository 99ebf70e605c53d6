use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    /// Absolute byte offset from the start of the document.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("unexpected identifier `{0}`")]
    UnexpectedIdentifier(String),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid escape: {0}")]
    InvalidEscape(String),
    #[error("invalid number: {0}")]
    InvalidNumber(&'static str),
    #[error("trailing characters after top-level value")]
    TrailingCharacters,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("nesting deeper than {0} levels")]
    DepthLimitExceeded(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {location} near {context:?}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub location: Location,
    pub context: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, location: Location, context: impl Into<String>) -> Self {
        Self {
            kind,
            location,
            context: context.into(),
        }
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn column(&self) -> usize {
        self.location.column
    }

    pub fn offset(&self) -> usize {
        self.location.offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonFinite {
    NaN,
    PositiveInfinity,
    NegativeInfinity,
}

impl fmt::Display for NonFinite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NonFinite::NaN => "NaN",
            NonFinite::PositiveInfinity => "positive infinity",
            NonFinite::NegativeInfinity => "negative infinity",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("value is {0}, not a real number")]
    NotARealNumber(NonFinite),
    #[error("number does not fit in {0}")]
    OutOfRange(&'static str),
    #[error("malformed number literal `{0}`")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Number(#[from] NumberError),
    #[error("expected {expected}, found {found}")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("missing key `{0}`")]
    MissingKey(String),
    #[error("serialize failed: {0}")]
    Serialize(String),
    #[error("deserialize failed: {0}")]
    Deserialize(String),
    #[error("read failed: {0}")]
    Io(String),
    #[error("invalid binary data at byte {offset}: {reason}")]
    Binary { offset: usize, reason: String },
    #[error("stream parser already finished")]
    StreamClosed,
}

impl Error {
    pub fn serialize(message: impl Into<String>) -> Self {
        Error::Serialize(message.into())
    }

    pub fn deserialize(message: impl Into<String>) -> Self {
        Error::Deserialize(message.into())
    }

    /// The parse error behind this error, if the failure came from the grammar.
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            Error::Parse(err) => Some(err),
            _ => None,
        }
    }

    pub fn location(&self) -> Option<Location> {
        self.as_parse_error().map(|err| err.location)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_parse_error_display() {
        let err = ParseError::new(
            ParseErrorKind::UnexpectedCharacter(','),
            Location::new(7, 1, 8),
            "{\"a\":1,,}",
        );
        assert_eq!(
            err.to_string(),
            "unexpected character ',' at line 1, column 8 near \"{\\\"a\\\":1,,}\""
        );
    }

    #[rstest::rstest]
    fn test_number_error_display() {
        let err = NumberError::NotARealNumber(NonFinite::NaN);
        assert_eq!(err.to_string(), "value is NaN, not a real number");
        let err: Error = NumberError::OutOfRange("i8").into();
        assert_eq!(err.to_string(), "number does not fit in i8");
    }

    #[rstest::rstest]
    fn test_location_accessor() {
        let err: Error = ParseError::new(
            ParseErrorKind::TrailingCharacters,
            Location::new(3, 2, 1),
            "",
        )
        .into();
        assert_eq!(err.location(), Some(Location::new(3, 2, 1)));
        assert_eq!(Error::StreamClosed.location(), None);
    }
}
