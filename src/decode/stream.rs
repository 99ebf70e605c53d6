use log::{debug, trace};

use crate::decode::parser::Driver;
use crate::decode::Halt;
use crate::error::{Location, ParseError, ParseErrorKind};
use crate::value::Value;
use crate::{DecodeOptions, Error, Result};

/// Result of feeding a chunk to a [`StreamParser`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Complete(Value),
    /// The buffered input ends mid-document; parsing resumes from this location.
    NeedMoreInput(Location),
}

/// Chunk-at-a-time parser.
///
/// ```
/// use json5_stream::{DecodeOptions, Outcome, StreamParser};
///
/// let mut parser = StreamParser::new(DecodeOptions::default());
/// assert!(matches!(parser.feed("{name: 'ca", false).unwrap(), Outcome::NeedMoreInput(_)));
/// match parser.feed("son'}", true).unwrap() {
///     Outcome::Complete(value) => assert_eq!(value["name"], "cason"),
///     Outcome::NeedMoreInput(_) => unreachable!(),
/// }
/// ```
pub struct StreamParser {
    driver: Driver,
    buffer: String,
    /// Absolute offset of `buffer[0]`.
    base: usize,
    finished: bool,
}

impl StreamParser {
    pub fn new(options: DecodeOptions) -> Self {
        Self {
            driver: Driver::new(options),
            buffer: String::new(),
            base: 0,
            finished: false,
        }
    }

    /// Appends `chunk` and parses as far as the buffered input allows.
    ///
    /// A complete top-level value is only reported once `is_final` is set,
    /// since later chunks could still hold trailing characters.
    pub fn feed(&mut self, chunk: &str, is_final: bool) -> Result<Outcome> {
        if self.finished {
            return Err(Error::StreamClosed);
        }
        self.buffer.push_str(chunk);
        match self.driver.run(&self.buffer, self.base, is_final) {
            Ok(value) => {
                self.finished = true;
                debug!(
                    "document complete after {} bytes",
                    self.base + self.buffer.len()
                );
                Ok(Outcome::Complete(value))
            }
            Err(Halt::Suspend) if is_final => {
                self.finished = true;
                Err(ParseError::new(
                    ParseErrorKind::UnexpectedEndOfInput,
                    self.driver.location(),
                    "",
                )
                .into())
            }
            Err(Halt::Suspend) => {
                self.discard_consumed();
                let location = self.driver.location();
                trace!(
                    "suspended at {location}, {} bytes buffered",
                    self.buffer.len()
                );
                Ok(Outcome::NeedMoreInput(location))
            }
            Err(Halt::Fail(err)) => {
                self.finished = true;
                debug!("parse failed: {err}");
                Err(err.into())
            }
        }
    }

    /// Marks the input as complete.
    pub fn finish(&mut self) -> Result<Outcome> {
        self.feed("", true)
    }

    /// Where parsing will resume.
    pub fn location(&self) -> Location {
        self.driver.location()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Bytes fed but not yet consumed: the partial token parsing resumes from.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    fn discard_consumed(&mut self) {
        let consumed = self
            .driver
            .position()
            .offset
            .saturating_sub(self.base)
            .min(self.buffer.len());
        if consumed > 0 {
            self.buffer.drain(..consumed);
            self.base += consumed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(outcome: Outcome) -> Value {
        match outcome {
            Outcome::Complete(value) => value,
            Outcome::NeedMoreInput(location) => panic!("still waiting at {location}"),
        }
    }

    #[rstest::rstest]
    fn test_feed_in_pieces() {
        let mut parser = StreamParser::new(DecodeOptions::default());
        for chunk in ["[1", "0, 'a", "b', /* c", "omment */ tr", "ue]"] {
            assert!(matches!(
                parser.feed(chunk, false).unwrap(),
                Outcome::NeedMoreInput(_)
            ));
        }
        let value = complete(parser.finish().unwrap());
        assert_eq!(
            value,
            Value::Array(vec![Value::from(10), Value::from("ab"), Value::Bool(true)])
        );
    }

    #[rstest::rstest]
    fn test_consumed_input_is_discarded() {
        let mut parser = StreamParser::new(DecodeOptions::default());
        parser.feed("[\"first\", \"sec", false).unwrap();
        assert_eq!(parser.buffer, "\"sec");
        assert_eq!(parser.buffered_len(), 4);
        assert_eq!(parser.base, 10);
        assert_eq!(parser.location(), Location::new(10, 1, 11));
    }

    #[rstest::rstest]
    fn test_crlf_split_counts_one_line() {
        let mut parser = StreamParser::new(DecodeOptions::default());
        parser.feed("[1,\r", false).unwrap();
        parser.feed("\n2", false).unwrap();
        let err = parser.feed(" x]", true).unwrap_err();
        let location = err.location().unwrap();
        assert_eq!((location.line, location.column), (2, 3));
    }

    #[rstest::rstest]
    fn test_errors_carry_absolute_offsets() {
        let mut parser = StreamParser::new(DecodeOptions::default());
        parser.feed("[1, 2, ", false).unwrap();
        let err = parser.feed("]]", true).unwrap_err();
        assert_eq!(err.location().map(|location| location.offset), Some(8));
    }

    #[rstest::rstest]
    fn test_final_chunk_mid_token_is_an_error() {
        let mut parser = StreamParser::new(DecodeOptions::default());
        parser.feed("{\"key", false).unwrap();
        let err = parser.finish().unwrap_err();
        assert!(matches!(
            err.as_parse_error().map(|err| &err.kind),
            Some(ParseErrorKind::UnterminatedString)
        ));
    }

    #[rstest::rstest]
    fn test_parser_is_spent_after_completion() {
        let mut parser = StreamParser::new(DecodeOptions::default());
        complete(parser.feed("null", true).unwrap());
        assert!(parser.is_finished());
        assert_eq!(parser.feed("1", true), Err(Error::StreamClosed));
    }

    #[rstest::rstest]
    fn test_parser_is_spent_after_error() {
        let mut parser = StreamParser::new(DecodeOptions::default());
        assert!(parser.feed("[}", false).is_err());
        assert_eq!(parser.finish(), Err(Error::StreamClosed));
    }
}
