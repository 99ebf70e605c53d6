use smallvec::SmallVec;

use crate::decode::cursor::{Cursor, Position};
use crate::decode::scanner::{
    scan_identifier, scan_number_with_limit, scan_string, skip_whitespace_and_comments,
};
use crate::decode::{Halt, Step};
use crate::error::{Location, ParseErrorKind};
use crate::num::number::Number;
use crate::options::DecodeOptions;
use crate::text::ident::is_id_start;
use crate::value::{Map, Value};

enum Container {
    Array(Vec<Value>),
    Object { map: Map, key: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ArrayOpen,
    ArrayAfterValue,
    ArrayAfterComma,
    ObjectOpen,
    ObjectAfterKey,
    ObjectAfterColon,
    ObjectAfterValue,
    ObjectAfterComma,
}

struct Frame {
    container: Container,
    state: State,
}

/// Resumable grammar driver.
///
/// Open containers live on an explicit stack, so a suspended parse keeps its
/// partial tree and continues from `position` once the buffer has grown.
pub(crate) struct Driver {
    options: DecodeOptions,
    position: Position,
    stack: SmallVec<[Frame; 16]>,
    root: Option<Value>,
}

impl Driver {
    pub(crate) fn new(options: DecodeOptions) -> Self {
        Self {
            options,
            position: Position::start(),
            stack: SmallVec::new(),
            root: None,
        }
    }

    pub(crate) fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn location(&self) -> Location {
        self.position.location()
    }

    /// Runs over `input` (which starts at absolute offset `base`) until the
    /// document completes, fails, or needs more input.
    pub(crate) fn run(&mut self, input: &str, base: usize, is_final: bool) -> Step<Value> {
        let dialect = self.options.dialect;
        loop {
            let mut cursor = Cursor::resume(input, base, self.position, is_final);
            let skipped = skip_whitespace_and_comments(&mut cursor, dialect);
            self.position = cursor.position();
            skipped?;

            if self.root.is_some() {
                if !cursor.at_end() {
                    return Err(cursor.error(ParseErrorKind::TrailingCharacters));
                }
                if !is_final {
                    return Err(Halt::Suspend);
                }
                return self
                    .root
                    .take()
                    .ok_or_else(|| cursor.error(ParseErrorKind::UnexpectedEndOfInput));
            }

            let token_start = cursor;
            match self.step(&mut cursor) {
                Ok(()) => self.position = cursor.position(),
                Err(Halt::Suspend) => {
                    self.position = token_start.position();
                    return Err(Halt::Suspend);
                }
                Err(fail) => return Err(fail),
            }
        }
    }

    fn step(&mut self, cursor: &mut Cursor<'_>) -> Step<()> {
        match self.stack.last().map(|frame| frame.state) {
            None => self.parse_value(cursor),
            Some(
                state @ (State::ArrayOpen | State::ArrayAfterValue | State::ArrayAfterComma),
            ) => self.parse_array(cursor, state),
            Some(state) => self.parse_object(cursor, state),
        }
    }

    fn parse_value(&mut self, cursor: &mut Cursor<'_>) -> Step<()> {
        let dialect = self.options.dialect;
        let Some(ch) = cursor.peek() else {
            return Err(cursor.need_more());
        };
        match ch {
            '{' => {
                self.push(cursor, Container::Object { map: Map::new(), key: None }, State::ObjectOpen)?;
                cursor.advance();
                Ok(())
            }
            '[' => {
                self.push(cursor, Container::Array(Vec::new()), State::ArrayOpen)?;
                cursor.advance();
                Ok(())
            }
            '"' | '\'' => {
                let text = scan_string(cursor, dialect)?;
                self.emit(Value::String(text.into_owned()));
                Ok(())
            }
            '-' | '+' | '.' | '0'..='9' => {
                let number =
                    scan_number_with_limit(cursor, dialect, self.options.max_exponent)?;
                self.emit(Value::Number(number));
                Ok(())
            }
            _ if is_id_start(ch) => {
                let word_start = *cursor;
                let value = match scan_identifier(cursor)? {
                    "null" => Value::Null,
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    "Infinity" if dialect.is_json5() => Value::Number(Number::PositiveInfinity),
                    "NaN" if dialect.is_json5() => Value::Number(Number::NaN),
                    other => {
                        return Err(word_start
                            .error(ParseErrorKind::UnexpectedIdentifier(other.to_string())));
                    }
                };
                self.emit(value);
                Ok(())
            }
            _ => Err(cursor.error(ParseErrorKind::UnexpectedCharacter(ch))),
        }
    }

    fn parse_array(&mut self, cursor: &mut Cursor<'_>, state: State) -> Step<()> {
        let Some(ch) = cursor.peek() else {
            return Err(cursor.need_more());
        };
        match (state, ch) {
            (State::ArrayOpen, ']') => {
                cursor.advance();
                self.close();
                Ok(())
            }
            (State::ArrayAfterComma, ']') if self.options.dialect.is_json5() => {
                cursor.advance();
                self.close();
                Ok(())
            }
            (State::ArrayOpen | State::ArrayAfterComma, _) => self.parse_value(cursor),
            (_, ',') => {
                cursor.advance();
                self.set_state(State::ArrayAfterComma);
                Ok(())
            }
            (_, ']') => {
                cursor.advance();
                self.close();
                Ok(())
            }
            _ => Err(cursor.error(ParseErrorKind::UnexpectedCharacter(ch))),
        }
    }

    fn parse_object(&mut self, cursor: &mut Cursor<'_>, state: State) -> Step<()> {
        let Some(ch) = cursor.peek() else {
            return Err(cursor.need_more());
        };
        match (state, ch) {
            (State::ObjectOpen, '}') => {
                cursor.advance();
                self.close();
                Ok(())
            }
            (State::ObjectAfterComma, '}') if self.options.dialect.is_json5() => {
                cursor.advance();
                self.close();
                Ok(())
            }
            (State::ObjectOpen | State::ObjectAfterComma, _) => {
                let key = self.parse_key(cursor, ch)?;
                if let Some(Frame {
                    container: Container::Object { key: pending, .. },
                    state,
                }) = self.stack.last_mut()
                {
                    *pending = Some(key);
                    *state = State::ObjectAfterKey;
                }
                Ok(())
            }
            (State::ObjectAfterKey, ':') => {
                cursor.advance();
                self.set_state(State::ObjectAfterColon);
                Ok(())
            }
            (State::ObjectAfterColon, _) => self.parse_value(cursor),
            (State::ObjectAfterValue, ',') => {
                cursor.advance();
                self.set_state(State::ObjectAfterComma);
                Ok(())
            }
            (State::ObjectAfterValue, '}') => {
                cursor.advance();
                self.close();
                Ok(())
            }
            _ => Err(cursor.error(ParseErrorKind::UnexpectedCharacter(ch))),
        }
    }

    /// Quoted string, bare identifier, or a numeric literal used by its text.
    fn parse_key(&self, cursor: &mut Cursor<'_>, ch: char) -> Step<String> {
        let dialect = self.options.dialect;
        match ch {
            '"' | '\'' => Ok(scan_string(cursor, dialect)?.into_owned()),
            _ if dialect.is_json5() && is_id_start(ch) => Ok(scan_identifier(cursor)?.to_string()),
            '-' | '+' | '.' | '0'..='9' if dialect.is_json5() => {
                let number = scan_number_with_limit(cursor, dialect, self.options.max_exponent)?;
                Ok(number.to_string())
            }
            _ => Err(cursor.error(ParseErrorKind::UnexpectedCharacter(ch))),
        }
    }

    fn push(&mut self, cursor: &Cursor<'_>, container: Container, state: State) -> Step<()> {
        let max_depth = self.options.max_depth;
        if self.stack.len() >= max_depth {
            return Err(cursor.error(ParseErrorKind::DepthLimitExceeded(max_depth)));
        }
        self.stack.push(Frame { container, state });
        Ok(())
    }

    fn set_state(&mut self, state: State) {
        if let Some(frame) = self.stack.last_mut() {
            frame.state = state;
        }
    }

    fn close(&mut self) {
        if let Some(frame) = self.stack.pop() {
            let value = match frame.container {
                Container::Array(items) => Value::Array(items),
                Container::Object { map, .. } => Value::Object(map),
            };
            self.emit(value);
        }
    }

    /// Hands a finished value to the enclosing container, or makes it the root.
    fn emit(&mut self, value: Value) {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(frame) => {
                match &mut frame.container {
                    Container::Array(items) => {
                        items.push(value);
                        frame.state = State::ArrayAfterValue;
                    }
                    Container::Object { map, key } => {
                        if let Some(key) = key.take() {
                            map.insert(key, value);
                        }
                        frame.state = State::ObjectAfterValue;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Dialect;

    fn run(input: &str) -> Step<Value> {
        Driver::new(DecodeOptions::default()).run(input, 0, true)
    }

    fn fail_at(input: &str, options: DecodeOptions) -> (ParseErrorKind, usize, usize) {
        match Driver::new(options).run(input, 0, true) {
            Err(Halt::Fail(err)) => (err.kind.clone(), err.line(), err.column()),
            other => panic!("expected failure for {input:?}, got {other:?}"),
        }
    }

    #[rstest::rstest]
    fn test_nested_document() {
        let value = run("{a: [1, {b: null}], 'c': true,}").unwrap();
        assert_eq!(value["a"][0], Value::from(1));
        assert_eq!(value["a"][1]["b"], Value::Null);
        assert_eq!(value["c"], Value::Bool(true));
    }

    #[rstest::rstest]
    fn test_duplicate_keys_keep_first_position() {
        let value = run("{a: 1, b: 2, a: 3}").unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map["a"], Value::from(3));
    }

    #[rstest::rstest]
    fn test_numeric_keys_use_their_text() {
        let value = run("{1: 'a', 0x10: 'b', 2.50: 'c'}").unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["1", "16", "2.5"]);
    }

    #[rstest::rstest]
    #[case("{\"a\":1,,}", ParseErrorKind::UnexpectedCharacter(','), 1, 8)]
    #[case("[1 2]", ParseErrorKind::UnexpectedCharacter('2'), 1, 4)]
    #[case("[1,\n  nul]", ParseErrorKind::UnexpectedIdentifier("nul".to_string()), 2, 3)]
    #[case("{a 1}", ParseErrorKind::UnexpectedCharacter('1'), 1, 4)]
    #[case("[1] 2", ParseErrorKind::TrailingCharacters, 1, 5)]
    #[case("[1,", ParseErrorKind::UnexpectedEndOfInput, 1, 4)]
    #[case("", ParseErrorKind::UnexpectedEndOfInput, 1, 1)]
    #[case("}", ParseErrorKind::UnexpectedCharacter('}'), 1, 1)]
    fn test_error_locations(
        #[case] input: &str,
        #[case] kind: ParseErrorKind,
        #[case] line: usize,
        #[case] column: usize,
    ) {
        assert_eq!(fail_at(input, DecodeOptions::default()), (kind, line, column));
    }

    #[rstest::rstest]
    fn test_depth_limit() {
        let options = DecodeOptions::default().with_max_depth(3);
        assert!(Driver::new(options.clone()).run("[[[1]]]", 0, true).is_ok());
        assert_eq!(
            fail_at("[[[[1]]]]", options),
            (ParseErrorKind::DepthLimitExceeded(3), 1, 4)
        );
    }

    #[rstest::rstest]
    #[case("[1,]")]
    #[case("{a: 1}")]
    #[case("{\"a\": 1,}")]
    #[case("[NaN]")]
    #[case("// c\n1")]
    fn test_strict_dialect_rejects(#[case] input: &str) {
        let options = DecodeOptions::default().with_dialect(Dialect::Json);
        assert!(Driver::new(options).run(input, 0, true).is_err());
    }

    #[rstest::rstest]
    fn test_suspends_and_resumes_at_token_start() {
        let mut driver = Driver::new(DecodeOptions::default());
        assert_eq!(driver.run("[12, \"ab", 0, false), Err(Halt::Suspend));
        assert_eq!(driver.position().offset, 5);
        let value = driver.run("[12, \"abc\"]", 0, true).unwrap();
        assert_eq!(value, Value::Array(vec![Value::from(12), Value::from("abc")]));
    }

    #[rstest::rstest]
    fn test_complete_root_waits_for_final_chunk() {
        let mut driver = Driver::new(DecodeOptions::default());
        assert_eq!(driver.run("{} ", 0, false), Err(Halt::Suspend));
        assert_eq!(driver.run("{} ", 0, true).unwrap(), Value::Object(Map::new()));
    }
}
