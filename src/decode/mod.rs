pub mod cursor;
pub(crate) mod parser;
pub mod scanner;
pub mod stream;

use std::io::Read;

use serde::de::DeserializeOwned;

use crate::constants::READ_CHUNK_SIZE;
use crate::decode::parser::Driver;
use crate::decode::stream::{Outcome, StreamParser};
use crate::error::{ParseError, ParseErrorKind};
use crate::value::Value;
use crate::{DecodeOptions, Error, Result};

/// Why a scanner or driver step stopped without producing a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// The chunk ended mid-token and is not final.
    Suspend,
    Fail(ParseError),
}

impl From<ParseError> for Halt {
    fn from(err: ParseError) -> Self {
        Halt::Fail(err)
    }
}

pub type Step<T> = std::result::Result<T, Halt>;

pub fn parse_str(input: &str, options: &DecodeOptions) -> Result<Value> {
    let mut driver = Driver::new(options.clone());
    match driver.run(input, 0, true) {
        Ok(value) => Ok(value),
        Err(Halt::Fail(err)) => Err(err.into()),
        Err(Halt::Suspend) => Err(ParseError::new(
            ParseErrorKind::UnexpectedEndOfInput,
            driver.location(),
            "",
        )
        .into()),
    }
}

pub fn from_str<T: DeserializeOwned>(input: &str, options: &DecodeOptions) -> Result<T> {
    let value = parse_str(input, options)?;
    crate::serde::de::from_value(&value)
}

/// Parses a document from `reader` in fixed-size blocks through a [`StreamParser`].
///
/// While the parser is stuck inside one token, decoded text is held back until
/// it at least matches the parser's unconsumed tail, so a long token is
/// rescanned a logarithmic number of times rather than once per block.
pub fn parse_reader<R: Read>(mut reader: R, options: &DecodeOptions) -> Result<Value> {
    let mut parser = StreamParser::new(options.clone());
    let mut block = vec![0u8; READ_CHUNK_SIZE];
    let mut pending: Vec<u8> = Vec::new();
    let mut held = String::new();
    let mut consumed = 0usize;
    loop {
        let read = match reader.read(&mut block) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        pending.extend_from_slice(&block[..read]);
        let valid = match std::str::from_utf8(&pending) {
            Ok(text) => text.len(),
            Err(err) if err.error_len().is_none() => err.valid_up_to(),
            Err(err) => {
                return Err(Error::Io(format!(
                    "invalid UTF-8 at byte {}",
                    consumed + err.valid_up_to()
                )));
            }
        };
        let text = std::str::from_utf8(&pending[..valid])
            .map_err(|err| Error::Io(format!("invalid UTF-8: {err}")))?;
        held.push_str(text);
        pending.drain(..valid);
        consumed += valid;
        if held.len() < parser.buffered_len() {
            continue;
        }
        if let Outcome::Complete(value) = parser.feed(&held, false)? {
            return Ok(value);
        }
        held.clear();
    }
    if !pending.is_empty() {
        return Err(Error::Io(format!(
            "input ends inside a UTF-8 sequence at byte {consumed}"
        )));
    }
    match parser.feed(&held, true)? {
        Outcome::Complete(value) => Ok(value),
        Outcome::NeedMoreInput(location) => Err(ParseError::new(
            ParseErrorKind::UnexpectedEndOfInput,
            location,
            "",
        )
        .into()),
    }
}

pub fn from_reader<T: DeserializeOwned, R: Read>(reader: R, options: &DecodeOptions) -> Result<T> {
    let value = parse_reader(reader, options)?;
    crate::serde::de::from_value(&value)
}
