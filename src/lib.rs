//! JSON5 parsing that can stop at any chunk boundary and resume, exact decimal
//! numbers, a JSON/JSON5 writer and a serde bridge.
//!
//! ```
//! let value = json5_stream::parse("{unquoted: 'single', hex: 0x10, trailing: [1,],}")?;
//! assert_eq!(value["hex"].as_i64(), Some(16));
//! assert_eq!(json5_stream::stringify(&value, false, 2usize), "{unquoted:\"single\",hex:16,trailing:[1]}");
//! # Ok::<(), json5_stream::Error>(())
//! ```

pub mod binary;
pub mod constants;
pub mod decode;
pub mod encode;
pub mod error;
pub mod interop;
pub mod num;
pub mod options;
mod serde;
pub mod text;
pub mod value;

use std::io::{Read, Write};

use ::serde::de::DeserializeOwned;
use ::serde::Serialize;

pub use crate::binary::{from_bytes, from_compressed_bytes, to_bytes, to_compressed_bytes};
pub use crate::decode::stream::{Outcome, StreamParser};
pub use crate::encode::{stringify, value_to_string};
pub use crate::error::{Error, Location, NonFinite, NumberError, ParseError, ParseErrorKind};
pub use crate::num::decimal::Decimal;
pub use crate::num::number::Number;
pub use crate::options::{DecodeOptions, Dialect, EncodeOptions, Indent, Quote};
pub use crate::serde::de::from_value;
pub use crate::serde::ser::to_value;
pub use crate::value::{Map, Value};

pub type Result<T> = std::result::Result<T, Error>;

pub fn parse(input: &str) -> Result<Value> {
    parse_with_options(input, &DecodeOptions::default())
}

pub fn parse_with_options(input: &str, options: &DecodeOptions) -> Result<Value> {
    decode::parse_str(input, options)
}

/// Parses a document whose top-level value must be an object.
pub fn parse_object(input: &str) -> Result<Map> {
    match parse(input)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::UnexpectedType {
            expected: "object",
            found: other.type_name(),
        }),
    }
}

/// Parses a document whose top-level value must be an array.
pub fn parse_array(input: &str) -> Result<Vec<Value>> {
    match parse(input)? {
        Value::Array(items) => Ok(items),
        other => Err(Error::UnexpectedType {
            expected: "array",
            found: other.type_name(),
        }),
    }
}

pub fn parse_reader<R: Read>(reader: R) -> Result<Value> {
    parse_reader_with_options(reader, &DecodeOptions::default())
}

pub fn parse_reader_with_options<R: Read>(reader: R, options: &DecodeOptions) -> Result<Value> {
    decode::parse_reader(reader, options)
}

pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    to_string_with_options(value, &EncodeOptions::default())
}

pub fn to_string_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    to_string_with_options(value, &EncodeOptions::default().with_pretty(true))
}

pub fn to_string_with_options<T: Serialize + ?Sized>(
    value: &T,
    options: &EncodeOptions,
) -> Result<String> {
    encode::to_string(value, options)
}

pub fn to_writer<T: Serialize + ?Sized, W: Write>(writer: W, value: &T) -> Result<()> {
    to_writer_with_options(writer, value, &EncodeOptions::default())
}

pub fn to_writer_with_options<T: Serialize + ?Sized, W: Write>(
    writer: W,
    value: &T,
    options: &EncodeOptions,
) -> Result<()> {
    encode::to_writer(writer, value, options)
}

pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    from_str_with_options(input, &DecodeOptions::default())
}

pub fn from_str_with_options<T: DeserializeOwned>(
    input: &str,
    options: &DecodeOptions,
) -> Result<T> {
    decode::from_str(input, options)
}

pub fn from_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T> {
    from_reader_with_options(reader, &DecodeOptions::default())
}

pub fn from_reader_with_options<T: DeserializeOwned, R: Read>(
    reader: R,
    options: &DecodeOptions,
) -> Result<T> {
    decode::from_reader(reader, options)
}
