mod writer;

use std::io::Write;

use serde::Serialize;

use crate::options::{EncodeOptions, Indent};
use crate::value::Value;
use crate::{Error, Result};

/// Renders a value tree as text.
///
/// ```
/// use json5_stream::{encode, parse, EncodeOptions};
///
/// let value = parse("{name: 'cason', tags: ['a',],}")?;
/// let text = encode::value_to_string(&value, &EncodeOptions::json5());
/// assert_eq!(text, r#"{name:"cason",tags:["a"]}"#);
/// # Ok::<(), json5_stream::Error>(())
/// ```
pub fn value_to_string(value: &Value, options: &EncodeOptions) -> String {
    let mut writer = writer::Writer::new(options.clone());
    writer.write_value(value, 0);
    writer.finish()
}

/// JSON5 text for `value`, pretty-printed with `indent` when `pretty` is set.
pub fn stringify(value: &Value, pretty: bool, indent: impl Into<Indent>) -> String {
    let options = EncodeOptions::json5()
        .with_pretty(pretty)
        .with_indent(indent);
    value_to_string(value, &options)
}

/// Encode any serializable value.
///
/// ```
/// use serde::Serialize;
/// use json5_stream::{encode, EncodeOptions};
///
/// #[derive(Serialize)]
/// struct User {
///     name: String,
///     age: u32,
/// }
///
/// let user = User {
///     name: "Alice".to_string(),
///     age: 30,
/// };
/// let text = encode::to_string(&user, &EncodeOptions::default())?;
/// assert_eq!(text, r#"{"name":"Alice","age":30}"#);
/// # Ok::<(), json5_stream::Error>(())
/// ```
pub fn to_string<T: Serialize + ?Sized>(value: &T, options: &EncodeOptions) -> Result<String> {
    let value = crate::serde::ser::to_value(value)?;
    Ok(value_to_string(&value, options))
}

pub fn to_writer<T: Serialize + ?Sized, W: Write>(
    mut writer: W,
    value: &T,
    options: &EncodeOptions,
) -> Result<()> {
    let text = to_string(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|err| Error::Io(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_stringify_pretty_with_spaces() {
        let value = crate::parse("{list: [1, 2], 'key-x': null}").unwrap();
        assert_eq!(
            stringify(&value, true, 4usize),
            "{\n    list: [\n        1,\n        2\n    ],\n    \"key-x\": null\n}"
        );
        assert_eq!(stringify(&value, false, 4usize), "{list:[1,2],\"key-x\":null}");
    }

    #[rstest::rstest]
    fn test_stringify_custom_indent_text() {
        let value = crate::parse("[true]").unwrap();
        assert_eq!(stringify(&value, true, ". "), "[\n. true\n]");
    }

    #[rstest::rstest]
    fn test_to_writer() {
        let mut out = Vec::new();
        to_writer(&mut out, &vec![1, 2], &EncodeOptions::default()).unwrap();
        assert_eq!(out, b"[1,2]");
    }
}
