use crate::num::number::Number;
use crate::options::EncodeOptions;
use crate::text::escape::escape_into;
use crate::text::ident::is_bare_key;
use crate::value::{Map, Value};

pub(crate) struct Writer {
    buffer: Vec<u8>,
    options: EncodeOptions,
    quote: char,
    indent_unit: String,
    indent_cache: Vec<String>,
}

impl Writer {
    pub fn new(options: EncodeOptions) -> Self {
        let indent_unit = options.indent.unit();
        Self {
            buffer: Vec::new(),
            quote: options.effective_quote(),
            options,
            indent_unit,
            indent_cache: vec![String::new()],
        }
    }

    pub fn finish(self) -> String {
        String::from_utf8(self.buffer)
            .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
    }

    pub fn write_str(&mut self, s: &str) {
        self.buffer.extend_from_slice(s.as_bytes());
    }

    pub fn write_char(&mut self, ch: char) {
        if ch.is_ascii() {
            self.buffer.push(ch as u8);
            return;
        }
        let mut buf = [0u8; 4];
        let encoded = ch.encode_utf8(&mut buf);
        self.buffer.extend_from_slice(encoded.as_bytes());
    }

    pub fn write_newline(&mut self) {
        self.buffer.push(b'\n');
    }

    pub fn write_indent(&mut self, depth: usize) {
        if depth == 0 || self.indent_unit.is_empty() {
            return;
        }
        if depth >= self.indent_cache.len() {
            self.extend_indent_cache(depth);
        }
        self.buffer
            .extend_from_slice(self.indent_cache[depth].as_bytes());
    }

    /// Bare identifier keys only in JSON5 output; everything else is quoted.
    pub fn write_key(&mut self, key: &str) {
        if self.options.dialect.is_json5() && is_bare_key(key) {
            self.write_str(key);
        } else {
            self.write_quoted_string(key);
        }
    }

    pub fn write_quoted_string(&mut self, s: &str) {
        self.write_char(self.quote);
        escape_into(&mut self.buffer, s, self.quote, self.options.dialect);
        self.write_char(self.quote);
    }

    pub fn write_number(&mut self, number: &Number) {
        match number {
            Number::Finite(decimal) => self.write_str(&decimal.to_plain_string()),
            Number::NaN => self.write_str("NaN"),
            Number::PositiveInfinity => self.write_str("Infinity"),
            Number::NegativeInfinity => self.write_str("-Infinity"),
        }
    }

    pub fn write_value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Null => self.write_str("null"),
            Value::Bool(true) => self.write_str("true"),
            Value::Bool(false) => self.write_str("false"),
            Value::Number(number) => self.write_number(number),
            Value::String(s) => self.write_quoted_string(s),
            Value::Array(items) => self.write_array(items, depth),
            Value::Object(map) => self.write_object(map, depth),
        }
    }

    fn write_array(&mut self, items: &[Value], depth: usize) {
        if items.is_empty() {
            self.write_str("[]");
            return;
        }
        self.write_char('[');
        for (i, item) in items.iter().enumerate() {
            self.write_separator(i, depth + 1);
            self.write_value(item, depth + 1);
        }
        self.write_closing(']', depth);
    }

    fn write_object(&mut self, map: &Map, depth: usize) {
        if map.is_empty() {
            self.write_str("{}");
            return;
        }
        self.write_char('{');
        for (i, (key, value)) in map.iter().enumerate() {
            self.write_separator(i, depth + 1);
            self.write_key(key);
            self.write_char(':');
            if self.options.pretty {
                self.write_char(' ');
            }
            self.write_value(value, depth + 1);
        }
        self.write_closing('}', depth);
    }

    fn write_separator(&mut self, index: usize, depth: usize) {
        if index > 0 {
            self.write_char(',');
        }
        if self.options.pretty {
            self.write_newline();
            self.write_indent(depth);
        }
    }

    fn write_closing(&mut self, bracket: char, depth: usize) {
        if self.options.pretty {
            self.write_newline();
            self.write_indent(depth);
        }
        self.write_char(bracket);
    }

    fn extend_indent_cache(&mut self, depth: usize) {
        while self.indent_cache.len() <= depth {
            let next = match self.indent_cache.last() {
                Some(prev) => {
                    let mut s = String::with_capacity(prev.len() + self.indent_unit.len());
                    s.push_str(prev);
                    s.push_str(&self.indent_unit);
                    s
                }
                None => String::new(),
            };
            self.indent_cache.push(next);
        }
    }
}
