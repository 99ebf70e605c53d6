use crate::constants::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_EXPONENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Plain RFC 8259 JSON.
    Json,
    /// JSON plus the JSON5 relaxations.
    #[default]
    Json5,
}

impl Dialect {
    pub fn is_json5(self) -> bool {
        matches!(self, Dialect::Json5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quote {
    #[default]
    Double,
    Single,
}

impl Quote {
    pub fn as_char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indent {
    Spaces(usize),
    Tab,
    Text(String),
}

impl Indent {
    pub fn spaces(count: usize) -> Self {
        Indent::Spaces(count)
    }

    pub fn unit(&self) -> String {
        match self {
            Indent::Spaces(count) => " ".repeat(*count),
            Indent::Tab => "\t".to_string(),
            Indent::Text(text) => text.clone(),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Spaces(2)
    }
}

impl From<&str> for Indent {
    fn from(text: &str) -> Self {
        Indent::Text(text.to_string())
    }
}

impl From<usize> for Indent {
    fn from(count: usize) -> Self {
        Indent::Spaces(count)
    }
}

#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub pretty: bool,
    pub indent: Indent,
    pub quote: Quote,
    /// Output dialect. Only JSON5 output may use bare keys and single quotes.
    pub dialect: Dialect,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: Indent::default(),
            quote: Quote::default(),
            dialect: Dialect::Json,
        }
    }
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json5() -> Self {
        Self::default().with_dialect(Dialect::Json5)
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_indent(mut self, indent: impl Into<Indent>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Quote character actually written; strict JSON output is always double-quoted.
    pub fn effective_quote(&self) -> char {
        match self.dialect {
            Dialect::Json => '"',
            Dialect::Json5 => self.quote.as_char(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecodeOptions {
    pub dialect: Dialect,
    pub max_depth: usize,
    /// Largest `|e|` accepted in a numeric literal. Capped at [`crate::constants::MAX_EXPONENT`].
    pub max_exponent: u32,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self::default().with_dialect(Dialect::Json)
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_exponent(mut self, max_exponent: u32) -> Self {
        self.max_exponent = max_exponent;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::Json5,
            max_depth: DEFAULT_MAX_DEPTH,
            max_exponent: DEFAULT_MAX_EXPONENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_encode_defaults_are_compact_json() {
        let options = EncodeOptions::new();
        assert!(!options.pretty);
        assert_eq!(options.dialect, Dialect::Json);
        assert_eq!(options.indent.unit(), "  ");
        assert_eq!(options.effective_quote(), '"');
    }

    #[rstest::rstest]
    fn test_strict_output_ignores_single_quote() {
        let options = EncodeOptions::new().with_quote(Quote::Single);
        assert_eq!(options.effective_quote(), '"');
        let options = options.with_dialect(Dialect::Json5);
        assert_eq!(options.effective_quote(), '\'');
    }

    #[rstest::rstest]
    #[case(Indent::Spaces(4), "    ")]
    #[case(Indent::Tab, "\t")]
    #[case(Indent::from("--"), "--")]
    fn test_indent_unit(#[case] indent: Indent, #[case] expected: &str) {
        assert_eq!(indent.unit(), expected);
    }

    #[rstest::rstest]
    fn test_decode_defaults() {
        let options = DecodeOptions::default();
        assert_eq!(options.dialect, Dialect::Json5);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(options.max_exponent, DEFAULT_MAX_EXPONENT);
        assert_eq!(DecodeOptions::strict().dialect, Dialect::Json);
    }
}
