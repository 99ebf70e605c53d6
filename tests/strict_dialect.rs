use json5_stream::{parse, parse_with_options, DecodeOptions, Dialect, Error, ParseErrorKind};
use rstest::rstest;

fn strict(input: &str) -> json5_stream::Result<json5_stream::Value> {
    parse_with_options(input, &DecodeOptions::strict())
}

#[rstest]
#[case::line_comment("[1] // c")]
#[case::block_comment("/* c */ [1]")]
#[case::vertical_tab("[\u{b}1]")]
#[case::no_break_space("[\u{a0}1]")]
#[case::byte_order_mark("\u{feff}[1]")]
#[case::line_separator("[\u{2028}1]")]
#[case::single_quotes("['a']")]
#[case::escaped_single_quote(r#"["\'"]"#)]
#[case::vertical_tab_escape(r#"["\v"]"#)]
#[case::null_escape(r#"["\0"]"#)]
#[case::hex_escape(r#"["\x41"]"#)]
#[case::braced_unicode_escape(r#"["\u{41}"]"#)]
#[case::line_continuation("[\"a\\\nb\"]")]
#[case::raw_control_character("[\"a\u{1}b\"]")]
#[case::unquoted_key("{a: 1}")]
#[case::numeric_key("{1: 1}")]
#[case::array_trailing_comma("[1,]")]
#[case::object_trailing_comma("{\"a\": 1,}")]
#[case::plus_sign("+1")]
#[case::leading_dot(".5")]
#[case::trailing_dot("5.")]
#[case::leading_zero("01")]
#[case::hex("0x10")]
#[case::infinity("Infinity")]
#[case::negative_infinity("-Infinity")]
#[case::nan("NaN")]
fn test_strict_rejects_relaxations(#[case] input: &str) {
    assert!(strict(input).is_err(), "strict accepted {input:?}");
    assert!(parse(input).is_ok(), "json5 rejected {input:?}");
}

#[rstest]
#[case("{\"a\": [1, -2.5e+3, true, false, null, \"\\u00e9\\/\"]}")]
#[case(" \t\r\n[]\r\n")]
#[case("0")]
#[case("-0.0")]
#[case("\"\\ud83d\\ude00\"")]
fn test_strict_accepts_json(#[case] input: &str) {
    assert_eq!(strict(input).unwrap(), parse(input).unwrap());
}

#[rstest]
fn test_strict_error_positions() {
    let err = strict("{\"a\": 01}").unwrap_err();
    let parse_error = err.as_parse_error().unwrap();
    assert_eq!(parse_error.kind, ParseErrorKind::InvalidNumber("leading zero"));
    assert_eq!(parse_error.column(), 7);

    let err = strict("['x']").unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ref err) if err.kind == ParseErrorKind::UnexpectedCharacter('\'')
    ));
}

#[rstest]
fn test_dialect_builder() {
    let options = DecodeOptions::default().with_dialect(Dialect::Json);
    assert!(parse_with_options("[1,]", &options).is_err());
    assert_eq!(DecodeOptions::strict().dialect, Dialect::Json);
    assert_eq!(DecodeOptions::default().dialect, Dialect::Json5);
}
