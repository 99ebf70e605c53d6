use json5_stream::{parse, Error, ParseErrorKind, Value};
use rstest::rstest;

fn string(input: &str) -> String {
    match parse(input) {
        Ok(Value::String(s)) => s,
        other => panic!("expected a string from {input:?}, got {other:?}"),
    }
}

fn kind(input: &str) -> ParseErrorKind {
    match parse(input) {
        Err(Error::Parse(err)) => err.kind,
        other => panic!("expected a parse error from {input:?}, got {other:?}"),
    }
}

#[rstest]
#[case(r#""plain""#, "plain")]
#[case(r#"'it"s'"#, "it\"s")]
#[case(r#""it's""#, "it's")]
#[case(r#"'\'\"\\\/'"#, "'\"\\/")]
#[case(r#""\b\f\n\r\t\v""#, "\u{8}\u{c}\n\r\t\u{b}")]
#[case(r#""\0""#, "\0")]
#[case(r#""\x41\x7e""#, "A~")]
#[case(r#""é中""#, "é中")]
#[case(r#""😀""#, "😀")]
#[case(r#""\u{1F600}\u{41}""#, "😀A")]
#[case("\"a\\\nb\"", "ab")]
#[case("\"a\\\r\nb\"", "ab")]
#[case("\"a\\\u{2028}b\"", "ab")]
#[case("'tab\there'", "tab\there")]
fn test_escapes(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(string(input), expected);
}

#[rstest]
#[case(r#""\uD83D""#)]
#[case(r#""\uDE00""#)]
#[case(r#""\uD83Dx""#)]
#[case(r#""\u12""#)]
#[case(r#""\xZZ""#)]
#[case(r#""\u{110000}""#)]
#[case(r#""\u{}""#)]
#[case(r#""\01""#)]
#[case(r#""\q""#)]
fn test_invalid_escapes(#[case] input: &str) {
    assert!(matches!(kind(input), ParseErrorKind::InvalidEscape(_)), "{input}");
}

#[rstest]
#[case("\"open")]
#[case("'line\nbreak'")]
#[case("'line\u{2028}separator'")]
#[case("\"escape at end\\")]
fn test_unterminated(#[case] input: &str) {
    assert_eq!(kind(input), ParseErrorKind::UnterminatedString);
}

#[rstest]
fn test_unterminated_string_points_at_the_quote() {
    let err = parse("[1, 'abc").unwrap_err();
    let location = err.location().unwrap();
    assert_eq!((location.line, location.column), (1, 5));
}

#[rstest]
fn test_columns_count_characters() {
    let err = parse("['ü€😀', x]").unwrap_err();
    let location = err.location().unwrap();
    assert_eq!(location.column, 9);
    assert_eq!(location.offset, "['ü€😀', ".len());
}
