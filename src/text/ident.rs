use unicode_xid::UnicodeXID;

use crate::constants::is_keyword;

const ZWNJ: char = '\u{200C}';
const ZWJ: char = '\u{200D}';

#[inline]
pub fn is_id_start(ch: char) -> bool {
    ch == '$' || ch == '_' || ch.is_xid_start()
}

#[inline]
pub fn is_id_part(ch: char) -> bool {
    ch == '$' || ch == '_' || ch == ZWNJ || ch == ZWJ || ch.is_xid_continue()
}

pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_id_start(first) => chars.all(is_id_part),
        _ => false,
    }
}

/// Whether a JSON5 writer may emit `key` without quotes.
///
/// Literal words stay quoted so `{null: 1}` is never produced.
pub fn is_bare_key(key: &str) -> bool {
    is_identifier(key) && !is_keyword(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case("name", true)]
    #[case("$scope", true)]
    #[case("_private1", true)]
    #[case("ünïcödé", true)]
    #[case("a\u{200D}b", true)]
    #[case("1st", false)]
    #[case("with-dash", false)]
    #[case("with space", false)]
    #[case("", false)]
    fn test_is_identifier(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_identifier(input), expected);
    }

    #[rstest::rstest]
    fn test_keywords_are_not_bare_keys() {
        assert!(is_identifier("null"));
        assert!(!is_bare_key("null"));
        assert!(!is_bare_key("NaN"));
        assert!(is_bare_key("nullable"));
    }

    #[rstest::rstest]
    fn test_joiners_only_continue() {
        assert!(!is_id_start(ZWJ));
        assert!(is_id_part(ZWNJ));
    }
}
