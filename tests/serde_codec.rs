use std::collections::{BTreeMap, HashMap};

use json5_stream::{
    from_reader, from_str, from_str_with_options, from_value, to_string, to_string_pretty,
    to_string_with_options, to_value, DecodeOptions, EncodeOptions, Error, Value,
};
use proptest::prelude::*;
use rstest::rstest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Server {
    name: String,
    port: u16,
    ratio: f64,
    tags: Vec<String>,
    backup: Option<Box<Server>>,
    mode: Mode,
    #[serde(default)]
    limits: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Mode {
    Active,
    Standby { since: u64 },
    Weighted(u8, u8),
    Named(String),
}

fn server() -> Server {
    Server {
        name: "primary".to_string(),
        port: 8080,
        ratio: 0.75,
        tags: vec!["a".to_string(), "b c".to_string()],
        backup: Some(Box::new(Server {
            name: "spare".to_string(),
            port: 8081,
            ratio: f64::INFINITY,
            tags: Vec::new(),
            backup: None,
            mode: Mode::Standby { since: 1_700_000_000 },
            limits: BTreeMap::new(),
        })),
        mode: Mode::Weighted(3, 7),
        limits: [("cpu".to_string(), -1), ("mem".to_string(), 512)].into(),
    }
}

#[rstest]
fn test_struct_round_trip() {
    let original = server();
    let text = to_string(&original).unwrap();
    assert_eq!(from_str::<Server>(&text).unwrap(), original);
    let text = to_string_pretty(&original).unwrap();
    assert_eq!(from_str::<Server>(&text).unwrap(), original);
}

#[rstest]
fn test_struct_output_text() {
    let mut original = server();
    original.backup = None;
    original.limits.clear();
    let text = to_string_with_options(&original, &EncodeOptions::json5()).unwrap();
    assert_eq!(
        text,
        "{name:\"primary\",port:8080,ratio:0.75,tags:[\"a\",\"b c\"],backup:null,mode:{weighted:[3,7]},limits:{}}"
    );
}

#[rstest]
fn test_deserialize_hand_written_json5() {
    let text = "{
        // trailing commas, hex and comments
        name: 'edge',
        port: 0x1BB,
        ratio: .5,
        tags: [],
        backup: null,
        mode: 'active',
    }";
    let parsed: Server = from_str(text).unwrap();
    assert_eq!(parsed.port, 443);
    assert_eq!(parsed.ratio, 0.5);
    assert_eq!(parsed.mode, Mode::Active);
    assert!(parsed.limits.is_empty());
}

#[rstest]
fn test_strict_options_apply_to_from_str() {
    let result: Result<Vec<u8>, Error> = from_str_with_options("[1, 2,]", &DecodeOptions::strict());
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[rstest]
#[case("{port: 70000}")]
#[case("{port: -1}")]
fn test_out_of_range_field(#[case] text: &str) {
    #[derive(Debug, Deserialize)]
    struct Port {
        #[allow(dead_code)]
        port: u16,
    }
    let err = from_str::<Port>(text).unwrap_err();
    assert!(matches!(err, Error::Number(_)), "{err}");
}

#[rstest]
fn test_missing_field_is_a_deserialize_error() {
    let err = from_str::<Server>("{name: 'x'}").unwrap_err();
    assert!(matches!(err, Error::Deserialize(ref message) if message.contains("port")), "{err}");
}

#[rstest]
fn test_maps_with_numeric_keys() {
    let mut original: HashMap<i32, Vec<Option<bool>>> = HashMap::new();
    original.insert(-5, vec![Some(true), None]);
    original.insert(42, Vec::new());
    let text = to_string(&original).unwrap();
    assert_eq!(from_str::<HashMap<i32, Vec<Option<bool>>>>(&text).unwrap(), original);
}

#[rstest]
fn test_value_fields_pass_through() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Envelope {
        kind: String,
        payload: Value,
    }
    let parsed: Envelope = from_str("{kind: 'raw', payload: {x: [1, 'two', null]}}").unwrap();
    assert_eq!(parsed.payload["x"][1], "two");
    let value = to_value(&parsed).unwrap();
    assert_eq!(from_value::<Envelope>(&value).unwrap(), parsed);
}

#[rstest]
fn test_from_reader() {
    let text = to_string(&server()).unwrap();
    let parsed: Server = from_reader(text.as_bytes()).unwrap();
    assert_eq!(parsed, server());
}

#[rstest]
fn test_unit_and_newtype_variants() {
    let modes = vec![Mode::Active, Mode::Named("n".to_string())];
    let value = to_value(&modes).unwrap();
    assert_eq!(value.to_string(), "[\"active\",{named:\"n\"}]");
    assert_eq!(from_value::<Vec<Mode>>(&value).unwrap(), modes);
}

fn arb_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![
        Just(Mode::Active),
        any::<u64>().prop_map(|since| Mode::Standby { since }),
        (any::<u8>(), any::<u8>()).prop_map(|(a, b)| Mode::Weighted(a, b)),
        any::<String>().prop_map(Mode::Named),
    ]
}

fn arb_server() -> impl Strategy<Value = Server> {
    (
        any::<String>(),
        any::<u16>(),
        any::<f64>().prop_filter("NaN never equals itself", |v| !v.is_nan()),
        proptest::collection::vec(any::<String>(), 0..4),
        arb_mode(),
        proptest::collection::btree_map(any::<String>(), any::<i64>(), 0..4),
    )
        .prop_map(|(name, port, ratio, tags, mode, limits)| Server {
            name,
            port,
            ratio,
            tags,
            backup: None,
            mode,
            limits,
        })
}

proptest! {
    #[test]
    fn derived_structs_round_trip(original in arb_server()) {
        let text = to_string(&original).unwrap();
        prop_assert_eq!(from_str::<Server>(&text).unwrap(), original);
    }
}
