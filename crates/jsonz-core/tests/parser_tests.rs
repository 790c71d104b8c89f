use jsonz_core::{parse, parse_with, JsonError, Kind, ParseOptions, UnicodeEscapes, Value};

/// Helper: parse `text` and unwrap the single element of the root array.
fn only_element(text: &str) -> Value {
    let root = parse(text).unwrap();
    assert_eq!(root.array_len().unwrap(), 1, "expected one element in {text}");
    root.array_get(0).unwrap().unwrap()
}

fn assert_syntax_error(text: &str) {
    match parse(text) {
        Err(JsonError::Syntax { .. }) => {}
        other => panic!("expected syntax error for {text:?}, got {other:?}"),
    }
}

// ============================================================================
// Root values
// ============================================================================

#[test]
fn parse_root_null() {
    assert_eq!(parse("null").unwrap().kind(), Kind::Null);
}

#[test]
fn parse_root_true() {
    assert!(parse("true").unwrap().as_bool().unwrap());
}

#[test]
fn parse_root_false() {
    assert!(!parse("false").unwrap().as_bool().unwrap());
}

#[test]
fn parse_root_integer() {
    assert_eq!(parse("42").unwrap().as_int().unwrap(), 42);
}

#[test]
fn parse_root_string() {
    assert_eq!(parse(r#""hello""#).unwrap().to_utf8().unwrap(), "hello");
}

#[test]
fn parse_surrounding_whitespace() {
    let root = parse(" \t\r\n [ 1 ] \n").unwrap();
    assert_eq!(root.array_len().unwrap(), 1);
}

#[test]
fn parse_accepts_bytes() {
    let root = parse(b"[true]".as_slice()).unwrap();
    assert_eq!(root.array_len().unwrap(), 1);
}

#[test]
fn empty_input_fails() {
    assert_syntax_error("");
}

#[test]
fn whitespace_only_input_fails() {
    assert_syntax_error(" \t\n\r ");
}

#[test]
fn trailing_input_fails_by_default() {
    assert_syntax_error("[1] x");
    assert_syntax_error("1 2");
}

#[test]
fn trailing_input_allowed_when_configured() {
    let options = ParseOptions::new().allow_trailing(true);
    let root = parse_with("[1] trailing garbage", &options).unwrap();
    assert_eq!(root.array_len().unwrap(), 1);
}

#[test]
fn unexpected_character_fails() {
    assert_syntax_error("@");
    assert_syntax_error("+1");
    assert_syntax_error(".5");
}

// ============================================================================
// Mixed array shape
// ============================================================================

#[test]
fn parse_mixed_array_shape() {
    let root = parse(r#"[1, 2.5, "a", true, null, {"k": false}]"#).unwrap();
    assert_eq!(root.kind(), Kind::Array);
    assert_eq!(root.array_len().unwrap(), 6);

    let kinds: Vec<Kind> = root
        .array_values()
        .unwrap()
        .iter()
        .map(Value::kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            Kind::Int,
            Kind::Float,
            Kind::String,
            Kind::Bool,
            Kind::Null,
            Kind::Dict
        ]
    );

    let dict = root.array_get(5).unwrap().unwrap();
    assert_eq!(dict.dict_len().unwrap(), 1);
    assert_eq!(dict.dict_key_at(0).unwrap().unwrap(), b"k");
    let k = dict.dict_get("k").unwrap().unwrap();
    assert_eq!(k.kind(), Kind::Bool);
    assert!(!k.as_bool().unwrap());
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn integer_inside_container() {
    let v = only_element("[42]");
    assert_eq!(v.kind(), Kind::Int);
    assert_eq!(v.as_int().unwrap(), 42);
}

#[test]
fn decimal_point_makes_float() {
    let v = only_element("[42.0]");
    assert_eq!(v.kind(), Kind::Float);
    assert_eq!(v.as_float().unwrap(), 42.0);
}

#[test]
fn exponent_makes_float() {
    let v = only_element("[4e1]");
    assert_eq!(v.kind(), Kind::Float);
    assert_eq!(v.as_float().unwrap(), 40.0);
}

#[test]
fn uppercase_exponent_with_sign() {
    assert_eq!(only_element("[25E-1]").as_float().unwrap(), 2.5);
    assert_eq!(only_element("[1e+2]").as_float().unwrap(), 100.0);
}

#[test]
fn exponent_without_digits_fails() {
    assert_syntax_error("[4e]");
    assert_syntax_error("[4e+]");
    assert_syntax_error("4E");
}

#[test]
fn decimal_point_without_digits_fails() {
    assert_syntax_error("[1.]");
    assert_syntax_error("[1.e5]");
}

#[test]
fn negative_numbers() {
    assert_eq!(only_element("[-7]").as_int().unwrap(), -7);
    assert_eq!(only_element("[-0.5]").as_float().unwrap(), -0.5);
}

#[test]
fn lone_minus_fails() {
    assert_syntax_error("[-]");
    assert_syntax_error("-");
}

#[test]
fn integer_bounds() {
    assert_eq!(
        only_element("[9223372036854775807]").as_int().unwrap(),
        i64::MAX
    );
    assert_eq!(
        only_element("[-9223372036854775808]").as_int().unwrap(),
        i64::MIN
    );
}

#[test]
fn integer_overflow_fails() {
    assert_syntax_error("[9223372036854775808]");
}

#[test]
fn float_overflow_fails() {
    assert_syntax_error("[1e400]");
}

#[test]
fn leading_zeros_accepted() {
    assert_eq!(only_element("[007]").as_int().unwrap(), 7);
}

#[test]
fn number_error_reports_offset() {
    match parse("[1, 4e]") {
        Err(JsonError::Syntax { offset, .. }) => assert_eq!(offset, 6),
        other => panic!("expected syntax error, got {other:?}"),
    }
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn string_escapes_and_unicode() {
    let v = only_element(r#"["a\tb\u0041"]"#);
    assert_eq!(&*v.string_bytes().unwrap(), b"a\tbA");
}

#[test]
fn all_single_character_escapes() {
    let v = only_element(r#"["\\\/\'\"\a\b\f\n\r\t\0"]"#);
    assert_eq!(
        &*v.string_bytes().unwrap(),
        b"\\/'\"\x07\x08\x0c\n\r\t\0".as_slice()
    );
}

#[test]
fn empty_string() {
    assert_eq!(only_element(r#"[""]"#).to_utf8().unwrap(), "");
}

#[test]
fn raw_utf8_copied_verbatim() {
    assert_eq!(only_element("[\"caf\u{e9}\"]").to_utf8().unwrap(), "caf\u{e9}");
}

#[test]
fn long_string_grows_buffer() {
    let body = "x".repeat(1000);
    let v = only_element(&format!("[\"{body}\"]"));
    assert_eq!(v.to_utf8().unwrap(), body);
}

#[test]
fn unicode_escape_utf8_by_default() {
    let v = only_element(r#"["\u00e9\u4f60"]"#);
    assert_eq!(v.to_utf8().unwrap(), "\u{e9}\u{4f60}");
}

#[test]
fn unicode_surrogate_pair_combined() {
    let v = only_element(r#"["\ud83d\ude00"]"#);
    assert_eq!(v.to_utf8().unwrap(), "\u{1f600}");
}

#[test]
fn unpaired_surrogates_fail_in_utf8_mode() {
    assert_syntax_error(r#"["\ud83d"]"#);
    assert_syntax_error(r#"["\ud83dx"]"#);
    assert_syntax_error(r#"["\ude00"]"#);
    assert_syntax_error(r#"["\ud83d\u0041"]"#);
}

#[test]
fn unicode_escape_raw_bytes_mode() {
    let options = ParseOptions::new().unicode_escapes(UnicodeEscapes::RawBytes);
    let root = parse_with(r#"["\u0041\u00e9\u4f60\ud83d"]"#, &options).unwrap();
    let v = root.array_get(0).unwrap().unwrap();
    assert_eq!(
        &*v.string_bytes().unwrap(),
        [0x41, 0xe9, 0x4f, 0x60, 0xd8, 0x3d].as_slice()
    );
    assert!(v.to_utf8().is_err());
}

#[test]
fn unicode_escape_mixed_case_hex() {
    assert_eq!(only_element(r#"["\u004a\u004A"]"#).to_utf8().unwrap(), "JJ");
}

#[test]
fn short_unicode_escape_fails() {
    assert_syntax_error(r#"["\u004"]"#);
    assert_syntax_error(r#"["\u00g1"]"#);
    assert_syntax_error(r#"["\u00"#);
}

#[test]
fn invalid_escape_fails() {
    assert_syntax_error(r#"["\x"]"#);
    assert_syntax_error(r#"["\q"]"#);
}

#[test]
fn unterminated_string_fails() {
    assert_syntax_error(r#"["abc"#);
    assert_syntax_error(r#""abc\"#);
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn truncated_literals_fail() {
    assert_syntax_error("tru");
    assert_syntax_error("[tru]");
    assert_syntax_error("[trux]");
    assert_syntax_error("fals");
    assert_syntax_error("nul");
    assert_syntax_error("[none]");
}

// ============================================================================
// Arrays
// ============================================================================

#[test]
fn empty_array() {
    assert_eq!(parse("[]").unwrap().array_len().unwrap(), 0);
    assert_eq!(parse("[ \n ]").unwrap().array_len().unwrap(), 0);
}

#[test]
fn array_preserves_order() {
    let root = parse("[3, 1, 2]").unwrap();
    let ints: Vec<i64> = root
        .array_values()
        .unwrap()
        .iter()
        .map(|v| v.as_int().unwrap())
        .collect();
    assert_eq!(ints, vec![3, 1, 2]);
}

#[test]
fn nested_arrays() {
    let root = parse("[[1, [2]], []]").unwrap();
    let first = root.array_get(0).unwrap().unwrap();
    let inner = first.array_get(1).unwrap().unwrap();
    assert_eq!(inner.array_get(0).unwrap().unwrap().as_int().unwrap(), 2);
    assert_eq!(root.array_get(1).unwrap().unwrap().array_len().unwrap(), 0);
}

#[test]
fn array_missing_separator_fails() {
    assert_syntax_error("[1 2]");
    assert_syntax_error("[1;2]");
}

#[test]
fn array_trailing_comma_fails() {
    assert_syntax_error("[1,]");
    assert_syntax_error("[1, ]");
}

#[test]
fn array_leading_comma_fails() {
    assert_syntax_error("[,1]");
}

#[test]
fn unterminated_array_fails() {
    assert_syntax_error("[");
    assert_syntax_error("[   ");
    assert_syntax_error("[1");
    assert_syntax_error("[1,");
}

// ============================================================================
// Dicts
// ============================================================================

#[test]
fn empty_dict() {
    assert_eq!(parse("{}").unwrap().dict_len().unwrap(), 0);
    assert_eq!(parse("{ }").unwrap().dict_len().unwrap(), 0);
}

#[test]
fn dict_preserves_key_order() {
    let root = parse(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
    let keys: Vec<Vec<u8>> = (0..root.dict_len().unwrap())
        .map(|i| root.dict_key_at(i).unwrap().unwrap())
        .collect();
    assert_eq!(keys, vec![b"z".to_vec(), b"a".to_vec(), b"m".to_vec()]);
}

#[test]
fn duplicate_key_last_write_wins() {
    let root = parse(r#"{"a":1,"a":2}"#).unwrap();
    assert_eq!(root.dict_len().unwrap(), 1);
    assert_eq!(root.dict_get("a").unwrap().unwrap().as_int().unwrap(), 2);
}

#[test]
fn duplicate_key_keeps_first_position() {
    let root = parse(r#"{"a":1,"b":2,"a":3}"#).unwrap();
    assert_eq!(root.dict_key_at(0).unwrap().unwrap(), b"a");
    assert_eq!(root.dict_value_at(0).unwrap().unwrap().as_int().unwrap(), 3);
    assert_eq!(root.dict_key_at(1).unwrap().unwrap(), b"b");
}

#[test]
fn escaped_keys_are_decoded() {
    let root = parse(r#"{"a\nb": true}"#).unwrap();
    assert_eq!(root.dict_key_at(0).unwrap().unwrap(), b"a\nb");
}

#[test]
fn nested_dicts() {
    let root = parse(r#"{"outer": {"inner": [1, {"deep": null}]}}"#).unwrap();
    let outer = root.dict_get("outer").unwrap().unwrap();
    let inner = outer.dict_get("inner").unwrap().unwrap();
    let deep = inner.array_get(1).unwrap().unwrap();
    assert_eq!(
        deep.dict_get("deep").unwrap().unwrap().kind(),
        Kind::Null
    );
}

#[test]
fn non_string_keys_fail() {
    assert_syntax_error("{1: 2}");
    assert_syntax_error("{true: 2}");
    assert_syntax_error("{null: 2}");
    assert_syntax_error("{[]: 2}");
    assert_syntax_error(r#"{{}: 2}"#);
}

#[test]
fn dict_missing_colon_fails() {
    assert_syntax_error(r#"{"a" 1}"#);
    assert_syntax_error(r#"{"a"}"#);
}

#[test]
fn dict_missing_value_fails() {
    assert_syntax_error(r#"{"a":}"#);
}

#[test]
fn dict_missing_separator_fails() {
    assert_syntax_error(r#"{"a":1 "b":2}"#);
}

#[test]
fn dict_trailing_comma_fails() {
    assert_syntax_error(r#"{"a":1,}"#);
}

#[test]
fn unterminated_dict_fails() {
    assert_syntax_error("{");
    assert_syntax_error(r#"{"a""#);
    assert_syntax_error(r#"{"a":1"#);
    assert_syntax_error(r#"{"a":1,"#);
}

// ============================================================================
// Depth limit
// ============================================================================

#[test]
fn depth_within_limit() {
    let options = ParseOptions::new().max_depth(3);
    assert!(parse_with("[[[1]]]", &options).is_ok());
    assert!(parse_with(r#"{"a":{"b":[]}}"#, &options).is_ok());
}

#[test]
fn depth_over_limit_fails() {
    let options = ParseOptions::new().max_depth(3);
    match parse_with("[[[[1]]]]", &options) {
        Err(JsonError::DepthLimit { limit, offset }) => {
            assert_eq!(limit, 3);
            assert_eq!(offset, 3);
        }
        other => panic!("expected depth limit error, got {other:?}"),
    }
}

#[test]
fn scalars_do_not_count_toward_depth() {
    let options = ParseOptions::new().max_depth(0);
    assert!(parse_with("42", &options).is_ok());
    assert!(parse_with("[]", &options).is_err());
}

#[test]
fn default_depth_stops_pathological_nesting() {
    let text = "[".repeat(100_000);
    assert!(matches!(parse(&text), Err(JsonError::DepthLimit { .. })));
}

#[test]
fn default_depth_accepts_deep_valid_input() {
    let depth = jsonz_core::DEFAULT_MAX_DEPTH;
    let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    assert!(parse(&text).is_ok());
}

#[test]
fn max_depth_is_clamped_to_ceiling() {
    let options = ParseOptions::new().max_depth(100_000);
    assert_eq!(options.max_depth, jsonz_core::MAX_DEPTH_CEILING);
}

#[test]
fn oversized_limit_still_fails_cleanly() {
    let depth = 50_000;
    let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    let options = ParseOptions::new().max_depth(usize::MAX);
    match parse_with(&text, &options) {
        Err(JsonError::DepthLimit { limit, .. }) => {
            assert_eq!(limit, jsonz_core::MAX_DEPTH_CEILING)
        }
        other => panic!("expected depth limit error, got {other:?}"),
    }
}

#[test]
fn deserialized_limit_is_clamped_too() {
    let options = ParseOptions {
        max_depth: usize::MAX,
        ..ParseOptions::default()
    };
    assert_eq!(options.effective_max_depth(), jsonz_core::MAX_DEPTH_CEILING);
    let text = "[".repeat(jsonz_core::MAX_DEPTH_CEILING + 1);
    assert!(matches!(
        parse_with(&text, &options),
        Err(JsonError::DepthLimit { .. })
    ));
}

#[test]
fn ceiling_depth_parses() {
    let depth = jsonz_core::MAX_DEPTH_CEILING;
    let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    let options = ParseOptions::new().max_depth(depth);
    assert!(parse_with(&text, &options).is_ok());
}
