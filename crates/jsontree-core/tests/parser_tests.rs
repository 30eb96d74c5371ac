use jsontree_core::{parse, parse_with, Node, NodeError, ParseOptions};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Helper: position of a parse error, panicking on success or other errors.
fn error_position(input: &str) -> usize {
    match parse(input) {
        Err(NodeError::Parse { position, .. }) => position,
        other => panic!("expected parse error for {input:?}, got {other:?}"),
    }
}

fn dec(text: &str) -> Node {
    Node::Decimal(Decimal::from_str(text).unwrap())
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn parse_literals() {
    assert_eq!(parse("null").unwrap(), Node::Null);
    assert_eq!(parse("true").unwrap(), Node::Boolean(true));
    assert_eq!(parse("false").unwrap(), Node::Boolean(false));
}

#[test]
fn literals_are_case_sensitive() {
    assert_eq!(error_position("True"), 0);
    assert_eq!(error_position("[nul]"), 1);
    assert_eq!(error_position("NULL"), 0);
}

#[test]
fn integers_parse_as_long() {
    assert_eq!(parse("0").unwrap(), Node::Long(0));
    assert_eq!(parse("-42").unwrap(), Node::Long(-42));
    assert_eq!(parse("+7").unwrap(), Node::Long(7));
    assert_eq!(parse("9223372036854775807").unwrap(), Node::Long(i64::MAX));
}

#[test]
fn numbers_with_a_dot_parse_as_decimal() {
    assert_eq!(parse("3.14").unwrap(), dec("3.14"));
    assert_eq!(parse("-0.5").unwrap(), dec("-0.5"));
    assert_eq!(parse("2.50").unwrap().to_json(), "2.50");
    assert_eq!(parse("1.5e3").unwrap(), dec("1500"));
}

#[test]
fn decimal_literals_are_never_rounded() {
    assert_eq!(error_position("1.00000000000000000000000000001"), 0);
    assert_eq!(error_position("[0, 0.123456789012345678901234567890123]"), 4);
    assert_eq!(error_position("{\"n\": 1.0e300}"), 6);
    assert_eq!(
        parse("0.1234567890123456789012345678").unwrap(),
        dec("0.1234567890123456789012345678")
    );
}

#[test]
fn whole_number_decimals_keep_their_tag() {
    for text in ["5.", "1.5e1", "1.5E1", "2.0"] {
        let node = parse(text).unwrap();
        assert!(node.is_decimal(), "{text}");
        let again = parse(&node.to_json()).unwrap();
        assert!(again.is_decimal(), "{text}");
        assert_eq!(again, node);
    }
    assert_eq!(parse("1.5e1").unwrap().to_json(), "15.0");
}

#[test]
fn malformed_numbers_fail_at_run_start() {
    assert_eq!(error_position("[1, 1.2.3]"), 4);
    assert_eq!(error_position("--1"), 0);
    assert_eq!(error_position("{\"n\": 99999999999999999999}"), 6);
    // Exponent without a dot is still a Long run.
    assert_eq!(error_position("1e5"), 0);
}

#[test]
fn strings_unescape() {
    let node = parse(r#""a\"b\\c\/d\be\ff\ng\rh\ti\u0041""#).unwrap();
    assert_eq!(
        node,
        Node::String("a\"b\\c/d\u{8}e\u{c}f\ng\rh\tiA".to_string())
    );
}

#[test]
fn unicode_passes_through() {
    assert_eq!(
        parse("\"caf\u{e9} \u{4f60}\u{597d}\"").unwrap(),
        Node::String("caf\u{e9} \u{4f60}\u{597d}".to_string())
    );
    assert_eq!(
        parse(r#""\u00e9""#).unwrap(),
        Node::String("\u{e9}".to_string())
    );
}

#[test]
fn invalid_escape_is_reported_at_backslash() {
    assert_eq!(error_position(r#""ab\x""#), 3);
    assert_eq!(error_position(r#""\u12G4""#), 1);
    assert_eq!(error_position(r#""\u12" "#), 1);
    assert_eq!(error_position(r#"["x\u4", 1]"#), 3);
}

#[test]
fn escape_cut_off_by_end_of_input() {
    assert_eq!(error_position(r#""\u12"#), 5);
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn object_preserves_insertion_order() {
    let node = parse(r#"{"z":1,"a":2,"m":3}"#).unwrap();
    assert_eq!(node.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
}

#[test]
fn duplicate_key_keeps_first_position_and_last_value() {
    let node = parse(r#"{"a":1,"b":2,"a":3}"#).unwrap();
    assert_eq!(node.to_json(), r#"{"a":3,"b":2}"#);
}

#[test]
fn nested_structures() {
    let node = parse(r#"{"a":[1,{"b":null},[]],"c":{}}"#).unwrap();
    assert_eq!(
        node.get("a").unwrap(),
        &Node::Array(vec![
            Node::Long(1),
            [("b", Node::Null)].into_iter().collect(),
            Node::array(),
        ])
    );
    assert_eq!(node.get("c"), Some(&Node::object()));
}

#[test]
fn whitespace_between_tokens_is_ignored() {
    let node = parse(" \n\t{ \"a\" :\r\n [ 1 , 2 ]\u{a0}}\u{2003} ").unwrap();
    assert_eq!(node.to_json(), r#"{"a":[1,2]}"#);
}

#[test]
fn from_str_matches_parse() {
    let node: Node = "[true,false]".parse().unwrap();
    assert_eq!(node, parse("[true,false]").unwrap());
}

// ============================================================================
// Structural errors
// ============================================================================

#[test]
fn missing_value_is_reported_at_closing_brace() {
    assert_eq!(error_position(r#"{"a":}"#), 5);
}

#[test]
fn unquoted_key_is_rejected() {
    assert_eq!(error_position("{a:1}"), 1);
}

#[test]
fn missing_colon_is_rejected() {
    assert_eq!(error_position(r#"{"a" 1}"#), 5);
}

#[test]
fn trailing_comma_is_rejected() {
    assert_eq!(error_position("[1,2,]"), 5);
    assert_eq!(error_position(r#"{"a":1,}"#), 7);
}

#[test]
fn missing_separator_is_rejected() {
    assert_eq!(error_position("[1 2]"), 3);
    assert_eq!(error_position(r#"{"a":1 "b":2}"#), 7);
}

#[test]
fn trailing_garbage_is_rejected() {
    assert_eq!(error_position("{} x"), 3);
    assert_eq!(error_position("truex"), 4);
}

#[test]
fn end_of_input_inside_structure() {
    assert_eq!(error_position(r#"{"a":1"#), 6);
    assert_eq!(error_position("[1,"), 3);
    assert_eq!(error_position(r#"{"a":"unterminated"#), 18);
    assert_eq!(error_position(""), 0);
    assert_eq!(error_position("   "), 3);
}

#[test]
fn error_context_is_bounded() {
    let input = format!("[{}", "1,".repeat(200)) + "x]";
    match parse(&input) {
        Err(NodeError::Parse {
            position, context, ..
        }) => {
            assert_eq!(position, input.len() - 2);
            assert_eq!(context, "x]");
        }
        other => panic!("unexpected {other:?}"),
    }

    let input = format!("[?{}]", "a".repeat(300));
    match parse(&input) {
        Err(NodeError::Parse { context, .. }) => {
            assert!(context.ends_with("..."));
            assert_eq!(context.chars().count(), 103);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn error_message_names_position() {
    let message = parse("[1,]").unwrap_err().to_string();
    assert!(message.contains("position 3"), "{message}");
}

#[test]
fn depth_limit_reports_opening_bracket() {
    let options = ParseOptions { max_depth: Some(2) };
    match parse_with(r#"{"a":{"b":{"c":1}}}"#, &options) {
        Err(NodeError::Parse { position, .. }) => assert_eq!(position, 10),
        other => panic!("unexpected {other:?}"),
    }
}
