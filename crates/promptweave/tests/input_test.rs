use promptweave::{PromptweaveErrorKind, input_map, parse_input};
use serde_json::json;

#[test]
fn values_are_json_when_they_parse() {
    assert_eq!(parse_input("n=3").unwrap(), ("n".to_string(), json!(3)));
    assert_eq!(parse_input("draft=true").unwrap().1, json!(true));
    assert_eq!(parse_input(r#"tags=["a","b"]"#).unwrap().1, json!(["a", "b"]));
}

#[test]
fn other_values_stay_strings() {
    assert_eq!(parse_input("topic=robots").unwrap().1, json!("robots"));
    assert_eq!(parse_input("title=Hello world").unwrap().1, json!("Hello world"));
    assert_eq!(parse_input("empty=").unwrap().1, json!(""));
}

#[test]
fn only_the_first_equals_splits() {
    assert_eq!(parse_input("expr=a=b").unwrap(), ("expr".to_string(), json!("a=b")));
}

#[test]
fn malformed_assignments_are_config_errors() {
    for raw in ["topic", "=robots", "  =x"] {
        let err = parse_input(raw).unwrap_err();
        assert!(
            matches!(err.kind(), PromptweaveErrorKind::Config(_)),
            "{raw} should be a config error"
        );
    }
}

#[test]
fn later_inputs_win() {
    let map = input_map(vec![
        ("topic".to_string(), json!("cats")),
        ("topic".to_string(), json!("dogs")),
    ]);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("topic"), Some(&json!("dogs")));
}
