use promptweave_core::{
    EventKind, GenerationResponse, StepExecutionResult, VariableMap, WorkflowEvent, is_truthy,
    value_to_text,
};
use serde_json::json;
use std::str::FromStr;

#[test]
fn events_report_their_kind() {
    let event = WorkflowEvent::StepBefore {
        step: "write".into(),
    };
    assert_eq!(event.kind(), EventKind::StepBefore);
    assert_eq!(event.kind().to_string(), "STEP_BEFORE");

    let event = WorkflowEvent::WorkflowDone {
        final_state: VariableMap::new(),
        error: None,
    };
    assert_eq!(event.kind(), EventKind::WorkflowDone);
}

#[test]
fn event_kind_parses_wire_name() {
    assert_eq!(
        EventKind::from_str("STEP_RESULT_STREAM").unwrap(),
        EventKind::StepResultStream
    );
}

#[test]
fn events_serialize_with_tag() {
    let event = WorkflowEvent::StepError {
        error: "Could not find next step: x".into(),
        step: "a".into(),
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event"], json!("STEP_ERROR"));
    assert_eq!(value["step"], json!("a"));
}

#[test]
fn result_chunk_mirrors_response_text() {
    let result = StepExecutionResult::from_response(GenerationResponse::simulated("hi"));
    assert_eq!(result.result.text, "hi");
    assert_eq!(result.result.json["provider"], json!("simulation"));
    assert_eq!(result.response.status, 200);
}

#[test]
fn truthiness_follows_loose_rules() {
    assert!(!is_truthy(&json!(null)));
    assert!(!is_truthy(&json!(false)));
    assert!(!is_truthy(&json!(0)));
    assert!(!is_truthy(&json!("")));
    assert!(is_truthy(&json!(0.5)));
    assert!(is_truthy(&json!([])));
    assert!(is_truthy(&json!({})));
}

#[test]
fn text_form_of_values() {
    assert_eq!(value_to_text(&json!("raw")), "raw");
    assert_eq!(value_to_text(&json!(null)), "");
    assert_eq!(value_to_text(&json!(3)), "3");
    assert_eq!(value_to_text(&json!(["a"])), r#"["a"]"#);
}
