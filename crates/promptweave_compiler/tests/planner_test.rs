use promptweave_compiler::{PlanOptions, plan};
use promptweave_core::{Instruction, VariableMap, control_flow};
use serde_json::{Value, json};

fn vars(value: Value) -> VariableMap {
    value.as_object().cloned().unwrap_or_default()
}

#[tokio::test]
async fn source_without_markers_is_one_unnamed_prompt() {
    let result = plan("Tell me a joke.\n\nMake it short.", &VariableMap::new(), &PlanOptions::default()).await;

    assert_eq!(result.steps().len(), 1);
    let step = &result.steps()[0];
    assert_eq!(*step.instruction(), Instruction::Prompt);
    assert_eq!(step.name(), "");
    assert_eq!(step.rendered_prompt(), "Tell me a joke.\n\nMake it short.");
}

#[tokio::test]
async fn prompt_and_after_pair_share_a_name() {
    let source = "--- PROMPT a ---\nbody1\n--- AFTER a ---\nbody2";
    let result = plan(source, &VariableMap::new(), &PlanOptions::default()).await;

    let steps = result.steps();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].name(), "a");
    assert_eq!(*steps[0].instruction(), Instruction::Prompt);
    assert_eq!(steps[0].rendered_prompt(), "body1");
    assert_eq!(steps[1].name(), "a");
    assert_eq!(*steps[1].instruction(), Instruction::After);
    assert_eq!(steps[1].rendered_prompt(), "body2");
}

#[tokio::test]
async fn closest_preceding_marker_names_the_body() {
    let source = "--- PROMPT a ---\n--- PROMPT b ---\nonly b\n--- AFTER b ---\n\n";
    let result = plan(source, &VariableMap::new(), &PlanOptions::default()).await;

    assert_eq!(result.steps().len(), 1);
    assert_eq!(result.steps()[0].name(), "b");
}

#[tokio::test]
async fn empty_source_yields_no_steps() {
    let result = plan("   \n", &VariableMap::new(), &PlanOptions::default()).await;
    assert!(result.steps().is_empty());
    assert!(result.errors().is_empty());
}

#[tokio::test]
async fn inputs_interpolate() {
    let input = vars(json!({"topic": "cats", "n": 3}));
    let result = plan("Write {{ n }} lines about {{ topic }}{{ missing }}.", &input, &PlanOptions::default()).await;

    assert_eq!(result.steps()[0].rendered_prompt(), "Write 3 lines about cats.");
    assert_eq!(result.steps()[0].input_values(), &input);
}

#[tokio::test]
async fn render_errors_are_collected_per_step() {
    let source = "--- PROMPT good ---\nfine\n--- PROMPT bad ---\n{% shout %}\n--- PROMPT worse ---\n{% if x %}";
    let result = plan(source, &VariableMap::new(), &PlanOptions::default()).await;

    assert_eq!(result.steps().len(), 3);
    assert!(result.steps()[0].error().is_none());
    assert_eq!(result.errors().len(), 2);
    assert!(result.errors()[0].starts_with("In PROMPT, bad: Template syntax error"));
    assert!(result.errors()[1].starts_with("In PROMPT, worse: Template syntax error"));
    assert!(result.has_errors());
}

#[tokio::test]
async fn unknown_tags_fail_before_any_directive_runs() {
    let source = "{% done %}{% shout %}";
    let result = plan(source, &VariableMap::new(), &PlanOptions::default()).await;

    let step = &result.steps()[0];
    assert!(step.error().is_some());
    assert!(step.output(control_flow::DONE).is_none());
}

#[tokio::test]
async fn outputs_merge_with_later_steps_winning() {
    let options = PlanOptions::builder()
        .sync_tag("set", |call| {
            let value = call.arguments.get("v").cloned().unwrap_or(Value::Null);
            call.context.set_output("shared", value);
            Ok(None)
        })
        .build()
        .unwrap();
    let source = "--- PROMPT a ---\n{% set v=1 %}\n--- PROMPT b ---\n{% set v=2 %}";

    let result = plan(source, &VariableMap::new(), &options).await;

    assert_eq!(result.output().get("shared"), Some(&json!(2)));
    assert_eq!(result.steps()[0].output("shared"), Some(&json!(1)));
}

#[tokio::test]
async fn mock_hooks_are_injected_and_run() {
    let options = PlanOptions::builder()
        .sync_tag("mock", |call| {
            call.context
                .set_output(control_flow::RESULT, json!("Once upon a time."));
            Ok(None)
        })
        .build()
        .unwrap();

    let result = plan("--- PROMPT write ---\nWrite a story.", &VariableMap::new(), &options).await;

    let step = &result.steps()[0];
    assert_eq!(step.template_text(), "Write a story.\n{% mock %}");
    assert_eq!(step.rendered_prompt(), "Write a story.");
    assert_eq!(step.output(control_flow::RESULT), Some(&json!("Once upon a time.")));
}

#[tokio::test]
async fn caller_tags_shadow_builtins() {
    let options = PlanOptions::builder()
        .sync_tag("done", |_| Ok(Some("custom".to_string())))
        .build()
        .unwrap();

    let result = plan("{% done %}", &VariableMap::new(), &options).await;

    let step = &result.steps()[0];
    assert_eq!(step.rendered_prompt(), "custom");
    assert!(step.output(control_flow::DONE).is_none());
}

#[tokio::test]
async fn conditionals_see_directive_outputs() {
    let source = "{% field tone=\"{ default: 'calm' }\" %}{% if tone == 'calm' %}Breathe.{% else %}Shout!{% endif %}";
    let result = plan(source, &VariableMap::new(), &PlanOptions::default()).await;
    assert_eq!(result.steps()[0].rendered_prompt(), "Breathe.");

    let input = vars(json!({"tone": "loud"}));
    let result = plan(source, &input, &PlanOptions::default()).await;
    assert_eq!(result.steps()[0].rendered_prompt(), "Shout!");
}

#[tokio::test]
async fn malformed_directive_arguments_name_the_tag() {
    let result = plan("{% chars_to_words chars=5 =x %}", &VariableMap::new(), &PlanOptions::default()).await;
    assert_eq!(result.errors().len(), 1);
    assert!(
        result.errors()[0].starts_with("In PROMPT, : Invalid arguments for tag 'chars_to_words'"),
        "{}",
        result.errors()[0]
    );
}

async fn prompt_of(source: &str, input: Value) -> String {
    let result = plan(source, &vars(input), &PlanOptions::default()).await;
    assert!(result.errors().is_empty(), "{:?}", result.errors());
    result.steps()[0].rendered_prompt().clone()
}

#[tokio::test]
async fn filters_apply_to_outputs() {
    let prompt = prompt_of("{{ name | upcase }} / {{ name | size }}", json!({"name": "ada"})).await;
    assert_eq!(prompt, "ADA / 3");
}

#[tokio::test]
async fn for_loops_iterate_input_arrays() {
    let prompt = prompt_of(
        "{% for item in items %}[{{ item }}]{% endfor %}",
        json!({"items": ["a", "b"]}),
    )
    .await;
    assert_eq!(prompt, "[a][b]");
}

#[tokio::test]
async fn assign_and_comment_blocks() {
    let prompt = prompt_of(
        "{% assign who = 'world' %}{% comment %}{% done %}{% endcomment %}Hello {{ who }}",
        json!({}),
    )
    .await;
    assert_eq!(prompt, "Hello world");
}

#[tokio::test]
async fn conditions_combine_with_and_or() {
    let source = "{% if a and b %}both{% elsif a or b %}one{% else %}none{% endif %}";
    assert_eq!(prompt_of(source, json!({"a": true, "b": true})).await, "both");
    assert_eq!(prompt_of(source, json!({"a": true})).await, "one");
    assert_eq!(prompt_of(source, json!({})).await, "none");
}

#[tokio::test]
async fn directives_inside_loops_see_loop_variables() {
    let options = PlanOptions::builder()
        .sync_tag("echo", |call| {
            Ok(Some(call.arguments.get("v").map(ToString::to_string).unwrap_or_default()))
        })
        .build()
        .unwrap();
    let result = plan(
        "{% for n in nums %}{% echo v=n %};{% endfor %}",
        &vars(json!({"nums": [1, 2]})),
        &options,
    )
    .await;
    assert_eq!(result.steps()[0].rendered_prompt(), "1;2;");
}
