use promptweave_error::{
    ConfigError, IoError, JsonError, PromptweaveError, PromptweaveErrorKind, ProviderError,
    ProviderErrorKind, RuntimeError, RuntimeErrorKind, TemplateError, TemplateErrorKind,
};

#[test]
fn errors_capture_call_site() {
    let err = RuntimeError::new(RuntimeErrorKind::NoPromptStep);
    assert!(err.file.ends_with("error_test.rs"));
    assert!(err.line > 0);
}

#[test]
fn kinds_convert_into_top_level_error() {
    let err: PromptweaveError =
        ProviderError::new(ProviderErrorKind::UnsupportedModel("gemini-pro".into())).into();
    assert!(matches!(err.kind(), PromptweaveErrorKind::Provider(_)));

    let err: PromptweaveError = ConfigError::new("bad").into();
    assert!(matches!(err.kind(), PromptweaveErrorKind::Config(_)));
}

#[test]
fn message_omits_source_location() {
    let err: PromptweaveError = RuntimeError::new(RuntimeErrorKind::NoPromptStep).into();
    assert_eq!(err.message(), "No PROMPT steps found in workflow");
    assert!(err.to_string().contains("error_test.rs"));

    let err: PromptweaveError = TemplateError::new(TemplateErrorKind::Arguments {
        tag: "goto".into(),
        message: "unexpected '='".into(),
    })
    .into();
    assert_eq!(err.message(), "Invalid arguments for tag 'goto': unexpected '='");
}

#[test]
fn io_and_json_failures_have_their_own_kinds() {
    let source = std::io::Error::from(std::io::ErrorKind::NotFound);
    let err: PromptweaveError = IoError::read("missing.liquid", &source).into();
    assert!(matches!(err.kind(), PromptweaveErrorKind::Io(_)));
    assert!(err.message().starts_with("Failed to read missing.liquid: "));

    let err: PromptweaveError = JsonError::new("trailing characters").into();
    assert!(matches!(err.kind(), PromptweaveErrorKind::Json(_)));
    assert_eq!(err.message(), "trailing characters");
    assert!(err.to_string().starts_with("Promptweave Error: JSON Error: trailing characters"));
}

#[test]
fn step_not_found_names_the_target() {
    let kind = RuntimeErrorKind::StepNotFound("nowhere".into());
    assert_eq!(kind.to_string(), "Could not find next step: nowhere");
}
