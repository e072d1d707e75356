use whisker::{Engine, ErrorKind, Pragma};

#[track_caller]
fn compile_err(source: &str) -> whisker::Error {
    Engine::new().compile(source).unwrap_err()
}

#[test]
fn compile_empty() {
    let engine = Engine::new();
    let template = engine.compile("").unwrap();
    assert_eq!(template.source(), "");
    assert_eq!(template.render_from(&whisker::Value::None).to_string().unwrap(), "");
}

#[test]
fn compile_comments_multiline() {
    let engine = Engine::new();
    let result = engine
        .compile("a{{! this\nis {{ ignored\n}}b")
        .unwrap()
        .render_from(&whisker::Value::None)
        .to_string()
        .unwrap();
    assert_eq!(result, "ab");
}

#[test]
fn compile_err_unclosed_tag() {
    let err = compile_err("lorem {{ ipsum");
    assert_eq!(err.kind(), ErrorKind::UnterminatedTag);
    assert_eq!(err.line_col(), Some((1, 7)));
}

#[test]
fn compile_err_unclosed_triple() {
    let err = compile_err("lorem {{{ ipsum }}");
    assert_eq!(err.kind(), ErrorKind::UnterminatedTag);
}

#[test]
fn compile_err_unclosed_section_reports_innermost() {
    let err = compile_err("{{# a }}\n{{# b }}\n{{/ b }}\n  {{# c }}");
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(err.line_col(), Some((4, 3)));
}

#[test]
fn compile_err_mismatched_close() {
    let err = compile_err("{{# a }}{{# b }}{{/ a }}{{/ b }}");
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(
        err.to_string(),
        "mismatched close tag, expected `b` between bytes 20 and 21"
    );
}

#[test]
fn compile_err_unexpected_close() {
    let err = compile_err("lorem {{/ ipsum }}");
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn compile_err_invalid_delimiters() {
    for source in ["{{=<%=}}", "{{=< % %>=}}", "{{= =}}"] {
        let err = compile_err(source);
        assert_eq!(err.kind(), ErrorKind::Syntax, "{source}");
    }
}

#[test]
fn compile_err_pragma_gated_syntax() {
    let cases = [
        (r#"{{ a b="c" }}"#, "attributes require the ATTRIBUTES pragma"),
        (r#"{{> a b="c" }}"#, "attributes require the ATTRIBUTES pragma"),
        ("{{ a | upper }}", "filters require the FILTERS pragma"),
        ("{{$ a }}{{/ a }}", "block tags require the BLOCKS pragma"),
        ("{{< a }}{{/ a }}", "parent tags require the BLOCKS pragma"),
    ];
    for (source, msg) in cases {
        let err = compile_err(source);
        assert_eq!(err.kind(), ErrorKind::Syntax, "{source}");
        assert!(err.to_string().starts_with(msg), "{source}: {err}");
    }
}

#[test]
fn compile_pragma_applies_after_tag() {
    let err = compile_err("{{ a | upper }}{{% FILTERS }}");
    assert_eq!(err.kind(), ErrorKind::Syntax);

    assert!(Engine::new()
        .compile("{{% FILTERS }}{{ a | upper }}")
        .is_ok());
}

#[test]
fn compile_pragma_survives_delimiter_change() {
    assert!(Engine::new()
        .compile("{{% FILTERS }}{{=<% %>=}}<% a | upper %>")
        .is_ok());
}

#[test]
fn compile_engine_pragmas() {
    let mut engine = Engine::new();
    engine.enable_pragma(Pragma::Attributes);
    engine.enable_pragma(Pragma::Filters);
    assert!(engine.compile(r#"{{ a b="c" | upper }}"#).is_ok());
}

#[test]
fn compile_err_filters_on_partial() {
    let mut engine = Engine::new();
    engine.enable_pragma(Pragma::Filters);
    let err = engine.compile("{{> a | upper }}").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert!(err
        .to_string()
        .starts_with("filters are not allowed on partial tags"));
}

#[test]
fn compile_err_attribute_syntax() {
    let mut engine = Engine::new();
    engine.enable_pragma(Pragma::Attributes);
    for source in [
        "{{ a b }}",
        "{{ a b= }}",
        r#"{{ a b="c }}"#,
        r#"{{ a ="c" }}"#,
        r#"{{ a b="\q" }}"#,
    ] {
        let err = engine.compile(source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax, "{source}");
    }
}

#[test]
fn compile_err_invalid_names() {
    for source in ["{{ a..b }}", "{{ a. }}", "{{ .a }}", "{{ }}"] {
        let err = compile_err(source);
        assert_eq!(err.kind(), ErrorKind::Syntax, "{source}");
    }
}

#[test]
fn compile_unknown_pragma_ignored() {
    let result = Engine::new()
        .compile("{{% NOPE }}ok")
        .unwrap()
        .render_from(&whisker::Value::None)
        .to_string()
        .unwrap();
    assert_eq!(result, "ok");
}

#[test]
fn compile_err_display_alternate() {
    let err = compile_err("lorem\n{{# ipsum }}");
    let pretty = format!("{err:#}");
    assert!(pretty.contains("unclosed section"), "{pretty}");
    assert!(pretty.contains("{{# ipsum }}"), "{pretty}");
}

#[test]
fn compile_add_template_err_has_name() {
    let mut engine = Engine::new();
    let err = engine.add_template("broken", "{{# a }}").unwrap_err();
    assert_eq!(err.template_name(), Some("broken"));
    assert!(err.to_string().ends_with("in template `broken`"));
    assert!(engine.get_template("broken").is_none());
}
