use pretty_assertions::assert_eq;
use serde_json::json;
use whisker::{Engine, ErrorKind, Pragma};

fn engine() -> Engine<'static> {
    let mut engine = Engine::new();
    engine.enable_pragma(Pragma::Blocks);
    engine
}

#[track_caller]
fn render(engine: &Engine<'_>, tpl: &str) -> String {
    engine
        .compile(tpl)
        .unwrap()
        .render(json!({ "name": "John" }))
        .to_string()
        .unwrap()
}

#[test]
fn inheritance_block_default() {
    assert_eq!(render(&engine(), "{{$ title }}Default{{/ title }}"), "Default");
}

#[test]
fn inheritance_parent_without_overrides() {
    let mut engine = engine();
    engine
        .add_template("base", "<{{$ title }}Default{{/ title }}>")
        .unwrap();
    assert_eq!(render(&engine, "{{< base }}{{/ base }}"), "<Default>");
}

#[test]
fn inheritance_override() {
    let mut engine = engine();
    engine
        .add_template("base", "<{{$ title }}Default{{/ title }}|{{$ body }}Body{{/ body }}>")
        .unwrap();
    let result = render(
        &engine,
        "{{< base }}{{$ title }}Hello {{ name }}{{/ title }}{{/ base }}",
    );
    assert_eq!(result, "<Hello John|Body>");
}

#[test]
fn inheritance_content_outside_blocks_discarded() {
    let mut engine = engine();
    engine.add_template("base", "[{{$ a }}a{{/ a }}]").unwrap();
    let result = render(
        &engine,
        "{{< base }}ignored {{ name }}{{$ a }}A{{/ a }} ignored{{/ base }}",
    );
    assert_eq!(result, "[A]");
}

#[test]
fn inheritance_multi_level_most_derived_wins() {
    let mut engine = engine();
    engine
        .add_template("base", "{{$ a }}base-a{{/ a }} {{$ b }}base-b{{/ b }} {{$ c }}base-c{{/ c }}")
        .unwrap();
    engine
        .add_template(
            "middle",
            "{{< base }}{{$ a }}middle-a{{/ a }}{{$ b }}middle-b{{/ b }}{{/ base }}",
        )
        .unwrap();
    let result = render(&engine, "{{< middle }}{{$ a }}child-a{{/ a }}{{/ middle }}");
    assert_eq!(result, "child-a middle-b base-c");
}

#[test]
fn inheritance_override_repeated_last_wins() {
    let mut engine = engine();
    engine.add_template("base", "{{$ a }}a{{/ a }}").unwrap();
    let result = render(
        &engine,
        "{{< base }}{{$ a }}first{{/ a }}{{$ a }}second{{/ a }}{{/ base }}",
    );
    assert_eq!(result, "second");
}

#[test]
fn inheritance_block_inside_partial_of_parent() {
    let mut engine = engine();
    engine.add_template("header", "<h1>{{$ title }}Default{{/ title }}</h1>").unwrap();
    engine.add_template("base", "{{< header }}{{/ header }}").unwrap();
    let result = render(
        &engine,
        "{{< base }}{{$ title }}Custom{{/ title }}{{/ base }}",
    );
    assert_eq!(result, "<h1>Custom</h1>");
}

#[test]
fn inheritance_nested_block_defaults() {
    let mut engine = engine();
    engine
        .add_template("base", "{{$ outer }}<{{$ inner }}in{{/ inner }}>{{/ outer }}")
        .unwrap();
    assert_eq!(
        render(&engine, "{{< base }}{{$ inner }}IN{{/ inner }}{{/ base }}"),
        "<IN>"
    );
    assert_eq!(
        render(&engine, "{{< base }}{{$ outer }}OUT{{/ outer }}{{/ base }}"),
        "OUT"
    );
}

#[test]
fn inheritance_override_sees_section_context() {
    let mut engine = engine();
    engine
        .add_template("list", "{{# items }}{{$ item }}{{ . }}{{/ item }},{{/ items }}")
        .unwrap();
    let result = engine
        .compile("{{< list }}{{$ item }}<{{ . }}>{{/ item }}{{/ list }}")
        .unwrap()
        .render(json!({ "items": [1, 2] }))
        .to_string()
        .unwrap();
    assert_eq!(result, "<1>,<2>,");
}

#[test]
fn inheritance_standalone_tags() {
    let mut engine = engine();
    engine
        .add_template("base", "<div>\n  {{$ body }}\n  default\n  {{/ body }}\n</div>\n")
        .unwrap();
    let result = render(
        &engine,
        "{{< base }}\n{{$ body }}\ncustom\n{{/ body }}\n{{/ base }}\n",
    );
    assert_eq!(result, "<div>\ncustom\n</div>\n");
}

#[test]
fn inheritance_pragma_in_template() {
    let mut engine = Engine::new();
    engine
        .add_template("base", "{{% BLOCKS }}[{{$ a }}a{{/ a }}]")
        .unwrap();
    let result = render(&engine, "{{% BLOCKS }}{{< base }}{{$ a }}A{{/ a }}{{/ base }}");
    assert_eq!(result, "[A]");
}

#[test]
fn inheritance_err_requires_pragma() {
    let err = Engine::new().compile("{{< base }}{{/ base }}").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(
        err.to_string(),
        "parent tags require the BLOCKS pragma between bytes 0 and 11"
    );
}

#[test]
fn inheritance_err_parent_not_found() {
    let err = engine()
        .compile("{{< base }}{{/ base }}")
        .unwrap()
        .render(json!({}))
        .to_string()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PartialNotFound);
}

#[test]
fn inheritance_err_self_parent_depth() {
    let mut engine = engine();
    engine.add_template("loop", "{{< loop }}{{/ loop }}").unwrap();
    let err = engine
        .get_template("loop")
        .unwrap()
        .render(json!({}))
        .with_max_partial_depth(8)
        .to_string()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MaxPartialDepth);
}

#[test]
fn inheritance_error_in_override_names_declaring_template() {
    let mut engine = engine();
    engine.add_template("base", "{{$ a }}{{/ a }}").unwrap();
    engine
        .add_template("child", "{{< base }}{{$ a }}{{ list }}{{/ a }}{{/ base }}")
        .unwrap();
    let err = engine
        .get_template("child")
        .unwrap()
        .render(json!({ "list": [1] }))
        .to_string()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Render);
    assert_eq!(err.template_name(), Some("child"));
}
