use std::thread;

use serde_json::json;
use whisker::{Engine, Pragma, Syntax, Value};

#[test]
fn engine_debug() {
    let mut engine = Engine::new();
    engine.enable_pragma(Pragma::Blocks);
    engine.add_template("base", "{{ x }}").unwrap();
    let debug = format!("{engine:?}");
    assert!(debug.contains("Blocks"), "{debug}");
    assert!(debug.contains("\"base\""), "{debug}");
}

#[test]
fn engine_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Engine<'static>>();
    assert_send_sync::<Value>();

    let mut engine = Engine::new();
    engine.add_filter("upper", |s: String| s.to_uppercase());
    let handle = thread::spawn(move || {
        engine
            .compile("{{% FILTERS }}{{ lorem | upper }}")
            .unwrap()
            .render(json!({ "lorem": "ipsum" }))
            .to_string()
            .unwrap()
    });
    assert_eq!(handle.join().unwrap(), "IPSUM");
}

#[test]
fn engine_shared_between_threads() {
    let mut engine = Engine::new();
    engine.add_template("greet", "Hello {{ name }}!").unwrap();
    let engine = &engine;
    thread::scope(|s| {
        for name in ["John", "Jane"] {
            s.spawn(move || {
                let result = engine
                    .get_template("greet")
                    .unwrap()
                    .render(json!({ "name": name }))
                    .to_string()
                    .unwrap();
                assert_eq!(result, format!("Hello {name}!"));
            });
        }
    });
}

#[test]
fn engine_compile_non_static_source() {
    let engine = Engine::new();
    let source = String::from("{{ lorem }}");
    let result = engine
        .compile(&source)
        .unwrap()
        .render(json!({ "lorem": "ipsum" }))
        .to_string()
        .unwrap();
    assert_eq!(result, "ipsum");
}

#[test]
fn engine_add_template_owned_source() {
    let mut engine = Engine::new();
    engine
        .add_template(String::from("test"), String::from("{{ lorem }}"))
        .unwrap();
    let template = engine.get_template("test").unwrap();
    assert_eq!(template.name(), "test");
    assert_eq!(template.source(), "{{ lorem }}");
    let result = template
        .render(json!({ "lorem": "ipsum" }))
        .to_string()
        .unwrap();
    assert_eq!(result, "ipsum");
}

#[test]
fn engine_add_template_replaces() {
    let mut engine = Engine::new();
    engine.add_template("t", "one").unwrap();
    engine.add_template("t", "two").unwrap();
    let result = engine
        .get_template("t")
        .unwrap()
        .render(json!({}))
        .to_string()
        .unwrap();
    assert_eq!(result, "two");
}

#[test]
fn engine_get_template_missing() {
    assert!(Engine::new().get_template("nope").is_none());
}

#[test]
fn engine_pragmas_apply_to_later_templates() {
    let mut engine = Engine::new();
    assert!(engine.add_template("a", "{{$ a }}{{/ a }}").is_err());
    engine.enable_pragma(Pragma::Blocks);
    assert!(engine.add_template("a", "{{$ a }}{{/ a }}").is_ok());
}

#[test]
fn engine_syntax_default() {
    assert_eq!(Syntax::default(), Syntax::builder().tags("{{", "}}").build());
}

#[test]
#[should_panic]
fn engine_syntax_invalid_tags() {
    Syntax::builder().tags("{ {", "}}");
}
