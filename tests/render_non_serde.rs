use whisker::{Attrs, Engine, Pragma, Value};

#[test]
fn render_from_value() {
    let data = Value::from([
        ("title", Value::from("Users")),
        (
            "users",
            Value::from(vec![
                Value::from([("name", "John")]),
                Value::from([("name", "Jane")]),
            ]),
        ),
    ]);
    let result = Engine::new()
        .compile("{{ title }}:{{# users }} {{ name }}{{/ users }}")
        .unwrap()
        .render_from(&data)
        .to_string()
        .unwrap();
    assert_eq!(result, "Users: John Jane");
}

#[test]
fn render_from_stored_template() {
    let mut engine = Engine::new();
    engine.add_template("t", "{{ a }}").unwrap();
    let data = Value::from([("a", 1)]);
    let result = engine
        .get_template("t")
        .unwrap()
        .render_from(&data)
        .to_string()
        .unwrap();
    assert_eq!(result, "1");
}

#[test]
fn render_from_attrs_value() {
    let attrs: Attrs = [("b", "2"), ("a", "1")].into_iter().collect();
    let data = Value::from([("m", attrs)]);
    let mut engine = Engine::new();
    engine.enable_pragma(Pragma::AnchoredDot);
    let result = engine
        .compile("{{# m }}{{ .a }}{{ .b }}{{/ m }}")
        .unwrap()
        .render_from(&data)
        .to_string()
        .unwrap();
    assert_eq!(result, "12");
}
