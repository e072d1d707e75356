#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde::Serialize;
use whisker::Pragma;

#[derive(Debug, Serialize, Arbitrary)]
enum Value {
    None,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

fuzz_target!(|data: (&str, Vec<(&str, &str)>, Value)| {
    let (root, partials, value) = data;
    let mut engine = whisker::Engine::new();
    engine.enable_pragma(Pragma::Blocks);
    engine.enable_pragma(Pragma::Attributes);
    engine.enable_pragma(Pragma::Filters);
    engine.add_filter("upper", |s: String| s.to_uppercase());
    if engine.add_template("fuzz", root).is_err() {
        return;
    }
    for (name, data) in partials {
        let _ = engine.add_template(name, data);
    }
    let _ = engine
        .get_template("fuzz")
        .unwrap()
        .render(&value)
        .with_max_partial_depth(16)
        .to_string();
});
