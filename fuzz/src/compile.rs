#![no_main]

use libfuzzer_sys::fuzz_target;
use whisker::Pragma;

fuzz_target!(|data: &str| {
    let mut engine = whisker::Engine::new();
    engine.enable_pragma(Pragma::Blocks);
    engine.enable_pragma(Pragma::Attributes);
    engine.enable_pragma(Pragma::Filters);
    let _ = engine.add_template("fuzz", data);
});
