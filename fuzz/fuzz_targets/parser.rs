#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|source: &str| {
    for expr in cutie::Reader::new(source) {
        match expr {
            Ok(expr) => { let _ = expr.to_string(); }
            Err(_) => break,
        }
    }
});
