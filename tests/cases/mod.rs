//! Shared harness for the table-style integration tests.
//!
//! Each case loads `input` as document `doc` and renders `value("doc")`
//! back as JSONX. Errors are compared by their display text.

#![allow(dead_code)]

use bumpalo::Bump;
use jsonx::{EngineOptions, MemoryStorage, Session};

/// Files visible to `include`, `include_text` and `include_blob`.
pub fn fixtures() -> MemoryStorage {
    MemoryStorage::new()
        .with_file("base.jx", "{ debug: false, port: 80 }")
        .with_file("copy.jx", "{ debug: false, port: 80 }")
        .with_file("list.jx", "[1, 2, 3]")
        .with_file("nested/leaf.jx", "{ leaf: true, up: include('list.jx') }")
        .with_file("loop.jx", "{ again: include('loop.jx') }")
        .with_file("broken.jx", "{ a: 1,, }")
        .with_file("notes.txt", "hello\nworld")
        .with_file("key.bin", vec![0xDE, 0xAD, 0xBE, 0xEF])
}

pub fn evaluate_with(options: EngineOptions, input: &str) -> Result<String, String> {
    let arena = Bump::new();
    let mut session = Session::new(&arena, options, fixtures());
    session
        .load_source("doc", input)
        .and_then(|()| session.value("doc"))
        .map(|value| value.to_string())
        .map_err(|e| e.to_string())
}

pub fn evaluate(input: &str) -> Result<String, String> {
    evaluate_with(EngineOptions::default(), input)
}

macro_rules! test_case {
    ($name:ident, input: $input:expr, value: $expected:expr $(,)?) => {
        #[test]
        fn $name() {
            let expected: Result<&str, &str> = $expected;
            pretty_assertions::assert_eq!(
                cases::evaluate($input),
                expected.map(str::to_string).map_err(str::to_string),
            );
        }
    };
}
